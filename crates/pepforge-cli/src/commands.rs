pub mod design;
pub mod evaluate;
pub mod generate;
