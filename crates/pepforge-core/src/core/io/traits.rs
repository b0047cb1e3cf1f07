use super::record::DesignRecord;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Common interface of the tabular and sequence artifact formats.
///
/// Implementors serialize a slice of [`DesignRecord`]s and parse them back.
pub trait DesignFile {
    /// Format-specific write options.
    type Options: Default;

    type Error: Error + From<io::Error>;

    fn read_from(reader: &mut impl BufRead) -> Result<Vec<DesignRecord>, Self::Error>;

    fn write_to(
        records: &[DesignRecord],
        options: &Self::Options,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error>;

    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<DesignRecord>, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    fn write_to_path<P: AsRef<Path>>(
        records: &[DesignRecord],
        options: &Self::Options,
        path: P,
    ) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(records, options, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
