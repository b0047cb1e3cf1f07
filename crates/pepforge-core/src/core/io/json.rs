use super::error::ExportError;
use super::record::DesignRecord;
use super::traits::DesignFile;
use std::io::{BufRead, Write};

/// A pretty-printed JSON array of design objects.
pub struct JsonFile;

impl DesignFile for JsonFile {
    type Options = ();
    type Error = ExportError;

    fn read_from(reader: &mut impl BufRead) -> Result<Vec<DesignRecord>, Self::Error> {
        Ok(serde_json::from_reader(reader)?)
    }

    fn write_to(
        records: &[DesignRecord],
        _options: &Self::Options,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        serde_json::to_writer_pretty(&mut *writer, records)?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}
