use super::error::ExportError;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Destination for exported artifacts.
///
/// Content written through the handle must not become visible at its final
/// path until [`ArtifactSink::finalize`] succeeds. Dropping a handle without
/// finalizing it discards the partial content.
pub trait ArtifactSink {
    type Handle: Write;

    fn open_for_write(&self, path: &Path) -> Result<Self::Handle, ExportError>;

    /// Commits the handle's content to its final path and returns that path.
    fn finalize(&self, handle: Self::Handle) -> Result<PathBuf, ExportError>;
}

/// Stages each artifact in a temporary file next to its target and renames it
/// into place on finalize.
#[derive(Debug, Clone, Copy, Default)]
pub struct TempFileSink;

pub struct StagedArtifact {
    writer: BufWriter<NamedTempFile>,
    target: PathBuf,
}

impl Write for StagedArtifact {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl ArtifactSink for TempFileSink {
    type Handle = StagedArtifact;

    fn open_for_write(&self, path: &Path) -> Result<Self::Handle, ExportError> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let file = NamedTempFile::new_in(dir).map_err(|e| ExportError::at_path(dir, e))?;
        Ok(StagedArtifact {
            writer: BufWriter::new(file),
            target: path.to_path_buf(),
        })
    }

    fn finalize(&self, handle: Self::Handle) -> Result<PathBuf, ExportError> {
        let StagedArtifact { writer, target } = handle;
        let file = writer
            .into_inner()
            .map_err(|e| ExportError::at_path(&target, e.into_error()))?;
        file.as_file()
            .sync_all()
            .map_err(|e| ExportError::at_path(&target, e))?;
        file.persist(&target)
            .map_err(|e| ExportError::at_path(&target, e.error))?;
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn finalize_moves_content_into_place() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("designs.csv");
        let sink = TempFileSink;

        let mut handle = sink.open_for_write(&target).unwrap();
        handle.write_all(b"id,sequence\n").unwrap();
        assert!(!target.exists());

        let written = sink.finalize(handle).unwrap();
        assert_eq!(written, target);
        assert_eq!(fs::read_to_string(&target).unwrap(), "id,sequence\n");
        assert_eq!(entries(dir.path()), ["designs.csv"]);
    }

    #[test]
    fn dropped_handle_leaves_no_files_behind() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("designs.json");
        {
            let mut handle = TempFileSink.open_for_write(&target).unwrap();
            handle.write_all(b"[").unwrap();
        }
        assert!(entries(dir.path()).is_empty());
    }

    #[test]
    fn failed_persist_cleans_up_staging_file() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("blocked.fasta");
        fs::create_dir(&target).unwrap();

        let mut handle = TempFileSink.open_for_write(&target).unwrap();
        handle.write_all(b">x\nKALK\n").unwrap();
        let err = TempFileSink.finalize(handle).unwrap_err();
        assert!(matches!(err, ExportError::Io { ref path, .. } if path == &target));
        assert_eq!(entries(dir.path()), ["blocked.fasta"]);
    }

    #[test]
    fn open_fails_for_missing_directory() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("missing").join("designs.csv");
        assert!(matches!(
            TempFileSink.open_for_write(&target),
            Err(ExportError::Io { .. })
        ));
    }
}
