//! Atomic file output.
//!
//! [`BinaryWriter`] stages bytes in a temporary file next to the target and
//! renames it into place on [`commit`](BinaryWriter::commit). Dropping the
//! writer without committing removes the temporary, so a failed save leaves
//! either no file or the previous file untouched, never a truncated one.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// Scoped writer for one output file.
#[derive(Debug)]
pub struct BinaryWriter {
    path: PathBuf,
    inner: Option<BufWriter<NamedTempFile>>,
    written: u64,
}

impl BinaryWriter {
    /// Stage a new file that will replace `path` on commit.
    ///
    /// Fails if the parent directory does not exist or is not writable.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let temp = NamedTempFile::new_in(dir)?;
        Ok(Self {
            path: path.to_path_buf(),
            inner: Some(BufWriter::new(temp)),
            written: 0,
        })
    }

    /// Destination path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the staging file is still open for writing.
    pub fn is_open(&self) -> bool {
        self.inner.is_some()
    }

    /// Bytes written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Flush and atomically move the staged file to the destination.
    ///
    /// Returns the total byte count.
    pub fn commit(mut self) -> io::Result<u64> {
        let inner = self.inner.take().ok_or_else(closed)?;
        let temp = inner.into_inner().map_err(io::IntoInnerError::into_error)?;
        temp.as_file().sync_all()?;
        let _file: File = temp.persist(&self.path)?;
        Ok(self.written)
    }
}

fn closed() -> io::Error {
    io::Error::new(io::ErrorKind::BrokenPipe, "writer already closed")
}

impl Write for BinaryWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let inner = self.inner.as_mut().ok_or_else(closed)?;
        let n = inner.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.as_mut().ok_or_else(closed)?.flush()
    }
}
