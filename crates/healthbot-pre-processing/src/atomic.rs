//! Atomic file replacement shared by artifact saving and the JSON exports.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use tempfile::NamedTempFile;

/// Failure of [`write_atomically`]: either the filesystem or the caller's
/// content writer.
#[derive(Debug)]
pub enum AtomicWriteError<E> {
    Io(io::Error),
    Content(E),
}

impl<E> From<io::Error> for AtomicWriteError<E> {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

/// Write a temp file next to `path` with `write`, fsync it and rename it over
/// `path`.
///
/// The parent directory must exist. On any failure `path` is left as it was
/// and the temp file is removed.
pub fn write_atomically<E>(
    path: &Path,
    write: impl FnOnce(&mut BufWriter<&mut File>) -> Result<(), E>,
) -> Result<(), AtomicWriteError<E>> {
    let parent = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut temp_file = NamedTempFile::new_in(parent)?;
    {
        let mut writer = BufWriter::new(temp_file.as_file_mut());
        write(&mut writer).map_err(AtomicWriteError::Content)?;
        writer.flush()?;
    }
    temp_file.as_file().sync_all()?;
    temp_file
        .persist(path)
        .map_err(|err| AtomicWriteError::Io(err.error))?;
    Ok(())
}
