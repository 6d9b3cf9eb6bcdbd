use std::path::Path;

use healthbot_pre_processing::{AtomicWriteError, write_atomically};
use serde::Serialize;
use tracing::debug;

use crate::error::ExportError;

/// Write `value` as pretty-printed JSON (2-space indent, UTF-8 kept as is)
/// and atomically move it over `path`.
///
/// The target directory must already exist. On failure `path` is untouched.
pub fn write_json_atomic<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
) -> Result<(), ExportError> {
    write_atomically(path, |writer| serde_json::to_writer_pretty(writer, value)).map_err(
        |err| match err {
            AtomicWriteError::Io(source) => ExportError::Write {
                path: path.to_path_buf(),
                source,
            },
            AtomicWriteError::Content(source) => ExportError::Serialize {
                path: path.to_path_buf(),
                source,
            },
        },
    )?;

    debug!(path = %path.display(), "Wrote JSON export");
    Ok(())
}
