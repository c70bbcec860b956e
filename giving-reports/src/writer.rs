//! Atomic artifact writer.
//!
//! The document is written to `<path>.tmp` and renamed over the final path,
//! so a failed write never leaves a truncated statement under the real name.

use std::path::{Path, PathBuf};

use crate::error::{io_err, ReportError};

/// Atomically write `bytes` to `path`, creating parent directories.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> Result<(), ReportError> {
    let tmp = PathBuf::from(format!("{}.tmp", path.display()));
    atomic_write_with_tmp(path, bytes, &tmp)
}

fn atomic_write_with_tmp(path: &Path, bytes: &[u8], tmp: &Path) -> Result<(), ReportError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    if let Some(tmp_parent) = tmp.parent() {
        std::fs::create_dir_all(tmp_parent).map_err(|e| io_err(tmp_parent, e))?;
    }

    if let Err(e) = std::fs::write(tmp, bytes) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(tmp, e));
    }

    if let Err(e) = std::fs::rename(tmp, path) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(path, e));
    }

    tracing::debug!("wrote: {}", path.display());
    Ok(())
}
