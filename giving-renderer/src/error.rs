//! Error types for giving-renderer.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while producing a statement document.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Tera template engine error.
    #[error("template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// Filesystem error while loading a user template.
    #[error("template io error at {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },

    /// The converter program could not be started or fed.
    #[error("failed to run converter '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The converter exited unsuccessfully.
    #[error("converter '{program}' failed ({status}): {stderr}")]
    Converter {
        program: String,
        status: String,
        stderr: String,
    },

    /// The converter exited cleanly but produced nothing.
    #[error("converter '{program}' produced no output")]
    EmptyOutput { program: String },
}
