//! Error types for giving-reports.

use std::path::PathBuf;

use thiserror::Error;

use giving_delivery::DeliveryError;
use giving_renderer::RenderError;

/// Errors from producing or delivering a single statement.
///
/// The pipeline records these per donor and keeps going; only output
/// directory setup aborts a run.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    #[error("delivery error: {0}")]
    Delivery(#[from] DeliveryError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`ReportError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ReportError {
    ReportError::Io {
        path: path.into(),
        source,
    }
}
