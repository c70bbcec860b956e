//! Error types for giving-delivery.

use thiserror::Error;

/// All errors that can arise while delivering a statement.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// A sender or recipient address did not parse.
    #[error("invalid email address '{address}': {source}")]
    Address {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },

    /// The attachment MIME type did not parse.
    #[error("invalid content type '{0}'")]
    ContentType(String),

    /// The message could not be assembled.
    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    /// Authentication, TLS, or network failure talking to the SMTP server.
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}
