//! # giving-delivery
//!
//! Sends a rendered statement to a donor as an email attachment.
//!
//! [`Mailer`] is the seam the report builder depends on; [`SmtpMailer`]
//! submits over implicit TLS with the sender's credentials.

pub mod error;
pub mod mailer;

pub use error::DeliveryError;
pub use mailer::{build_message, Envelope, MailSettings, Mailer, SenderIdentity, SmtpMailer};
