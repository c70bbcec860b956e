//! Statement mail assembly and SMTP submission.

use std::fmt;

use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, Message, SmtpTransport, Transport};

use crate::error::DeliveryError;

/// Who the statements come from.
#[derive(Clone)]
pub struct SenderIdentity {
    pub address: String,
    pub display_name: String,
    pub password: String,
}

impl fmt::Debug for SenderIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SenderIdentity")
            .field("address", &self.address)
            .field("display_name", &self.display_name)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Server and fixed message text, identical for every donor in a run.
#[derive(Debug, Clone)]
pub struct MailSettings {
    pub host: String,
    pub port: u16,
    pub subject: String,
    pub body: String,
}

/// One outgoing statement.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub to: String,
    /// Attachment file name as the donor will see it.
    pub attachment_name: String,
    pub attachment: Vec<u8>,
    pub content_type: String,
}

/// Delivers a statement to a single donor.
pub trait Mailer {
    fn send(&self, envelope: &Envelope) -> Result<(), DeliveryError>;
}

fn parse_address(address: &str) -> Result<Address, DeliveryError> {
    address
        .trim()
        .parse::<Address>()
        .map_err(|source| DeliveryError::Address {
            address: address.to_string(),
            source,
        })
}

/// Assemble the multipart message: plain-text body plus the statement.
pub fn build_message(
    sender: &SenderIdentity,
    settings: &MailSettings,
    envelope: &Envelope,
) -> Result<Message, DeliveryError> {
    let from = Mailbox::new(
        Some(sender.display_name.clone()).filter(|name| !name.is_empty()),
        parse_address(&sender.address)?,
    );
    let to = Mailbox::new(None, parse_address(&envelope.to)?);
    let content_type = ContentType::parse(&envelope.content_type)
        .map_err(|_| DeliveryError::ContentType(envelope.content_type.clone()))?;

    let message = Message::builder()
        .from(from)
        .to(to)
        .subject(settings.subject.clone())
        .multipart(
            MultiPart::mixed()
                .singlepart(SinglePart::plain(settings.body.clone()))
                .singlepart(
                    Attachment::new(envelope.attachment_name.clone())
                        .body(envelope.attachment.clone(), content_type),
                ),
        )?;
    Ok(message)
}

/// Authenticated SMTPS mailer.
pub struct SmtpMailer {
    sender: SenderIdentity,
    settings: MailSettings,
    transport: SmtpTransport,
}

impl SmtpMailer {
    /// Configure the transport. No connection is made until the first send.
    pub fn new(sender: SenderIdentity, settings: MailSettings) -> Result<Self, DeliveryError> {
        let transport = SmtpTransport::relay(&settings.host)?
            .port(settings.port)
            .credentials(Credentials::new(
                sender.address.clone(),
                sender.password.clone(),
            ))
            .build();
        Ok(SmtpMailer {
            sender,
            settings,
            transport,
        })
    }
}

impl Mailer for SmtpMailer {
    fn send(&self, envelope: &Envelope) -> Result<(), DeliveryError> {
        let message = build_message(&self.sender, &self.settings, envelope)?;
        self.transport.send(&message)?;
        tracing::info!(to = %envelope.to, attachment = %envelope.attachment_name, "message sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sender() -> SenderIdentity {
        SenderIdentity {
            address: "office@example.org".to_string(),
            display_name: "Helping Hands Bakery".to_string(),
            password: "app-password".to_string(),
        }
    }

    fn settings() -> MailSettings {
        MailSettings {
            host: "smtp.example.org".to_string(),
            port: 465,
            subject: "2024 Giving Statement".to_string(),
            body: "Thank you for your support.".to_string(),
        }
    }

    fn envelope(to: &str) -> Envelope {
        Envelope {
            to: to.to_string(),
            attachment_name: "Jane_Doe.pdf".to_string(),
            attachment: b"%PDF-1.4 fake".to_vec(),
            content_type: "application/pdf".to_string(),
        }
    }

    #[test]
    fn message_carries_headers_body_and_attachment() {
        let message = build_message(&sender(), &settings(), &envelope("jane@example.com"))
            .expect("build");
        let raw = String::from_utf8(message.formatted()).expect("utf8");
        assert!(raw.contains("Subject: 2024 Giving Statement"));
        assert!(raw.contains("Helping Hands Bakery"));
        assert!(raw.contains("<office@example.org>"));
        assert!(raw.contains("jane@example.com"));
        assert!(raw.contains("Thank you for your support."));
        assert!(raw.contains("Jane_Doe.pdf"));
        assert!(raw.contains("Content-Type: application/pdf"));
    }

    #[test]
    fn bad_recipient_is_address_error() {
        let err = build_message(&sender(), &settings(), &envelope("not an address")).unwrap_err();
        assert!(matches!(err, DeliveryError::Address { .. }), "got: {err}");
        assert!(err.to_string().contains("not an address"));
    }

    #[test]
    fn bad_content_type_is_rejected() {
        let mut env = envelope("jane@example.com");
        env.content_type = "not a mime".to_string();
        let err = build_message(&sender(), &settings(), &env).unwrap_err();
        assert!(matches!(err, DeliveryError::ContentType(_)));
    }

    #[test]
    fn debug_output_redacts_password() {
        let rendered = format!("{:?}", sender());
        assert!(!rendered.contains("app-password"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn mailer_construction_does_not_connect() {
        SmtpMailer::new(sender(), settings()).expect("transport config only");
    }
}
