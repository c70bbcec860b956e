//! Run configuration.
//!
//! Every field has a default, so a config file only needs the keys it
//! changes. Command-line flags are applied on top by the CLI.
//!
//! ```yaml
//! organization: Helping Hands Bakery
//! output_dir: reports
//! currency:
//!   locale: en
//!   symbol: "$"
//! email:
//!   subject: 2024 Giving Statement
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::money::CurrencyFormat;
use crate::schema::{ContactSchema, DonationSchema};

pub const DEFAULT_SUBJECT: &str = "2024 Giving Statement";
pub const DEFAULT_BODY: &str = "We want to sincerely thank you for your generosity to our \
ministry. Your support contributed to furthering our mission of giving hope, through the \
gift of a homemade birthday cake, to children who otherwise may not receive one. Your \
generosity will help us to continue this mission into the year 2025. Your 2024 giving \
summary is attached.";

/// Root of the YAML config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Shown in the statement heading.
    pub organization: String,
    /// Year the statement covers.
    pub year: u16,
    pub output_dir: PathBuf,
    pub currency: CurrencyConfig,
    pub email: EmailConfig,
    pub converter: ConverterConfig,
    pub contacts: ContactSchema,
    pub donations: DonationSchema,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            organization: String::new(),
            year: 2024,
            output_dir: PathBuf::from("reports"),
            currency: CurrencyConfig::default(),
            email: EmailConfig::default(),
            converter: ConverterConfig::default(),
            contacts: ContactSchema::default(),
            donations: DonationSchema::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyConfig {
    /// A `num-format` locale name.
    pub locale: String,
    pub symbol: String,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            locale: "en".to_string(),
            symbol: "$".to_string(),
        }
    }
}

/// Fixed message settings; the same subject and body go to every donor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    pub smtp_host: String,
    /// Implicit-TLS submission port.
    pub smtp_port: u16,
    pub subject: String,
    pub body: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 465,
            subject: DEFAULT_SUBJECT.to_string(),
            body: DEFAULT_BODY.to_string(),
        }
    }
}

/// External HTML-to-PDF program. It reads HTML on stdin and writes the
/// document to stdout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            program: "wkhtmltopdf".to_string(),
            args: vec!["--quiet".to_string(), "-".to_string(), "-".to_string()],
        }
    }
}

impl Config {
    /// Load a config file. Missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Resolve the currency settings into a formatter.
    pub fn currency_format(&self) -> Result<CurrencyFormat, ConfigError> {
        CurrencyFormat::from_name(&self.currency.locale, self.currency.symbol.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_export_layout() {
        let config = Config::default();
        assert_eq!(config.output_dir, PathBuf::from("reports"));
        assert_eq!(config.email.smtp_port, 465);
        assert_eq!(config.email.subject, DEFAULT_SUBJECT);
        assert_eq!(config.contacts.email, 4);
        assert_eq!(config.donations.amount, 9);
    }

    #[test]
    fn empty_document_is_all_defaults() {
        let config: Config = serde_yaml::from_str("{}").expect("parse");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn default_currency_resolves() {
        let fmt = Config::default().currency_format().expect("currency");
        assert_eq!(fmt.format(&rust_decimal::Decimal::new(150, 2)), "$1.50");
    }
}
