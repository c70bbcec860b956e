//! Giving core library: domain types, export loaders, money, configuration.
//!
//! - [`schema`]: fixed-position row layouts for the two accounting exports
//! - [`contacts`]: contact list loader
//! - [`donations`]: donation-detail ledger loader
//! - [`money`]: exact amount parsing and currency formatting
//! - [`config`]: YAML run configuration

pub mod config;
pub mod contacts;
pub mod donations;
pub mod error;
pub mod money;
pub mod schema;
pub mod types;

pub use config::Config;
pub use error::{ConfigError, LoadError};
pub use money::CurrencyFormat;
pub use schema::{ContactSchema, DonationSchema};
pub use types::{Contact, ContactBook, DonationLineItem, DonorEntry, DonorLedger};
