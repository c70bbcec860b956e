pub mod generate;
pub mod inspect;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use giving_core::{
    contacts::load_contacts, donations::load_donations, Config, ContactBook, DonorLedger,
};

/// Input files and config shared by every command.
#[derive(Args, Debug)]
pub struct InputArgs {
    /// Customer contact list export.
    #[arg(long, default_value = "CustomerContactList.csv")]
    pub contacts: PathBuf,

    /// Sales-by-customer detail export.
    #[arg(long, default_value = "SalesByCustomerDetail.csv")]
    pub donations: PathBuf,

    /// YAML config file; built-in defaults when omitted.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl InputArgs {
    pub fn load_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => Config::load(path).context("failed to load config"),
            None => Ok(Config::default()),
        }
    }

    /// Load both exports. Any parse error aborts the run.
    pub fn load(&self, config: &Config) -> Result<(ContactBook, DonorLedger)> {
        let contacts = load_contacts(&self.contacts, &config.contacts)
            .with_context(|| format!("failed to load contacts from {}", self.contacts.display()))?;
        tracing::info!(count = contacts.len(), path = %self.contacts.display(), "loaded contacts");

        let ledger = load_donations(&self.donations, &config.donations).with_context(|| {
            format!("failed to load donations from {}", self.donations.display())
        })?;
        tracing::info!(donors = ledger.len(), path = %self.donations.display(), "loaded donations");

        Ok((contacts, ledger))
    }
}

pub(crate) fn display(path: &Path) -> String {
    path.display().to_string()
}
