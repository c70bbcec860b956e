//! Statement context: the serializable payload one statement is rendered from.

use serde::Serialize;

use giving_core::{Contact, DonorEntry};

use crate::error::RenderError;

/// Everything the statement template can reference.
#[derive(Debug, Clone, Serialize)]
pub struct StatementContext {
    pub donor_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub email: String,
    /// Line items in export order, amounts as exported.
    pub donations: Vec<LineItemCtx>,
    /// Locale-formatted sum of `donations`.
    pub total: String,
    pub organization: String,
    pub year: u16,
}

#[derive(Debug, Clone, Serialize)]
pub struct LineItemCtx {
    pub date: String,
    pub amount: String,
}

impl StatementContext {
    /// Join a contact with its ledger entry. `total` is already formatted.
    pub fn from_donor(contact: &Contact, entry: &DonorEntry, total: String) -> Self {
        StatementContext {
            donor_name: entry.name.clone(),
            address: contact.address.clone(),
            city: contact.city.clone(),
            state: contact.state.clone(),
            zip: contact.postal_code.clone(),
            email: contact.email.clone(),
            donations: entry
                .items
                .iter()
                .map(|item| LineItemCtx {
                    date: item.date.clone(),
                    amount: item.raw_amount.clone(),
                })
                .collect(),
            total,
            organization: String::new(),
            year: 0,
        }
    }

    pub fn with_organization(mut self, organization: impl Into<String>, year: u16) -> Self {
        self.organization = organization.into();
        self.year = year;
        self
    }

    /// Convert to a [`tera::Context`] for rendering.
    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        tera::Context::from_serialize(self).map_err(RenderError::from)
    }
}
