//! Fixed-position row layouts for the two accounting exports.
//!
//! Both exports are produced by the bookkeeping system with a few lines of
//! boilerplate, a header line, then data. Column positions live here and
//! nowhere else so a new export version only touches these tables.
//!
//! Line numbers are physical, 1-based, as reported by the CSV reader.

use serde::{Deserialize, Serialize};

/// Layout of the customer contact list export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactSchema {
    /// Lines before the first data row (boilerplate plus header).
    pub leading_lines: u64,
    pub name: usize,
    pub email: usize,
    pub address: usize,
    pub city: usize,
    pub state: usize,
    pub postal_code: usize,
    /// Substring of the name column marking the trailing timestamp row.
    pub footer_marker: String,
    /// Value the export writes for an empty field.
    pub placeholder: String,
}

impl Default for ContactSchema {
    fn default() -> Self {
        Self {
            leading_lines: 3,
            name: 0,
            email: 4,
            address: 5,
            city: 6,
            state: 7,
            postal_code: 8,
            footer_marker: " UTC".to_string(),
            placeholder: "--".to_string(),
        }
    }
}

impl ContactSchema {
    /// Smallest record width a contact row must have.
    pub fn min_columns(&self) -> usize {
        [
            self.name,
            self.email,
            self.address,
            self.city,
            self.state,
            self.postal_code,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
            + 1
    }

    /// Replace the placeholder token with an empty string.
    pub fn normalize(&self, value: &str) -> String {
        let value = value.trim();
        if value == self.placeholder {
            String::new()
        } else {
            value.to_string()
        }
    }
}

/// Layout of the sales-by-customer detail export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DonationSchema {
    /// Lines before the first data row (boilerplate plus header).
    pub leading_lines: u64,
    /// Column holding the donor name on a donor row; empty on line items.
    pub name: usize,
    pub date: usize,
    pub amount: usize,
    /// Substring of the name column marking the trailing timestamp row.
    pub footer_marker: String,
    /// Substring of the name column marking a per-donor subtotal row.
    pub subtotal_marker: String,
}

impl Default for DonationSchema {
    fn default() -> Self {
        Self {
            leading_lines: 4,
            name: 0,
            date: 2,
            amount: 9,
            footer_marker: " UTC".to_string(),
            subtotal_marker: "Total for".to_string(),
        }
    }
}

impl DonationSchema {
    /// Smallest record width a line-item row must have.
    pub fn min_columns(&self) -> usize {
        self.name.max(self.date).max(self.amount) + 1
    }

    /// `true` for footer and subtotal rows, judged on the name column.
    pub fn is_skipped(&self, name_field: &str) -> bool {
        name_field.contains(&self.footer_marker) || name_field.contains(&self.subtotal_marker)
    }
}
