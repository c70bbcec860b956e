//! Domain types for the giving statement pipeline.
//!
//! Loaded once per run and never mutated after the loaders return.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Contacts
// ---------------------------------------------------------------------------

/// A single row of the contact export.
///
/// Optional fields hold an empty string when the export left them blank or
/// used the `--` placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contact {
    pub name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

impl Contact {
    /// `true` when there is an address the statement can be emailed to.
    pub fn has_email(&self) -> bool {
        !self.email.is_empty()
    }
}

/// Contacts keyed by full name.
#[derive(Debug, Clone, Default)]
pub struct ContactBook {
    contacts: HashMap<String, Contact>,
}

impl ContactBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a contact, returning the entry it replaced (last row wins).
    pub fn insert(&mut self, contact: Contact) -> Option<Contact> {
        self.contacts.insert(contact.name.clone(), contact)
    }

    pub fn get(&self, name: &str) -> Option<&Contact> {
        self.contacts.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.contacts.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Donations
// ---------------------------------------------------------------------------

/// One donation as it appeared in the ledger export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonationLineItem {
    /// Date exactly as exported; never reparsed.
    pub date: String,
    /// Amount exactly as exported, currency formatting included.
    pub raw_amount: String,
    /// `raw_amount` with formatting stripped, exact.
    pub amount: Decimal,
}

/// All line items for one donor, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonorEntry {
    pub name: String,
    pub items: Vec<DonationLineItem>,
}

impl DonorEntry {
    /// Exact sum of every line item.
    pub fn total(&self) -> Decimal {
        self.items.iter().map(|item| item.amount).sum()
    }
}

/// Donor name → ordered line items, iterated in order of first appearance.
#[derive(Debug, Clone, Default)]
pub struct DonorLedger {
    entries: Vec<DonorEntry>,
    index: HashMap<String, usize>,
}

impl DonorLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an entry for `name`. Returns `false` if the donor was already open,
    /// in which case the existing entry keeps its items.
    pub fn open(&mut self, name: &str) -> bool {
        if self.index.contains_key(name) {
            return false;
        }
        self.index.insert(name.to_owned(), self.entries.len());
        self.entries.push(DonorEntry {
            name: name.to_owned(),
            items: Vec::new(),
        });
        true
    }

    /// Append a line item to an open donor. Returns `false` if `name` was never opened.
    pub fn push(&mut self, name: &str, item: DonationLineItem) -> bool {
        match self.index.get(name) {
            Some(&i) => {
                self.entries[i].items.push(item);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, name: &str) -> Option<&DonorEntry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &DonorEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
