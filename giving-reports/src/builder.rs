//! Join and aggregate: contacts × ledger → one report context per donor.

use std::fmt;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Serialize;

use giving_core::{ContactBook, CurrencyFormat, DonorLedger};
use giving_renderer::StatementContext;

/// Everything needed to render and deliver one donor's statement.
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub donor: String,
    /// Empty when the contact has no email on file.
    pub email: String,
    /// Exact, unrounded sum of the donor's line items.
    pub total: Decimal,
    pub statement: StatementContext,
}

/// A ledger donor with no matching contact record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrityError {
    pub donor: String,
    pub line_items: usize,
}

impl fmt::Display for IntegrityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "donor '{}' ({} donations) is not present in the contact list",
            self.donor, self.line_items
        )
    }
}

/// Result of joining the two exports.
#[derive(Debug, Clone, Default)]
pub struct Joined {
    /// Matched donors, in ledger order.
    pub contexts: Vec<ReportContext>,
    pub integrity_errors: Vec<IntegrityError>,
}

/// Join every ledger donor with its contact and compute the total.
///
/// Donors missing from `contacts` are logged and returned as integrity
/// errors; they never stop the remaining donors.
pub fn build_contexts(
    contacts: &ContactBook,
    ledger: &DonorLedger,
    currency: &CurrencyFormat,
) -> Joined {
    let mut joined = Joined::default();
    for entry in ledger.iter() {
        let Some(contact) = contacts.get(&entry.name) else {
            let error = IntegrityError {
                donor: entry.name.clone(),
                line_items: entry.items.len(),
            };
            tracing::error!(donor = %entry.name, "{error}");
            joined.integrity_errors.push(error);
            continue;
        };

        let total = entry.total();
        let statement = StatementContext::from_donor(contact, entry, currency.format(&total));
        joined.contexts.push(ReportContext {
            donor: entry.name.clone(),
            email: contact.email.clone(),
            total,
            statement,
        });
    }
    joined
}

/// File stem for a donor: commas dropped, spaces and path separators
/// replaced with `_`.
pub fn sanitize_name(donor: &str) -> String {
    donor
        .chars()
        .filter(|c| *c != ',')
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            other => other,
        })
        .collect()
}

/// `<dir>/<sanitized donor>.<extension>`
pub fn output_path(dir: &Path, donor: &str, extension: &str) -> PathBuf {
    dir.join(format!("{}.{extension}", sanitize_name(donor)))
}
