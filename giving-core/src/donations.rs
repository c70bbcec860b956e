//! Donation-detail ledger loader.
//!
//! After three boilerplate lines and a header, the export groups donations by
//! donor: a row with a name in the first column opens the donor, following
//! rows with an empty first column are that donor's line items, and a
//! "Total for …" row closes the group. A timestamp row ends the file.
//!
//! Rows are classified in this order: blank, footer/subtotal, donor,
//! line item. Subtotal rows carry a name so they must be caught before the
//! donor check.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};

use crate::contacts::{is_blank, line_of};
use crate::error::{csv_err, io_err, LoadError};
use crate::money::parse_amount;
use crate::schema::DonationSchema;
use crate::types::{DonationLineItem, DonorLedger};

/// How a single export row is treated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKind {
    Skip,
    Donor(String),
    LineItem,
}

/// Classify a data row. Only the name column is consulted.
pub fn classify(record: &StringRecord, schema: &DonationSchema) -> RowKind {
    if is_blank(record) {
        return RowKind::Skip;
    }
    let name = record.get(schema.name).unwrap_or("").trim();
    if schema.is_skipped(name) {
        RowKind::Skip
    } else if !name.is_empty() {
        RowKind::Donor(name.to_string())
    } else {
        RowKind::LineItem
    }
}

/// Load the donation export at `path`.
pub fn load_donations(path: &Path, schema: &DonationSchema) -> Result<DonorLedger, LoadError> {
    let file = File::open(path).map_err(|e| io_err(path, e))?;
    read_donations(file, path, schema)
}

/// Load donations from any reader; `source` is used in error messages only.
///
/// A line item before any donor row is fatal: the export is not in the
/// expected shape and nothing after it can be attributed safely.
pub fn read_donations<R: Read>(
    reader: R,
    source: &Path,
    schema: &DonationSchema,
) -> Result<DonorLedger, LoadError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut ledger = DonorLedger::new();
    let mut current: Option<String> = None;

    for result in reader.records() {
        let record = result.map_err(|e| csv_err(source, e))?;
        let line = line_of(&record);
        if line <= schema.leading_lines {
            continue;
        }

        current = match classify(&record, schema) {
            RowKind::Skip => current,
            RowKind::Donor(name) => {
                if !ledger.open(&name) {
                    tracing::warn!(donor = %name, line, "donor reopened; appending to earlier entry");
                }
                Some(name)
            }
            RowKind::LineItem => {
                let Some(donor) = current else {
                    return Err(LoadError::OrphanLineItem {
                        path: source.to_path_buf(),
                        line,
                    });
                };
                let item = line_item(&record, line, source, schema)?;
                ledger.push(&donor, item);
                Some(donor)
            }
        };
    }

    tracing::debug!(donors = ledger.len(), path = %source.display(), "loaded donations");
    Ok(ledger)
}

fn line_item(
    record: &StringRecord,
    line: u64,
    source: &Path,
    schema: &DonationSchema,
) -> Result<DonationLineItem, LoadError> {
    if record.len() < schema.min_columns() {
        return Err(LoadError::MalformedRecord {
            path: source.to_path_buf(),
            line,
            expected: schema.min_columns(),
            found: record.len(),
        });
    }
    let raw_amount = record[schema.amount].trim().to_string();
    let amount = parse_amount(&raw_amount).ok_or_else(|| LoadError::InvalidAmount {
        path: source.to_path_buf(),
        line,
        raw: raw_amount.clone(),
    })?;
    Ok(DonationLineItem {
        date: record[schema.date].trim().to_string(),
        raw_amount,
        amount,
    })
}
