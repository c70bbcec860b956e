//! Contact list loader.
//!
//! The export starts with two boilerplate lines and a header line, then one
//! contact per row, and ends with a timestamp row whose name column carries
//! the footer marker. Rows after the footer are ignored.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};

use crate::error::{csv_err, io_err, LoadError};
use crate::schema::ContactSchema;
use crate::types::{Contact, ContactBook};

/// Load the contact export at `path`.
pub fn load_contacts(path: &Path, schema: &ContactSchema) -> Result<ContactBook, LoadError> {
    let file = File::open(path).map_err(|e| io_err(path, e))?;
    read_contacts(file, path, schema)
}

/// Load contacts from any reader; `source` is used in error messages only.
pub fn read_contacts<R: Read>(
    reader: R,
    source: &Path,
    schema: &ContactSchema,
) -> Result<ContactBook, LoadError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut book = ContactBook::new();
    for result in reader.records() {
        let record = result.map_err(|e| csv_err(source, e))?;
        let line = line_of(&record);
        if line <= schema.leading_lines || is_blank(&record) {
            continue;
        }

        let name = record.get(schema.name).unwrap_or("").trim();
        if name.contains(&schema.footer_marker) {
            break;
        }
        if record.len() < schema.min_columns() {
            return Err(LoadError::MalformedRecord {
                path: source.to_path_buf(),
                line,
                expected: schema.min_columns(),
                found: record.len(),
            });
        }

        let contact = Contact {
            name: name.to_string(),
            email: schema.normalize(&record[schema.email]),
            address: schema.normalize(&record[schema.address]),
            city: schema.normalize(&record[schema.city]),
            state: schema.normalize(&record[schema.state]),
            postal_code: schema.normalize(&record[schema.postal_code]),
        };
        if book.insert(contact).is_some() {
            tracing::warn!(contact = %name, line, "duplicate contact; keeping the later row");
        }
    }

    tracing::debug!(count = book.len(), path = %source.display(), "loaded contacts");
    Ok(book)
}

pub(crate) fn line_of(record: &StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

pub(crate) fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|field| field.trim().is_empty())
}
