//! Error types for giving-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while loading an export file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Underlying I/O failure opening or reading the export.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader could not decode a record.
    #[error("failed to read CSV record in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A data row has fewer columns than the row schema consumes.
    #[error("malformed record in {path} at line {line}: expected at least {expected} columns, found {found}")]
    MalformedRecord {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },

    /// A line item appeared before any donor row opened a ledger entry.
    #[error("line item in {path} at line {line} does not follow a donor row")]
    OrphanLineItem { path: PathBuf, line: u64 },

    /// An amount column held no parseable number.
    #[error("invalid amount {raw:?} in {path} at line {line}")]
    InvalidAmount {
        path: PathBuf,
        line: u64,
        raw: String,
    },
}

/// All errors that can arise from loading run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file did not exist at the given path.
    #[error("config not found at {path}")]
    NotFound { path: PathBuf },

    /// YAML parse error, with the offending file.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `currency.locale` is not a name `num-format` knows.
    #[error("unknown locale '{0}'")]
    UnknownLocale(String),
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> LoadError {
    LoadError::Io {
        path: path.into(),
        source,
    }
}

pub(crate) fn csv_err(path: impl Into<PathBuf>, source: csv::Error) -> LoadError {
    LoadError::Csv {
        path: path.into(),
        source,
    }
}
