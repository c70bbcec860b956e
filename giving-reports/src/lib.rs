//! # giving-reports
//!
//! Joins contacts with the donation ledger and produces one statement per
//! matched donor.
//!
//! Call [`builder::build_contexts`] for the pure join/aggregate step, or
//! [`Pipeline::run`] to render, write, and optionally email every statement.

pub mod builder;
pub mod error;
pub mod pipeline;
pub mod writer;

pub use builder::{build_contexts, output_path, sanitize_name, IntegrityError, Joined, ReportContext};
pub use error::ReportError;
pub use pipeline::{DonorOutcome, Pipeline, RunOptions, RunSummary};
pub use writer::atomic_write;
