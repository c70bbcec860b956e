//! `giving inspect`: join the exports and show what would be produced.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use giving_reports::{build_contexts, IntegrityError};

use super::InputArgs;

/// Arguments for `giving inspect`.
#[derive(Args, Debug)]
pub struct InspectArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Debug, Serialize)]
struct DonorRow {
    donor: String,
    donations: usize,
    total: String,
    /// Unformatted decimal sum, e.g. `1234.50`.
    exact_total: String,
    email: String,
}

#[derive(Debug, Serialize)]
struct InspectReport {
    donors: Vec<DonorRow>,
    integrity_errors: Vec<IntegrityError>,
}

#[derive(Tabled)]
struct InspectTableRow {
    #[tabled(rename = "donor")]
    donor: String,
    #[tabled(rename = "donations")]
    donations: usize,
    #[tabled(rename = "total")]
    total: String,
    #[tabled(rename = "email")]
    email: String,
}

impl InspectArgs {
    pub fn run(self, json: bool) -> Result<()> {
        let config = self.input.load_config()?;
        let currency = config.currency_format().context("invalid currency settings")?;
        let (contacts, ledger) = self.input.load(&config)?;

        let joined = build_contexts(&contacts, &ledger, &currency);
        let report = InspectReport {
            donors: joined
                .contexts
                .into_iter()
                .map(|ctx| DonorRow {
                    donations: ctx.statement.donations.len(),
                    total: ctx.statement.total,
                    exact_total: ctx.total.to_string(),
                    email: ctx.email,
                    donor: ctx.donor,
                })
                .collect(),
            integrity_errors: joined.integrity_errors,
        };

        if json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("failed to serialize inspect JSON")?
            );
        } else {
            print_table(report);
        }
        Ok(())
    }
}

fn print_table(report: InspectReport) {
    println!(
        "{} matched donors | {} without a contact",
        report.donors.len(),
        report.integrity_errors.len()
    );

    if !report.donors.is_empty() {
        let rows: Vec<InspectTableRow> = report
            .donors
            .into_iter()
            .map(|row| InspectTableRow {
                donor: row.donor,
                donations: row.donations,
                total: row.total,
                email: if row.email.is_empty() {
                    "none (mail manually)".yellow().to_string()
                } else {
                    row.email
                },
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
    }

    for error in &report.integrity_errors {
        println!("{} {error}", "✗".red().bold());
    }
}
