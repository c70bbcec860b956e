//! `giving generate`: render, write, and optionally email every statement.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use giving_core::Config;
use giving_delivery::{MailSettings, Mailer, SenderIdentity, SmtpMailer};
use giving_renderer::{converter_for, DocumentFormat, TemplateEngine};
use giving_reports::{DonorOutcome, Pipeline, RunOptions, RunSummary};

use super::{display, InputArgs};
use crate::FormatArg;

/// Arguments for `giving generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Email each statement to the donor's address on file.
    #[arg(long)]
    pub email: bool,

    /// Sender address; also the SMTP login.
    #[arg(long)]
    pub sender: Option<String>,

    /// Display name shown in the From header.
    #[arg(long, default_value = "")]
    pub sender_display: String,

    /// SMTP password (an app password for Gmail).
    #[arg(long, env = "GIVING_SENDER_PASSWORD", hide_env_values = true)]
    pub sender_password: Option<String>,

    /// Statement template replacing the built-in one.
    #[arg(long)]
    pub template: Option<PathBuf>,

    /// Directory statements are written to.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Organization name shown on the statement.
    #[arg(long)]
    pub organization: Option<String>,

    /// Output document type: pdf or html.
    #[arg(long, default_value = "pdf")]
    pub format: FormatArg,

    /// Render every statement without writing or sending anything.
    #[arg(long)]
    pub dry_run: bool,
}

impl GenerateArgs {
    pub fn run(self, json: bool) -> Result<()> {
        let started = Instant::now();
        let mut config = self.input.load_config()?;
        self.apply_overrides(&mut config);
        let sender = self.sender_identity()?;
        self.log_settings(&config, sender.as_ref());

        let currency = config.currency_format().context("invalid currency settings")?;
        let (contacts, ledger) = self.input.load(&config)?;

        let engine = TemplateEngine::new(self.template.as_deref())
            .context("failed to load statement template")?;
        let format = DocumentFormat::from(self.format);
        let converter = converter_for(format, &config.converter);
        let mailer = match sender {
            Some(sender) => Some(
                SmtpMailer::new(
                    sender,
                    MailSettings {
                        host: config.email.smtp_host.clone(),
                        port: config.email.smtp_port,
                        subject: config.email.subject.clone(),
                        body: config.email.body.clone(),
                    },
                )
                .context("failed to configure SMTP transport")?,
            ),
            None => None,
        };

        let pipeline = Pipeline {
            engine: &engine,
            converter: converter.as_ref(),
            currency: &currency,
            mailer: mailer.as_ref().map(|m| m as &dyn Mailer),
        };
        let options = RunOptions {
            output_dir: config.output_dir.clone(),
            dry_run: self.dry_run,
            organization: config.organization.clone(),
            year: config.year,
        };
        let summary = pipeline
            .run(&options, &contacts, &ledger)
            .context("statement generation failed")?;

        if json {
            println!(
                "{}",
                serde_json::to_string_pretty(&summary).context("failed to serialize run JSON")?
            );
        } else {
            print_summary(&summary, self.dry_run);
        }

        tracing::info!("finished");
        tracing::info!("elapsed time: {:.3} seconds", started.elapsed().as_secs_f64());

        let failed = summary.count(DonorOutcome::is_failure);
        if failed > 0 {
            bail!("{failed} statement(s) failed; see the log for details");
        }
        Ok(())
    }

    fn apply_overrides(&self, config: &mut Config) {
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(org) = &self.organization {
            config.organization = org.clone();
        }
    }

    /// `None` unless `--email` was given; then both address and password are required.
    fn sender_identity(&self) -> Result<Option<SenderIdentity>> {
        if !self.email {
            return Ok(None);
        }
        let Some(address) = self.sender.clone() else {
            bail!("--email requires --sender");
        };
        let Some(password) = self.sender_password.clone() else {
            bail!("--email requires --sender-password or GIVING_SENDER_PASSWORD");
        };
        Ok(Some(SenderIdentity {
            address,
            display_name: self.sender_display.clone(),
            password,
        }))
    }

    fn log_settings(&self, config: &Config, sender: Option<&SenderIdentity>) {
        tracing::info!("** Annual Giving Statement Generator **");
        tracing::info!("contacts: {}", super::display(&self.input.contacts));
        tracing::info!("donations: {}", super::display(&self.input.donations));
        tracing::info!("output: {} ({})", super::display(&config.output_dir), self.format);
        tracing::info!("send emails: {}", self.email);
        if let Some(sender) = sender {
            tracing::info!("sender: {} <{}>", sender.display_name, sender.address);
            tracing::info!("sender password: <redacted>");
        }
        if self.dry_run {
            tracing::info!("dry run: nothing will be written or sent");
        }
    }
}

#[derive(Tabled)]
struct OutcomeTableRow {
    #[tabled(rename = "donor")]
    donor: String,
    #[tabled(rename = "status")]
    status: String,
    #[tabled(rename = "detail")]
    detail: String,
}

fn outcome_row(outcome: &DonorOutcome) -> OutcomeTableRow {
    let (status, detail) = match outcome {
        DonorOutcome::Written { path, .. } => ("written".green(), display(path)),
        DonorOutcome::Delivered { to, .. } => ("delivered".green(), to.clone()),
        DonorOutcome::WouldWrite { path, .. } => ("would write".cyan(), display(path)),
        DonorOutcome::NeedsManualDelivery { path, .. } => {
            ("mail manually".yellow(), display(path))
        }
        DonorOutcome::RenderFailed { error, .. } => ("render failed".red(), error.clone()),
        DonorOutcome::DeliveryFailed { error, .. } => ("delivery failed".red(), error.clone()),
        DonorOutcome::NameCollision { path, taken_by, .. } => (
            "name collision".red(),
            format!("{} already used by {taken_by}", display(path)),
        ),
    };
    OutcomeTableRow {
        donor: outcome.donor().to_string(),
        status: status.bold().to_string(),
        detail,
    }
}

fn print_summary(summary: &RunSummary, dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    let ok = summary.outcomes.len() - summary.count(DonorOutcome::is_failure);
    println!(
        "{prefix}{} statements produced, {} failed, {} donors without a contact",
        ok,
        summary.count(DonorOutcome::is_failure),
        summary.integrity_errors.len(),
    );

    if !summary.outcomes.is_empty() {
        let rows: Vec<OutcomeTableRow> = summary.outcomes.iter().map(outcome_row).collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
    }

    for error in &summary.integrity_errors {
        println!("{} {error}", "✗".red().bold());
    }
}
