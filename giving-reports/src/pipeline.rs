//! Per-donor render → write → deliver pass.
//!
//! Donors are processed one at a time in ledger order. A render, write, or
//! delivery failure is logged and recorded against that donor only; the
//! pass always continues with the next donor. Failures are reported through
//! [`RunSummary::has_failures`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use giving_core::{ContactBook, CurrencyFormat, DonorLedger};
use giving_delivery::{Envelope, Mailer};
use giving_renderer::{DocumentConverter, TemplateEngine};

use crate::builder::{build_contexts, output_path, IntegrityError, ReportContext};
use crate::error::{io_err, ReportError};
use crate::writer::atomic_write;

/// Per-run settings.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub output_dir: PathBuf,
    /// Render every statement but write and send nothing.
    pub dry_run: bool,
    pub organization: String,
    pub year: u16,
}

/// What happened to one matched donor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DonorOutcome {
    /// Statement written; email not requested.
    Written { donor: String, path: PathBuf },
    /// Statement written and emailed.
    Delivered { donor: String, path: PathBuf, to: String },
    /// Email requested but the contact has no address; mail it by hand.
    NeedsManualDelivery { donor: String, path: PathBuf },
    /// Dry run: the statement rendered and would be written here.
    WouldWrite { donor: String, path: PathBuf },
    /// Rendering, conversion, or writing failed; nothing was written.
    RenderFailed { donor: String, error: String },
    /// Statement written but sending failed.
    DeliveryFailed {
        donor: String,
        path: PathBuf,
        to: String,
        error: String,
    },
    /// File name already taken by an earlier donor this run; nothing written.
    NameCollision {
        donor: String,
        path: PathBuf,
        taken_by: String,
    },
}

impl DonorOutcome {
    pub fn donor(&self) -> &str {
        match self {
            DonorOutcome::Written { donor, .. }
            | DonorOutcome::Delivered { donor, .. }
            | DonorOutcome::NeedsManualDelivery { donor, .. }
            | DonorOutcome::WouldWrite { donor, .. }
            | DonorOutcome::RenderFailed { donor, .. }
            | DonorOutcome::DeliveryFailed { donor, .. }
            | DonorOutcome::NameCollision { donor, .. } => donor,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            DonorOutcome::RenderFailed { .. }
                | DonorOutcome::DeliveryFailed { .. }
                | DonorOutcome::NameCollision { .. }
        )
    }
}

/// Outcome of a whole run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub outcomes: Vec<DonorOutcome>,
    pub integrity_errors: Vec<IntegrityError>,
}

impl RunSummary {
    /// `true` if any donor failed to render, write, or send.
    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(DonorOutcome::is_failure)
    }

    pub fn count(&self, pred: impl Fn(&DonorOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(*o)).count()
    }
}

/// The collaborators a run needs. Email is requested iff `mailer` is set.
pub struct Pipeline<'a> {
    pub engine: &'a TemplateEngine,
    pub converter: &'a dyn DocumentConverter,
    pub currency: &'a CurrencyFormat,
    pub mailer: Option<&'a dyn Mailer>,
}

impl Pipeline<'_> {
    /// Join, then render/write/deliver each matched donor in ledger order.
    ///
    /// Only failing to create the output directory aborts the run.
    pub fn run(
        &self,
        options: &RunOptions,
        contacts: &ContactBook,
        ledger: &DonorLedger,
    ) -> Result<RunSummary, ReportError> {
        let joined = build_contexts(contacts, ledger, self.currency);

        if !options.dry_run {
            std::fs::create_dir_all(&options.output_dir)
                .map_err(|e| io_err(&options.output_dir, e))?;
        }

        // Sanitized file name -> donor that claimed it first.
        let mut claimed: HashMap<PathBuf, String> = HashMap::new();
        let mut outcomes = Vec::with_capacity(joined.contexts.len());
        for mut ctx in joined.contexts {
            ctx.statement = ctx
                .statement
                .with_organization(options.organization.clone(), options.year);
            let path = output_path(&options.output_dir, &ctx.donor, self.converter.extension());
            if let Some(first) = claimed.get(&path) {
                tracing::error!(
                    donor = %ctx.donor,
                    taken_by = %first,
                    path = %path.display(),
                    "statement file name already used by another donor this run; not written"
                );
                outcomes.push(DonorOutcome::NameCollision {
                    donor: ctx.donor.clone(),
                    path,
                    taken_by: first.clone(),
                });
                continue;
            }
            claimed.insert(path.clone(), ctx.donor.clone());
            outcomes.push(self.process(&ctx, path, options.dry_run));
        }

        Ok(RunSummary {
            outcomes,
            integrity_errors: joined.integrity_errors,
        })
    }

    fn process(&self, ctx: &ReportContext, path: PathBuf, dry_run: bool) -> DonorOutcome {
        let donor = ctx.donor.clone();

        let html = match self.engine.render(&ctx.statement) {
            Ok(html) => html,
            Err(e) => return render_failed(donor, ReportError::from(e)),
        };

        if dry_run {
            tracing::info!(donor = %donor, path = %path.display(), total = %ctx.statement.total, "[dry-run] would write statement");
            return DonorOutcome::WouldWrite { donor, path };
        }

        let bytes = match self.write(&html, &path) {
            Ok(bytes) => bytes,
            Err(e) => return render_failed(donor, e),
        };
        tracing::info!(donor = %donor, path = %path.display(), total = %ctx.statement.total, "wrote statement");

        let Some(mailer) = self.mailer else {
            return DonorOutcome::Written { donor, path };
        };

        if ctx.email.is_empty() {
            tracing::warn!(donor = %donor, path = %path.display(), "no email on file; must mail statement manually");
            return DonorOutcome::NeedsManualDelivery { donor, path };
        }

        let envelope = Envelope {
            to: ctx.email.clone(),
            attachment_name: file_name(&path),
            attachment: bytes,
            content_type: self.converter.content_type().to_string(),
        };
        match mailer.send(&envelope) {
            Ok(()) => DonorOutcome::Delivered {
                donor,
                path,
                to: envelope.to,
            },
            Err(e) => {
                let error = ReportError::from(e);
                tracing::error!(donor = %donor, to = %envelope.to, error = %error, "delivery failed");
                DonorOutcome::DeliveryFailed {
                    donor,
                    path,
                    to: envelope.to,
                    error: error.to_string(),
                }
            }
        }
    }

    fn write(&self, html: &str, path: &Path) -> Result<Vec<u8>, ReportError> {
        let bytes = self.converter.convert(html)?;
        atomic_write(path, &bytes)?;
        Ok(bytes)
    }
}

fn render_failed(donor: String, error: ReportError) -> DonorOutcome {
    tracing::error!(donor = %donor, error = %error, "statement not produced");
    DonorOutcome::RenderFailed {
        donor,
        error: error.to_string(),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
