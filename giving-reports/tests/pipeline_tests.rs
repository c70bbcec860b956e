//! End-to-end statement runs against on-disk exports.

use std::cell::RefCell;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use giving_core::{
    contacts::load_contacts, donations::load_donations, ContactBook, ContactSchema,
    CurrencyFormat, DonationSchema, DonorLedger,
};
use giving_delivery::{DeliveryError, Envelope, Mailer};
use giving_renderer::{DocumentConverter, HtmlPassthrough, RenderError, TemplateEngine};
use giving_reports::{DonorOutcome, Pipeline, RunOptions, RunSummary};
use tempfile::TempDir;

const CONTACT_HEADER: &str = "Customer Contact List\n\
    Helping Hands Bakery\n\
    Customer full name,Phone,Fax,Mobile,Email,Billing address,Billing city,Billing state,Billing ZIP code,Billing country\n";

const DONATION_HEADER: &str = "Sales by Customer Detail\n\
    Helping Hands Bakery\n\
    January - December 2024\n\
    ,,Date,Transaction type,Num,Product/Service,Memo/Description,Qty,Sales price,Amount,Balance\n";

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn load(dir: &Path, contacts: &str, donations: &str) -> (ContactBook, DonorLedger) {
    let contact_path = dir.join("CustomerContactList.csv");
    let donation_path = dir.join("SalesByCustomerDetail.csv");
    std::fs::write(&contact_path, format!("{CONTACT_HEADER}{contacts}")).unwrap();
    std::fs::write(&donation_path, format!("{DONATION_HEADER}{donations}")).unwrap();
    (
        load_contacts(&contact_path, &ContactSchema::default()).expect("contacts"),
        load_donations(&donation_path, &DonationSchema::default()).expect("donations"),
    )
}

fn options(dir: &Path) -> RunOptions {
    RunOptions {
        output_dir: dir.join("reports"),
        dry_run: false,
        organization: "Helping Hands Bakery".to_string(),
        year: 2024,
    }
}

/// Records every envelope; fails for addresses listed in `reject`.
#[derive(Default)]
struct RecordingMailer {
    sent: RefCell<Vec<Envelope>>,
    reject: Vec<String>,
}

impl Mailer for RecordingMailer {
    fn send(&self, envelope: &Envelope) -> Result<(), DeliveryError> {
        if self.reject.contains(&envelope.to) {
            return Err(smtp_outage());
        }
        self.sent.borrow_mut().push(envelope.clone());
        Ok(())
    }
}

/// Stand-in for a refused SMTP connection. lettre's SMTP error has no public
/// constructor, so another `DeliveryError` variant carries the failure.
fn smtp_outage() -> DeliveryError {
    DeliveryError::ContentType("smtp outage: connection refused".to_string())
}

/// Fails for one donor's HTML, passes everything else through.
struct FailingFor(&'static str);

impl DocumentConverter for FailingFor {
    fn convert(&self, html: &str) -> Result<Vec<u8>, RenderError> {
        if html.contains(self.0) {
            return Err(RenderError::EmptyOutput {
                program: "fake-converter".to_string(),
            });
        }
        Ok(html.as_bytes().to_vec())
    }

    fn extension(&self) -> &str {
        "html"
    }

    fn content_type(&self) -> &str {
        "text/html"
    }
}

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl CapturedLogs {
    fn lines(&self) -> Vec<String> {
        String::from_utf8(self.0.lock().unwrap().clone())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

fn run_captured(
    pipeline: &Pipeline<'_>,
    options: &RunOptions,
    contacts: &ContactBook,
    ledger: &DonorLedger,
) -> (RunSummary, CapturedLogs) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::INFO)
        .finish();
    let summary = tracing::subscriber::with_default(subscriber, || {
        pipeline.run(options, contacts, ledger).expect("run")
    });
    (summary, logs)
}

fn artifacts(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return vec![];
    };
    let mut paths: Vec<_> = entries.filter_map(|e| e.ok()).map(|e| e.path()).collect();
    paths.sort();
    paths
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn matched_donor_is_rendered_written_and_delivered() {
    let dir = TempDir::new().unwrap();
    let (contacts, ledger) = load(
        dir.path(),
        "Jane Doe,,,,jane@example.com,12 Main St,Springfield,IL,62701,USA\n",
        "Jane Doe,,,,,,,,,,\n\
         ,,03/01/2024,Sales Receipt,1001,Donation,,1,10.00,$10.00,10.00\n\
         ,,07/04/2024,Sales Receipt,1002,Donation,,1,5.50,$5.50,15.50\n\
         Total for Jane Doe,,,,,,,,,$15.50,\n",
    );
    let engine = TemplateEngine::new(None).unwrap();
    let mailer = RecordingMailer::default();
    let currency = CurrencyFormat::default();
    let pipeline = Pipeline {
        engine: &engine,
        converter: &HtmlPassthrough,
        currency: &currency,
        mailer: Some(&mailer),
    };
    let options = options(dir.path());

    let summary = pipeline.run(&options, &contacts, &ledger).expect("run");

    let expected_path = options.output_dir.join("Jane_Doe.html");
    assert_eq!(
        summary.outcomes,
        vec![DonorOutcome::Delivered {
            donor: "Jane Doe".to_string(),
            path: expected_path.clone(),
            to: "jane@example.com".to_string(),
        }]
    );
    assert!(summary.integrity_errors.is_empty());
    assert_eq!(artifacts(&options.output_dir), vec![expected_path.clone()]);

    let html = std::fs::read_to_string(&expected_path).unwrap();
    assert!(html.contains("$15.50"), "total missing from statement");

    let sent = mailer.sent.borrow();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "jane@example.com");
    assert_eq!(sent[0].attachment_name, "Jane_Doe.html");
    assert_eq!(sent[0].attachment, html.into_bytes());
}

#[test]
fn donor_missing_from_contacts_is_logged_and_skipped() {
    let dir = TempDir::new().unwrap();
    let (contacts, ledger) = load(
        dir.path(),
        "Jane Doe,,,,jane@example.com,12 Main St,Springfield,IL,62701,USA\n",
        "John Smith,,,,,,,,,,\n\
         ,,02/02/2024,,,,,,,$20.00,\n\
         Total for John Smith,,,,,,,,,$20.00,\n\
         Jane Doe,,,,,,,,,,\n\
         ,,03/01/2024,,,,,,,$10.00,\n\
         Total for Jane Doe,,,,,,,,,$10.00,\n",
    );
    let engine = TemplateEngine::new(None).unwrap();
    let currency = CurrencyFormat::default();
    let pipeline = Pipeline {
        engine: &engine,
        converter: &HtmlPassthrough,
        currency: &currency,
        mailer: None,
    };
    let options = options(dir.path());

    let (summary, logs) = run_captured(&pipeline, &options, &contacts, &ledger);

    assert_eq!(summary.integrity_errors.len(), 1);
    assert_eq!(summary.integrity_errors[0].donor, "John Smith");
    assert_eq!(summary.outcomes.len(), 1);
    assert_eq!(summary.outcomes[0].donor(), "Jane Doe");
    assert!(!summary.has_failures());
    assert_eq!(
        artifacts(&options.output_dir),
        vec![options.output_dir.join("Jane_Doe.html")]
    );

    let integrity_lines: Vec<_> = logs
        .lines()
        .into_iter()
        .filter(|l| l.contains("ERROR") && l.contains("John Smith"))
        .collect();
    assert_eq!(integrity_lines.len(), 1, "logs: {:?}", logs.lines());
}

#[test]
fn missing_email_still_writes_and_warns() {
    let dir = TempDir::new().unwrap();
    let (contacts, ledger) = load(
        dir.path(),
        "Jane Doe,,,,--,12 Main St,Springfield,IL,62701,USA\n",
        "Jane Doe,,,,,,,,,,\n,,03/01/2024,,,,,,,$10.00,\n",
    );
    let engine = TemplateEngine::new(None).unwrap();
    let mailer = RecordingMailer::default();
    let currency = CurrencyFormat::default();
    let pipeline = Pipeline {
        engine: &engine,
        converter: &HtmlPassthrough,
        currency: &currency,
        mailer: Some(&mailer),
    };
    let options = options(dir.path());

    let (summary, logs) = run_captured(&pipeline, &options, &contacts, &ledger);

    let path = options.output_dir.join("Jane_Doe.html");
    assert_eq!(
        summary.outcomes,
        vec![DonorOutcome::NeedsManualDelivery {
            donor: "Jane Doe".to_string(),
            path: path.clone(),
        }]
    );
    assert!(path.exists());
    assert!(mailer.sent.borrow().is_empty());

    let warnings: Vec<_> = logs
        .lines()
        .into_iter()
        .filter(|l| l.contains("WARN") && l.contains("Jane Doe"))
        .collect();
    assert_eq!(warnings.len(), 1, "logs: {:?}", logs.lines());
    assert!(warnings[0].contains("manually"));
}

#[test]
fn delivery_failure_does_not_stop_later_donors() {
    let dir = TempDir::new().unwrap();
    let (contacts, ledger) = load(
        dir.path(),
        "Amy Adams,,,,amy@example.com,,,,,\n\
         Bob Brown,,,,bob@example.com,,,,,\n",
        "Amy Adams,,,,,,,,,,\n,,01/01/2024,,,,,,,$1.00,\n\
         Bob Brown,,,,,,,,,,\n,,01/01/2024,,,,,,,$2.00,\n",
    );
    let engine = TemplateEngine::new(None).unwrap();
    let mailer = RecordingMailer {
        reject: vec!["amy@example.com".to_string()],
        ..Default::default()
    };
    let currency = CurrencyFormat::default();
    let pipeline = Pipeline {
        engine: &engine,
        converter: &HtmlPassthrough,
        currency: &currency,
        mailer: Some(&mailer),
    };
    let options = options(dir.path());

    let summary = pipeline.run(&options, &contacts, &ledger).expect("run");

    assert!(summary.has_failures());
    assert!(matches!(summary.outcomes[0], DonorOutcome::DeliveryFailed { .. }));
    assert!(matches!(summary.outcomes[1], DonorOutcome::Delivered { .. }));
    assert!(options.output_dir.join("Amy_Adams.html").exists());
    assert_eq!(mailer.sent.borrow().len(), 1);
    assert_eq!(mailer.sent.borrow()[0].to, "bob@example.com");
}

#[test]
fn conversion_failure_writes_nothing_for_that_donor() {
    let dir = TempDir::new().unwrap();
    let (contacts, ledger) = load(
        dir.path(),
        "Amy Adams,,,,,,,,,\n\
         Bob Brown,,,,,,,,,\n",
        "Amy Adams,,,,,,,,,,\n,,01/01/2024,,,,,,,$1.00,\n\
         Bob Brown,,,,,,,,,,\n,,01/01/2024,,,,,,,$2.00,\n",
    );
    let engine = TemplateEngine::new(None).unwrap();
    let currency = CurrencyFormat::default();
    let converter = FailingFor("Amy Adams");
    let pipeline = Pipeline {
        engine: &engine,
        converter: &converter,
        currency: &currency,
        mailer: None,
    };
    let options = options(dir.path());

    let summary = pipeline.run(&options, &contacts, &ledger).expect("run");

    assert!(summary.has_failures());
    match &summary.outcomes[0] {
        DonorOutcome::RenderFailed { donor, error } => {
            assert_eq!(donor, "Amy Adams");
            assert!(error.contains("produced no output"), "got: {error}");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(
        artifacts(&options.output_dir),
        vec![options.output_dir.join("Bob_Brown.html")]
    );
}

#[test]
fn dry_run_renders_but_writes_and_sends_nothing() {
    let dir = TempDir::new().unwrap();
    let (contacts, ledger) = load(
        dir.path(),
        "Jane Doe,,,,jane@example.com,,,,,\n",
        "Jane Doe,,,,,,,,,,\n,,03/01/2024,,,,,,,$10.00,\n",
    );
    let engine = TemplateEngine::new(None).unwrap();
    let mailer = RecordingMailer::default();
    let currency = CurrencyFormat::default();
    let pipeline = Pipeline {
        engine: &engine,
        converter: &HtmlPassthrough,
        currency: &currency,
        mailer: Some(&mailer),
    };
    let mut options = options(dir.path());
    options.dry_run = true;

    let summary = pipeline.run(&options, &contacts, &ledger).expect("run");

    assert!(matches!(summary.outcomes[0], DonorOutcome::WouldWrite { .. }));
    assert!(!options.output_dir.exists(), "dry-run must not create the output dir");
    assert!(mailer.sent.borrow().is_empty());
}

#[test]
fn summary_serializes_with_status_tags() {
    let summary = RunSummary {
        outcomes: vec![DonorOutcome::NeedsManualDelivery {
            donor: "Jane Doe".to_string(),
            path: PathBuf::from("reports/Jane_Doe.pdf"),
        }],
        integrity_errors: vec![],
    };
    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["outcomes"][0]["status"], "needs_manual_delivery");
    assert_eq!(json["outcomes"][0]["donor"], "Jane Doe");
}

#[test]
fn colliding_file_name_fails_later_donor_and_keeps_first_file() {
    let dir = TempDir::new().unwrap();
    let (contacts, ledger) = load(
        dir.path(),
        "\"Doe, Jane\",,,,,,,,,\n\
         Doe Jane,,,,,,,,,\n",
        "\"Doe, Jane\",,,,,,,,,,\n,,01/01/2024,,,,,,,$1.00,\n\
         Doe Jane,,,,,,,,,,\n,,01/01/2024,,,,,,,$999.00,\n",
    );
    let engine = TemplateEngine::new(None).unwrap();
    let currency = CurrencyFormat::default();
    let pipeline = Pipeline {
        engine: &engine,
        converter: &HtmlPassthrough,
        currency: &currency,
        mailer: None,
    };
    let options = options(dir.path());

    let summary = pipeline.run(&options, &contacts, &ledger).expect("run");

    let path = options.output_dir.join("Doe_Jane.html");
    assert_eq!(
        summary.outcomes,
        vec![
            DonorOutcome::Written {
                donor: "Doe, Jane".to_string(),
                path: path.clone(),
            },
            DonorOutcome::NameCollision {
                donor: "Doe Jane".to_string(),
                path: path.clone(),
                taken_by: "Doe, Jane".to_string(),
            },
        ]
    );
    assert!(summary.has_failures());
    assert_eq!(artifacts(&options.output_dir), vec![path.clone()]);

    let html = std::fs::read_to_string(&path).unwrap();
    assert!(html.contains("$1.00"));
    assert!(!html.contains("$999.00"));
}
