//! Giving: annual giving statement generator.
//!
//! # Usage
//!
//! ```text
//! giving generate [--contacts <csv>] [--donations <csv>] [--format pdf|html]
//!                 [--email --sender <addr> --sender-display <name> --sender-password <pw>]
//!                 [--config <yaml>] [--template <html>] [--output-dir <dir>] [--dry-run]
//! giving inspect  [--contacts <csv>] [--donations <csv>] [--config <yaml>]
//! ```
//!
//! Add `--json` to either command for machine-readable output; logs then go
//! to stderr so stdout stays parseable.

mod commands;

use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{generate::GenerateArgs, inspect::InspectArgs};
use giving_renderer::DocumentFormat;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "giving",
    version,
    about = "Generate and email annual giving statements from accounting exports",
    long_about = None,
)]
struct Cli {
    /// Emit machine-readable JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render one statement per donor and optionally email it.
    Generate(GenerateArgs),

    /// Load and join the exports and show per-donor totals without rendering.
    Inspect(InspectArgs),
}

// ---------------------------------------------------------------------------
// Shared format argument: parsed from CLI strings, converts to renderer type
// ---------------------------------------------------------------------------

/// Thin wrapper so clap can parse `DocumentFormat` from CLI args.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatArg(pub DocumentFormat);

impl FromStr for FormatArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl fmt::Display for FormatArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<FormatArg> for DocumentFormat {
    fn from(f: FormatArg) -> Self {
        f.0
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json);
    match cli.command {
        Commands::Generate(args) => args.run(cli.json),
        Commands::Inspect(args) => args.run(cli.json),
    }
}

fn init_tracing(to_stderr: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt().with_env_filter(filter).with_target(false);
    let _ = if to_stderr {
        builder.with_writer(std::io::stderr).try_init()
    } else {
        builder.with_writer(std::io::stdout).try_init()
    };
}
