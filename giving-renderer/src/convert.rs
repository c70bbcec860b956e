//! HTML → document conversion.
//!
//! Conversion is delegated to an external program. [`HtmlPassthrough`]
//! skips conversion and keeps the rendered HTML, which is what tests and
//! machines without a converter installed use.

use std::fmt;
use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::str::FromStr;
use std::thread;

use giving_core::config::ConverterConfig;

use crate::error::RenderError;

/// Turns rendered statement HTML into the bytes of the final artifact.
pub trait DocumentConverter {
    fn convert(&self, html: &str) -> Result<Vec<u8>, RenderError>;

    /// File extension of the produced artifact, without the dot.
    fn extension(&self) -> &str;

    /// MIME type used when the artifact is attached to an email.
    fn content_type(&self) -> &str;
}

/// Output document type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentFormat {
    #[default]
    Pdf,
    Html,
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Pdf => write!(f, "pdf"),
            DocumentFormat::Html => write!(f, "html"),
        }
    }
}

impl FromStr for DocumentFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "html" => Ok(DocumentFormat::Html),
            other => Err(format!("unknown document format '{other}'; expected: pdf, html")),
        }
    }
}

/// Pick the converter for `format`.
pub fn converter_for(format: DocumentFormat, config: &ConverterConfig) -> Box<dyn DocumentConverter> {
    match format {
        DocumentFormat::Pdf => Box::new(CommandConverter::from_config(config)),
        DocumentFormat::Html => Box::new(HtmlPassthrough),
    }
}

// ---------------------------------------------------------------------------
// CommandConverter
// ---------------------------------------------------------------------------

/// Pipes HTML to a program's stdin and reads the PDF from its stdout.
#[derive(Debug, Clone)]
pub struct CommandConverter {
    program: String,
    args: Vec<String>,
}

impl CommandConverter {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn from_config(config: &ConverterConfig) -> Self {
        Self::new(config.program.clone(), config.args.clone())
    }

    fn spawn_err(&self, source: std::io::Error) -> RenderError {
        RenderError::Spawn {
            program: self.program.clone(),
            source,
        }
    }
}

impl DocumentConverter for CommandConverter {
    fn convert(&self, html: &str) -> Result<Vec<u8>, RenderError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_err(e))?;

        // The converter may write output before it has read all of its
        // input, so stdin is fed from its own thread. Dropping the handle
        // closes stdin.
        let stdin = child.stdin.take();
        let input = html.as_bytes().to_vec();
        let writer = thread::spawn(move || -> io::Result<()> {
            if let Some(mut stdin) = stdin {
                stdin.write_all(&input)?;
            }
            Ok(())
        });

        let output = child.wait_with_output().map_err(|e| self.spawn_err(e))?;
        let written = writer
            .join()
            .unwrap_or_else(|_| Err(io::Error::other("stdin writer thread panicked")));

        if !output.status.success() {
            return Err(RenderError::Converter {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        written.map_err(|e| self.spawn_err(e))?;
        if output.stdout.is_empty() {
            return Err(RenderError::EmptyOutput {
                program: self.program.clone(),
            });
        }
        tracing::debug!(program = %self.program, bytes = output.stdout.len(), "converted statement");
        Ok(output.stdout)
    }

    fn extension(&self) -> &str {
        "pdf"
    }

    fn content_type(&self) -> &str {
        "application/pdf"
    }
}

// ---------------------------------------------------------------------------
// HtmlPassthrough
// ---------------------------------------------------------------------------

/// Keeps the rendered HTML as the artifact.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlPassthrough;

impl DocumentConverter for HtmlPassthrough {
    fn convert(&self, html: &str) -> Result<Vec<u8>, RenderError> {
        Ok(html.as_bytes().to_vec())
    }

    fn extension(&self) -> &str {
        "html"
    }

    fn content_type(&self) -> &str {
        "text/html; charset=utf-8"
    }
}
