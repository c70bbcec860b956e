//! Tera statement engine.
//!
//! The default statement template is embedded at compile time; a user file
//! replaces it entirely. The template is registered under an `.html` name so
//! Tera's autoescaping applies to donor-supplied text.

use std::path::{Path, PathBuf};

use tera::Tera;

use crate::context::StatementContext;
use crate::error::RenderError;

const STATEMENT_TEMPLATE: &str = "statement.html";
const DEFAULT_STATEMENT: &str = include_str!("templates/statement.html.tera");

fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::Io { path: path.into(), source }
}

fn build_tera(user_template: Option<&Path>) -> Result<Tera, RenderError> {
    let content = match user_template {
        Some(path) => std::fs::read_to_string(path).map_err(|e| io_err(path, e))?,
        None => DEFAULT_STATEMENT.to_string(),
    };
    let mut tera = Tera::default();
    tera.add_raw_template(STATEMENT_TEMPLATE, &content)?;
    Ok(tera)
}

/// Renders statement HTML. Create once per run and reuse for every donor.
pub struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    /// Load the embedded statement template, or `user_template` when given.
    pub fn new(user_template: Option<&Path>) -> Result<Self, RenderError> {
        let tera = build_tera(user_template)?;
        Ok(TemplateEngine { tera })
    }

    /// Render one statement to HTML with LF line endings.
    pub fn render(&self, ctx: &StatementContext) -> Result<String, RenderError> {
        let tera_ctx = ctx.to_tera_context()?;
        let html = self.tera.render(STATEMENT_TEMPLATE, &tera_ctx)?;
        Ok(html.replace("\r\n", "\n"))
    }
}
