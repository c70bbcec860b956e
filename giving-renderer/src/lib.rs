//! # giving-renderer
//!
//! Tera-based statement rendering and HTML-to-document conversion.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use giving_renderer::{DocumentConverter, StatementContext, TemplateEngine};
//!
//! fn render(ctx: &StatementContext, converter: &dyn DocumentConverter) {
//!     if let Ok(engine) = TemplateEngine::new(None) {
//!         if let Ok(html) = engine.render(ctx) {
//!             if let Ok(bytes) = converter.convert(&html) {
//!                 println!("{} bytes of .{}", bytes.len(), converter.extension());
//!             }
//!         }
//!     }
//! }
//! ```

pub mod context;
pub mod convert;
pub mod engine;
pub mod error;

pub use context::{LineItemCtx, StatementContext};
pub use convert::{converter_for, CommandConverter, DocumentConverter, DocumentFormat, HtmlPassthrough};
pub use engine::TemplateEngine;
pub use error::RenderError;
