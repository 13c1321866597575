//! # Webbuilder Export
//!
//! Turns a Webbuilder document into a standalone HTML page.
//!
//! Editor-only decoration (selection and drag classes, builder data
//! attributes) is stripped on the way out; the input document is never
//! modified.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod html;

pub use error::{ExportError, ExportResult};
pub use html::{export_html, ExportConfig, HtmlExporter};
