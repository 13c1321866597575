//! Export error types.

use thiserror::Error;
use webbuilder_core::ElementId;

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Errors that can occur while exporting a document.
#[derive(Debug, Error)]
pub enum ExportError {
    /// A custom element tag is not a valid HTML tag name.
    #[error("Invalid tag name on element {element}: {name:?}")]
    InvalidTag {
        /// Offending element.
        element: ElementId,
        /// The rejected tag name.
        name: String,
    },

    /// An attribute name cannot be written as HTML.
    #[error("Invalid attribute name on element {element}: {name:?}")]
    InvalidAttribute {
        /// Offending element.
        element: ElementId,
        /// The rejected attribute name.
        name: String,
    },

    /// Writing the output failed.
    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),
}
