//! Rendering of document definitions to output bytes

mod pdf;

pub use pdf::PdfRenderer;

use crate::document::DocDefinition;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to encode page content: {0}")]
    Encode(String),

    #[error("failed to write document: {0}")]
    Write(String),

    #[error("document has no content")]
    Empty,
}

/// Turns a document definition into a finished file, enabling mocking in tests
#[cfg_attr(test, mockall::automock)]
pub trait DocumentRenderer {
    /// Render the whole document into memory
    fn render(&self, definition: &DocDefinition) -> Result<Vec<u8>, RenderError>;

    /// File extension of the produced document, without the dot
    fn extension(&self) -> &'static str;
}
