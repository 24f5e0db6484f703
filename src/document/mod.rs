//! Document layer
//!
//! - `assemble`: submitted data + schema → document model
//! - `model`: renderer-agnostic sections and rows
//! - `definition`: styled content blocks for the PDF renderer

mod assemble;
mod definition;
mod model;

pub use assemble::{AssembleError, Assembler};
pub use definition::{Cell, ColumnWidth, ContentBlock, DocDefinition, Rgb, Table, TextStyle};
#[cfg(test)]
pub use model::{DocumentModel, DocumentSection, Row};
