//! Form domain layer
//!
//! Editable fields built from the schema, with branch visibility driven by
//! the section rule sets.

mod field;
mod form_state;

#[cfg(test)]
pub use field::FieldValue;
pub use field::FormField;
pub use form_state::{Form, ReimbursementForm};
