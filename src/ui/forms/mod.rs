//! Form rendering module
//!
//! - `field_renderer`: one bordered field
//! - `reimbursement_form`: the scrolling form with its submit button

mod field_renderer;
mod reimbursement_form;

pub use reimbursement_form::draw_reimbursement_form;
