//! Reusable UI components

mod button;
mod dialog;

pub use button::{centered, render_button, BUTTON_HEIGHT};
pub use dialog::render_error_dialog;
