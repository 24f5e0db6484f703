//! Application state definitions

use super::forms::ReimbursementForm;
use crate::schema::FormSchema;
use std::collections::VecDeque;
use std::path::PathBuf;

/// Number of steps in the submission guide
pub const INSTRUCTION_STEPS: usize = 5;

/// Current view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Form,
    /// Submission guide, one step expanded at a time
    Instructions,
}

impl View {
    pub fn toggle(&self) -> Self {
        match self {
            Self::Form => Self::Instructions,
            Self::Instructions => Self::Form,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Form => "Form",
            Self::Instructions => "Instructions",
        }
    }
}

/// Main application state
#[derive(Debug, Clone)]
pub struct AppState {
    pub current_view: View,
    pub form: ReimbursementForm,

    /// Errors waiting to be shown, oldest first
    pub errors: VecDeque<String>,
    pub status_message: Option<String>,
    pub last_export: Option<PathBuf>,

    /// Expanded step of the submission guide
    pub instruction_step: usize,
}

impl AppState {
    pub fn new(schema: &FormSchema) -> Self {
        Self {
            current_view: View::default(),
            form: ReimbursementForm::new(schema),
            errors: VecDeque::new(),
            status_message: None,
            last_export: None,
            // "Prepare the Reimbursement Request" is open by default
            instruction_step: 1,
        }
    }

    pub fn push_error(&mut self, message: String) {
        tracing::debug!(error = %message, "queued error");
        self.errors.push_back(message);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn current_error(&self) -> Option<&str> {
        self.errors.front().map(String::as_str)
    }

    pub fn dismiss_error(&mut self) {
        self.errors.pop_front();
    }

    pub fn toggle_view(&mut self) {
        self.current_view = self.current_view.toggle();
    }

    pub fn next_instruction_step(&mut self) {
        self.instruction_step = (self.instruction_step + 1) % INSTRUCTION_STEPS;
    }

    pub fn prev_instruction_step(&mut self) {
        self.instruction_step = self
            .instruction_step
            .checked_sub(1)
            .unwrap_or(INSTRUCTION_STEPS - 1);
    }
}
