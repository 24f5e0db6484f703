//! Application state and core logic

use crate::config::AppConfig;
use crate::export::Exporter;
use crate::render::{DocumentRenderer, PdfRenderer};
use crate::schema::FormSchema;
use crate::state::{AppState, Form, View};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Main application struct
pub struct App<R: DocumentRenderer = PdfRenderer> {
    /// Current application state
    pub state: AppState,
    /// Schema the form and the document are built from
    pub schema: FormSchema,
    exporter: Exporter<R>,
    /// Whether the app should quit
    quit: bool,
}

impl App {
    /// Create the app with the PDF renderer and the user's configuration
    pub fn new(config: &AppConfig) -> Result<Self> {
        let mut schema = FormSchema::reimbursement()?;
        if let Some(title) = &config.document_title {
            schema = schema.with_title(title);
        }
        let exporter = Exporter::new(
            PdfRenderer::default(),
            config.output_dir(),
            config.file_prefix(),
        );
        tracing::info!(output_dir = %exporter.output_dir().display(), "app ready");
        Ok(Self::with_exporter(schema, exporter))
    }
}

impl<R: DocumentRenderer> App<R> {
    pub fn with_exporter(schema: FormSchema, exporter: Exporter<R>) -> Self {
        Self {
            state: AppState::new(&schema),
            schema,
            exporter,
            quit: false,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Push an error message to the error queue for display
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.state.push_error(message.into());
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Error dialog is modal
        if self.state.has_errors() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.dismiss_error();
            }
            return Ok(());
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit = true;
            return Ok(());
        }

        if key.code == KeyCode::F(1) {
            self.state.toggle_view();
            return Ok(());
        }

        match self.state.current_view {
            View::Form => self.handle_form_key(key)?,
            View::Instructions => self.handle_instructions_key(key)?,
        }
        Ok(())
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Result<()> {
        let on_submit = self.state.form.is_submit_active();
        let on_choice = self.state.form.active().is_some_and(|f| f.is_choice());

        // A status message only lasts until the next key
        self.state.status_message = None;

        match key.code {
            KeyCode::Char('s')
                if key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | crate::platform::SAVE_MODIFIER) =>
            {
                self.submit();
            }
            KeyCode::Tab | KeyCode::Down => self.state.form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.state.form.prev_field(),
            KeyCode::Enter if on_submit => self.submit(),
            KeyCode::Enter => self.state.form.next_field(),
            KeyCode::Esc => self.quit = true,
            KeyCode::Left if on_choice => self.state.form.prev_choice(),
            KeyCode::Right if on_choice => self.state.form.next_choice(),
            KeyCode::Char(c) if !on_submit => self.state.form.input_char(c),
            KeyCode::Backspace if !on_submit => self.state.form.backspace(),
            _ => {}
        }
        Ok(())
    }

    fn handle_instructions_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => {
                self.state.prev_instruction_step()
            }
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => {
                self.state.next_instruction_step()
            }
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                self.state.current_view = View::Form
            }
            _ => {}
        }
        Ok(())
    }

    /// Validate the form and export it; problems end up in the error queue
    pub fn submit(&mut self) {
        tracing::info!("submitting form");

        let problems = self.state.form.validate();
        if !problems.is_empty() {
            tracing::warn!(count = problems.len(), "form has invalid fields");
            self.push_error(format!("Please fix the following:\n{}", problems.join("\n")));
            return;
        }

        let data = self.state.form.to_form_data();
        match self.exporter.export(&self.schema, &data) {
            Ok(path) => {
                self.state.status_message = Some(format!("Saved {}", path.display()));
                self.state.last_export = Some(path);
            }
            Err(e) => {
                tracing::error!(error = %e, "export failed");
                self.push_error(format!("Could not create the document: {e}"));
            }
        }
    }
}
