//! UI module for rendering the TUI

mod components;
mod forms;
mod instructions;
mod layout;

use crate::app::App;
use crate::render::DocumentRenderer;
use crate::state::View;
use ratatui::Frame;

/// Main draw function
pub fn draw<R: DocumentRenderer>(frame: &mut Frame, app: &App<R>) {
    let (tabs_area, main_area) = layout::create_layout(frame.area());

    layout::draw_tabs(frame, tabs_area, app.state.current_view);

    match app.state.current_view {
        View::Form => forms::draw_reimbursement_form(frame, main_area, app),
        View::Instructions => instructions::draw(frame, main_area, app),
    }

    layout::draw_status_bar(frame, app);

    // Error dialog goes on top of everything
    if let Some(error) = app.state.current_error() {
        components::render_error_dialog(frame, error, app.state.errors.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::Exporter;
    use crate::render::MockDocumentRenderer;
    use crate::schema::FormSchema;
    use ratatui::{backend::TestBackend, Terminal};

    fn app() -> App<MockDocumentRenderer> {
        let exporter = Exporter::new(MockDocumentRenderer::new(), ".", "Test");
        App::with_exporter(FormSchema::reimbursement().unwrap(), exporter)
    }

    fn screen(app: &App<MockDocumentRenderer>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_form_view_shows_fields() {
        let screen = screen(&app());
        assert!(screen.contains("SPI Reimbursement Request"));
        assert!(screen.contains("META / RECIPIENT INFORMATION"));
        assert!(screen.contains("Project"));
        assert!(screen.contains("Submit"));
    }

    #[test]
    fn test_instructions_view() {
        let mut app = app();
        app.state.current_view = View::Instructions;
        let screen = screen(&app);
        assert!(screen.contains("Step 2: Prepare the Reimbursement Request"));
        assert!(screen.contains("Set amount to the same as in Step 1."));
    }

    #[test]
    fn test_error_dialog_drawn_over_form() {
        let mut app = app();
        app.push_error("Date is required");
        app.push_error("Name is required");
        let screen = screen(&app);
        assert!(screen.contains("Error (1 of 2)"));
        assert!(screen.contains("Date is required"));
    }
}
