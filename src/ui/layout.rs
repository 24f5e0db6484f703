//! Layout components (view tabs, status bar)

use crate::app::App;
use crate::platform::SUBMIT_SHORTCUT;
use crate::render::DocumentRenderer;
use crate::state::View;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const VIEWS: [View; 2] = [View::Form, View::Instructions];

/// Split the screen into the tab line and the main content; the bottom line
/// is left for the status bar
pub fn create_layout(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tabs
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    (chunks[0], chunks[1])
}

/// Draw the view tabs, current one highlighted
pub fn draw_tabs(frame: &mut Frame, area: Rect, current: View) {
    let mut spans = vec![Span::raw(" ")];
    for view in VIEWS {
        let style = if view == current {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!(" {} ", view.label()), style));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled("F1:switch", Style::default().fg(Color::DarkGray)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Draw the status bar
pub fn draw_status_bar<R: DocumentRenderer>(frame: &mut Frame, app: &App<R>) {
    let area = frame.area();
    let status_area = Rect {
        x: 0,
        y: area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    let mut spans = vec![Span::styled(
        format!(" {} ", get_view_hints(&app.state.current_view)),
        Style::default().fg(Color::Gray),
    )];

    if let Some(msg) = &app.state.status_message {
        spans.push(Span::raw("| "));
        spans.push(Span::styled(msg, Style::default().fg(Color::Green)));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, status_area);
}

/// Get keyboard hints for the current view
fn get_view_hints(view: &View) -> String {
    match view {
        View::Form => format!(
            "Tab/↑↓:field  ←/→:choose  {SUBMIT_SHORTCUT}:submit  F1:help  Esc:quit"
        ),
        View::Instructions => "j/k:step  ?/Esc:back to form".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_hints_name_submit_shortcut() {
        assert!(get_view_hints(&View::Form).contains(SUBMIT_SHORTCUT));
    }

    #[test]
    fn test_layout_reserves_status_line() {
        let (tabs, content) = create_layout(Rect::new(0, 0, 80, 24));
        assert_eq!(tabs.height, 1);
        assert_eq!(content.y, 1);
        assert_eq!(content.height, 22);
    }
}
