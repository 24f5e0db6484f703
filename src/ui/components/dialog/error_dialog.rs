//! Error dialog component

use super::base::{render_dialog, DialogConfig};
use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
    Frame,
};

/// Render the oldest queued error centered on the screen. `pending` is the
/// number of errors queued, including this one.
pub fn render_error_dialog(frame: &mut Frame, error_message: &str, pending: usize) {
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let hint = vec![
        Span::raw("Press "),
        Span::styled("Enter", key_style),
        Span::raw(" or "),
        Span::styled("Esc", key_style),
        Span::raw(" to dismiss"),
    ];

    let title = if pending > 1 {
        format!("Error (1 of {pending})")
    } else {
        "Error".to_string()
    };

    render_dialog(
        frame,
        DialogConfig {
            title: &title,
            title_color: Color::Red,
            border_color: Color::Red,
            message: error_message,
            hint: Some(hint),
            max_width: 70,
        },
    );
}
