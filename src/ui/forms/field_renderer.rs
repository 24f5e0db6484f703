//! Field rendering utilities for forms

use crate::state::FormField;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Field height in rows (top border + value + bottom border)
pub const FIELD_HEIGHT: u16 = 3;

/// Draw a form field using FormField from the domain layer
pub fn draw_field(frame: &mut Frame, area: Rect, field: &FormField, is_active: bool) {
    let accent = if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let display_value = field.display_value();
    let mut spans = Vec::new();

    if field.is_choice() {
        if is_active {
            spans.push(Span::styled("◀ ", accent));
        }
        if display_value.is_empty() {
            spans.push(Span::styled(
                "(choose with ←/→ or type to search)",
                Style::default().fg(Color::DarkGray),
            ));
        } else {
            spans.push(Span::styled(display_value, accent));
        }
        if is_active {
            spans.push(Span::styled(" ▶", accent));
        }
    } else {
        let display_str = if display_value.is_empty() && !is_active {
            "(empty)".to_string()
        } else {
            display_value
        };
        spans.push(Span::styled(display_str, accent));
        if is_active {
            spans.push(Span::styled("▌", Style::default().fg(Color::Cyan)));
        }
    }

    let title = if field.required {
        Line::from(vec![
            Span::raw(format!(" {} ", field.label)),
            Span::styled("* ", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
        ])
    } else {
        Line::from(format!(" {} ", field.label))
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(accent);

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}
