//! Reimbursement form rendering

use super::field_renderer::{draw_field, FIELD_HEIGHT};
use crate::app::App;
use crate::render::DocumentRenderer;
use crate::state::{FormField, ReimbursementForm};
use crate::ui::components::{centered, render_button, BUTTON_HEIGHT};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const SECTION_HEADER_HEIGHT: u16 = 1;
const SUBMIT_WIDTH: u16 = 16;

/// One drawable line item of the form
enum FormRow<'a> {
    SectionHeader(&'a str),
    Field { field: &'a FormField, active: bool },
    Submit { active: bool },
}

impl FormRow<'_> {
    fn height(&self) -> u16 {
        match self {
            FormRow::SectionHeader(_) => SECTION_HEADER_HEIGHT,
            FormRow::Field { .. } => FIELD_HEIGHT,
            FormRow::Submit { .. } => BUTTON_HEIGHT,
        }
    }

    fn is_active(&self) -> bool {
        match self {
            FormRow::SectionHeader(_) => false,
            FormRow::Field { active, .. } | FormRow::Submit { active } => *active,
        }
    }
}

/// Section headers and visible fields in order, then the submit button
fn build_rows(form: &ReimbursementForm) -> Vec<FormRow<'_>> {
    let active = form.active_ref();
    let mut rows = Vec::new();

    for (section_index, section) in form.sections.iter().enumerate() {
        rows.push(FormRow::SectionHeader(&section.title));
        for field_index in section.visible_indices() {
            let is_active = active
                .is_some_and(|r| r.section == section_index && r.field == field_index);
            rows.push(FormRow::Field {
                field: &section.fields[field_index],
                active: is_active,
            });
        }
    }

    rows.push(FormRow::Submit {
        active: form.is_submit_active(),
    });
    rows
}

/// Rows to skip so the active row fits the viewport
fn scroll_offset(heights: &[u16], active: Option<usize>, viewport: u16) -> u16 {
    let Some(active) = active else {
        return 0;
    };
    let top: u16 = heights[..active].iter().sum();
    let bottom = top + heights[active];
    bottom.saturating_sub(viewport).min(top)
}

/// Draw the form inside a titled block, scrolled to keep the cursor visible
pub fn draw_reimbursement_form<R: DocumentRenderer>(frame: &mut Frame, area: Rect, app: &App<R>) {
    let block = Block::default()
        .title(format!(" {} ", app.schema.title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = build_rows(&app.state.form);
    let heights: Vec<u16> = rows.iter().map(FormRow::height).collect();
    let offset = scroll_offset(&heights, rows.iter().position(FormRow::is_active), inner.height);

    let mut top = 0u16;
    for (row, height) in rows.iter().zip(heights) {
        let row_top = top;
        top += height;
        if row_top < offset {
            continue;
        }
        let y = row_top - offset;
        if y + height > inner.height {
            break;
        }

        let row_area = Rect {
            x: inner.x,
            y: inner.y + y,
            width: inner.width,
            height,
        };
        match row {
            FormRow::SectionHeader(title) => {
                let header = Paragraph::new(Line::from(title.to_uppercase())).style(
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                );
                frame.render_widget(header, row_area);
            }
            FormRow::Field { field, active } => draw_field(frame, row_area, field, *active),
            FormRow::Submit { active } => {
                render_button(frame, centered(row_area, SUBMIT_WIDTH), "Submit", *active)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FormSchema;

    #[test]
    fn test_rows_start_with_section_header() {
        let form = ReimbursementForm::new(&FormSchema::reimbursement().unwrap());
        let rows = build_rows(&form);
        assert!(matches!(rows[0], FormRow::SectionHeader("meta / recipient information")));
        assert!(matches!(rows.last(), Some(FormRow::Submit { active: false })));
        // 2 headers, 6 fields, submit
        assert_eq!(rows.len(), 9);
        assert!(rows[1].is_active());
    }

    #[test]
    fn test_no_scroll_when_active_fits() {
        assert_eq!(scroll_offset(&[1, 3, 3, 3], Some(2), 20), 0);
    }

    #[test]
    fn test_scrolls_active_row_into_view() {
        // active row spans 7..10 in a 8-row viewport
        assert_eq!(scroll_offset(&[1, 3, 3, 3], Some(3), 8), 2);
    }

    #[test]
    fn test_scroll_never_passes_active_top() {
        assert_eq!(scroll_offset(&[1, 3, 3, 3], Some(3), 2), 7);
    }

    #[test]
    fn test_no_active_row() {
        assert_eq!(scroll_offset(&[1, 3], None, 2), 0);
    }
}
