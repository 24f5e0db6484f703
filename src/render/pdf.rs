//! PDF output through lopdf
//!
//! Uses the standard Helvetica faces in WinAnsi encoding on A4 pages. Table
//! cells wrap to their column width and header rows are repeated after a page
//! break. No timestamps are written, so identical input gives identical bytes.

use super::{DocumentRenderer, RenderError};
use crate::document::{Cell, ColumnWidth, ContentBlock, DocDefinition, Rgb, Table, TextStyle};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream, StringFormat};

const FONT_REGULAR: &str = "F1";
const FONT_BOLD: &str = "F2";

/// Average Helvetica glyph width relative to the font size
const GLYPH_WIDTH_RATIO: f32 = 0.55;
const LINE_HEIGHT_RATIO: f32 = 1.2;
const CELL_PADDING_X: f32 = 4.0;
const CELL_PADDING_Y: f32 = 3.0;
const BORDER_WIDTH: f32 = 0.5;

const PRODUCER: &str = "reimbursement-tui";

#[derive(Debug, Clone, PartialEq)]
pub struct PdfRenderer {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
}

impl Default for PdfRenderer {
    /// A4 portrait with 40pt margins
    fn default() -> Self {
        Self {
            page_width: 595.0,
            page_height: 842.0,
            margin: 40.0,
        }
    }
}

impl DocumentRenderer for PdfRenderer {
    fn render(&self, definition: &DocDefinition) -> Result<Vec<u8>, RenderError> {
        if definition.content.is_empty() {
            return Err(RenderError::Empty);
        }

        let mut writer = PageWriter::new(self);
        for block in &definition.content {
            match block {
                ContentBlock::Text { text, style } => {
                    writer.text_block(text, &definition.style(Some(style)))
                }
                ContentBlock::Table(table) => writer.table(definition, table),
            }
        }
        let pages = writer.finish();
        tracing::debug!(pages = pages.len(), "laid out document");

        self.build(pages, definition.title())
    }

    fn extension(&self) -> &'static str {
        "pdf"
    }
}

impl PdfRenderer {
    fn content_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }

    fn top(&self) -> f32 {
        self.page_height - self.margin
    }

    /// Resolve star columns against the space the fixed columns leave
    fn column_widths(&self, widths: &[ColumnWidth]) -> Vec<f32> {
        let fixed: f32 = widths
            .iter()
            .map(|w| match w {
                ColumnWidth::Fixed(width) => *width,
                ColumnWidth::Star => 0.0,
            })
            .sum();
        let stars = widths
            .iter()
            .filter(|w| matches!(w, ColumnWidth::Star))
            .count();
        let star = if stars == 0 {
            0.0
        } else {
            ((self.content_width() - fixed) / stars as f32).max(0.0)
        };

        widths
            .iter()
            .map(|w| match w {
                ColumnWidth::Fixed(width) => *width,
                ColumnWidth::Star => star,
            })
            .collect()
    }

    fn build(&self, pages: Vec<Vec<Operation>>, title: Option<&str>) -> Result<Vec<u8>, RenderError> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let bold_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                FONT_REGULAR => regular_id,
                FONT_BOLD => bold_id,
            },
        });

        let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
        for operations in pages {
            let content = Content { operations };
            let encoded = content
                .encode()
                .map_err(|e| RenderError::Encode(e.to_string()))?;
            let content_id = doc.add_object(Stream::new(Dictionary::new(), encoded));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        let media_box: Vec<Object> = vec![
            0.0_f32.into(),
            0.0_f32.into(),
            self.page_width.into(),
            self.page_height.into(),
        ];
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => media_box,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut info = dictionary! {
            "Producer" => Object::string_literal(PRODUCER),
        };
        if let Some(title) = title {
            info.set("Title", text_string(title));
        }
        let info_id = doc.add_object(info);
        doc.trailer.set("Info", info_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|e| RenderError::Write(e.to_string()))?;
        Ok(bytes)
    }
}

/// Document text string: ASCII as a literal, anything else UTF-16BE with a BOM
fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }
    let mut bytes = vec![0xFE, 0xFF];
    bytes.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
    Object::String(bytes, StringFormat::Hexadecimal)
}

/// Accumulates drawing operations, starting a new page when one fills up
struct PageWriter<'a> {
    renderer: &'a PdfRenderer,
    pages: Vec<Vec<Operation>>,
    ops: Vec<Operation>,
    y: f32,
}

impl<'a> PageWriter<'a> {
    fn new(renderer: &'a PdfRenderer) -> Self {
        Self {
            renderer,
            pages: Vec::new(),
            ops: Vec::new(),
            y: renderer.top(),
        }
    }

    fn break_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.ops));
        self.y = self.renderer.top();
    }

    /// Break the page if `height` does not fit; returns whether it broke.
    /// An empty page never breaks, so oversized items still get drawn.
    fn ensure(&mut self, height: f32) -> bool {
        if self.y - height < self.renderer.margin && !self.ops.is_empty() {
            self.break_page();
            true
        } else {
            false
        }
    }

    fn text_block(&mut self, text: &str, style: &TextStyle) {
        let line_height = style.font_size * LINE_HEIGHT_RATIO;
        let x = self.renderer.margin;
        for line in wrap(text, self.renderer.content_width(), style.font_size) {
            self.ensure(line_height);
            self.text_line(&line, x, self.y - style.font_size, style);
            self.y -= line_height;
        }
    }

    fn table(&mut self, definition: &DocDefinition, table: &Table) {
        self.y -= table.margin_top;
        let widths = self.renderer.column_widths(&table.widths);
        let header_rows = table.header_rows.min(table.body.len());

        for (index, row) in table.body.iter().enumerate() {
            let height = row_height(definition, row, &widths);
            if self.ensure(height) && index >= header_rows {
                for header in &table.body[..header_rows] {
                    let header_height = row_height(definition, header, &widths);
                    self.row(definition, header, &widths, header_height);
                }
            }
            self.row(definition, row, &widths, height);
        }
    }

    fn row(&mut self, definition: &DocDefinition, row: &[Cell], widths: &[f32], height: f32) {
        let mut x = self.renderer.margin;
        let top = self.y;

        for (cell, width) in cell_spans(row, widths) {
            let style = definition.style(cell.style.as_deref());
            self.rect(x, top - height, width, height, style.fill_color);

            let line_height = style.font_size * LINE_HEIGHT_RATIO;
            let lines = wrap(&cell.text, width - 2.0 * CELL_PADDING_X, style.font_size);
            for (i, line) in lines.iter().enumerate() {
                let line_top = top - CELL_PADDING_Y - i as f32 * line_height;
                self.text_line(line, x + CELL_PADDING_X, line_top - style.font_size, &style);
            }
            x += width;
        }

        self.y -= height;
    }

    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, fill: Option<Rgb>) {
        if let Some(fill) = fill {
            let [r, g, b] = fill.unit();
            self.ops.push(Operation::new("rg", vec![r.into(), g.into(), b.into()]));
            self.ops.push(Operation::new(
                "re",
                vec![x.into(), y.into(), width.into(), height.into()],
            ));
            self.ops.push(Operation::new("f", vec![]));
        }

        let [r, g, b] = Rgb::BLACK.unit();
        self.ops.push(Operation::new("RG", vec![r.into(), g.into(), b.into()]));
        self.ops.push(Operation::new("w", vec![BORDER_WIDTH.into()]));
        self.ops.push(Operation::new(
            "re",
            vec![x.into(), y.into(), width.into(), height.into()],
        ));
        self.ops.push(Operation::new("S", vec![]));
    }

    fn text_line(&mut self, text: &str, x: f32, baseline: f32, style: &TextStyle) {
        let font = if style.bold { FONT_BOLD } else { FONT_REGULAR };
        let [r, g, b] = style.color.unit();
        self.ops.push(Operation::new("rg", vec![r.into(), g.into(), b.into()]));
        self.ops.push(Operation::new("BT", vec![]));
        self.ops
            .push(Operation::new("Tf", vec![font.into(), style.font_size.into()]));
        self.ops
            .push(Operation::new("Td", vec![x.into(), baseline.into()]));
        self.ops.push(Operation::new(
            "Tj",
            vec![Object::string_literal(encode_win_ansi(text))],
        ));
        self.ops.push(Operation::new("ET", vec![]));
    }

    fn finish(mut self) -> Vec<Vec<Operation>> {
        if !self.ops.is_empty() || self.pages.is_empty() {
            self.pages.push(self.ops);
        }
        self.pages
    }
}

/// Pair each cell with the combined width of the columns it spans
fn cell_spans<'c>(row: &'c [Cell], widths: &[f32]) -> Vec<(&'c Cell, f32)> {
    let mut column = 0;
    row.iter()
        .map(|cell| {
            let span = cell.col_span.max(1);
            let end = (column + span).min(widths.len());
            let width = widths[column.min(end)..end].iter().sum();
            column = end;
            (cell, width)
        })
        .collect()
}

fn row_height(definition: &DocDefinition, row: &[Cell], widths: &[f32]) -> f32 {
    cell_spans(row, widths)
        .into_iter()
        .map(|(cell, width)| {
            let style = definition.style(cell.style.as_deref());
            let lines = wrap(&cell.text, width - 2.0 * CELL_PADDING_X, style.font_size).len();
            lines as f32 * style.font_size * LINE_HEIGHT_RATIO + 2.0 * CELL_PADDING_Y
        })
        .fold(0.0, f32::max)
}

/// Word-wrap `text` to lines that fit `width` points, splitting words that
/// are longer than a whole line. Always yields at least one line.
fn wrap(text: &str, width: f32, font_size: f32) -> Vec<String> {
    let max_chars = ((width / (font_size * GLYPH_WIDTH_RATIO)).floor() as usize).max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let mut word = word;
            while word.chars().count() > max_chars {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let split = word
                    .char_indices()
                    .nth(max_chars)
                    .map(|(i, _)| i)
                    .unwrap_or(word.len());
                lines.push(word[..split].to_string());
                word = &word[split..];
            }

            if word.is_empty() {
                continue;
            }
            if current.is_empty() {
                current.push_str(word);
            } else if current.chars().count() + 1 + word.chars().count() <= max_chars {
                current.push(' ');
                current.push_str(word);
            } else {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            }
        }
        if !current.is_empty() || lines.is_empty() {
            lines.push(current);
        }
    }

    lines
}

/// Map text onto WinAnsiEncoding; anything outside it becomes '?'
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20}'..='\u{7e}' | '\u{a0}'..='\u{ff}' => c as u8,
            '€' => 0x80,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            c if c.is_whitespace() => b' ',
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocumentModel, DocumentSection, Row};

    fn definition(rows: usize) -> DocDefinition {
        DocDefinition::from_model(&DocumentModel {
            title: "SPI Reimbursement Request".to_string(),
            sections: vec![DocumentSection {
                key: "curr".to_string(),
                title: "currency / transfer information".to_string(),
                rows: (0..rows)
                    .map(|i| Row::new(&format!("Field {i}"), "value"))
                    .collect(),
            }],
        })
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    fn occurrences(haystack: &[u8], needle: &[u8]) -> usize {
        haystack.windows(needle.len()).filter(|w| *w == needle).count()
    }

    #[test]
    fn test_renders_pdf_header() {
        let bytes = PdfRenderer::default().render(&definition(2)).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
        assert!(contains(&bytes, b"(SPI Reimbursement Request)"));
        assert!(contains(&bytes, b"(Field 1)"));
    }

    #[test]
    fn test_output_loads_with_one_page() {
        let bytes = PdfRenderer::default().render(&definition(3)).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_long_tables_break_pages_and_repeat_header() {
        let bytes = PdfRenderer::default().render(&definition(80)).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        let pages = doc.get_pages().len();
        assert!(pages > 1);
        assert_eq!(
            occurrences(&bytes, b"(currency / transfer information)"),
            pages
        );
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let renderer = PdfRenderer::default();
        let definition = definition(5);
        assert_eq!(
            renderer.render(&definition).unwrap(),
            renderer.render(&definition).unwrap()
        );
    }

    #[test]
    fn test_empty_definition_is_rejected() {
        let empty = DocDefinition {
            styles: Default::default(),
            content: Vec::new(),
        };
        assert!(matches!(
            PdfRenderer::default().render(&empty),
            Err(RenderError::Empty)
        ));
    }

    fn info_title(bytes: &[u8]) -> Vec<u8> {
        let doc = Document::load_mem(bytes).unwrap();
        let info = doc.trailer.get(b"Info").and_then(Object::as_reference).unwrap();
        doc.get_object(info)
            .and_then(Object::as_dict)
            .and_then(|d| d.get(b"Title"))
            .and_then(Object::as_str)
            .unwrap()
            .to_vec()
    }

    #[test]
    fn test_ascii_title_is_plain_in_info() {
        let bytes = PdfRenderer::default().render(&definition(1)).unwrap();
        assert_eq!(info_title(&bytes), b"SPI Reimbursement Request".to_vec());
    }

    #[test]
    fn test_non_ascii_title_is_utf16_in_info() {
        let definition = DocDefinition::from_model(&DocumentModel {
            title: "Rückerstattung €".to_string(),
            sections: Vec::new(),
        });
        let bytes = PdfRenderer::default().render(&definition).unwrap();

        let mut expected = vec![0xFE, 0xFF];
        expected.extend("Rückerstattung €".encode_utf16().flat_map(u16::to_be_bytes));
        assert_eq!(info_title(&bytes), expected);
    }

    #[test]
    fn test_extension() {
        assert_eq!(PdfRenderer::default().extension(), "pdf");
    }

    #[test]
    fn test_star_column_takes_remaining_width() {
        let renderer = PdfRenderer::default();
        let widths = renderer.column_widths(&[ColumnWidth::Fixed(150.0), ColumnWidth::Star]);
        assert_eq!(widths, vec![150.0, 365.0]);
    }

    #[test]
    fn test_spanning_cell_covers_both_columns() {
        let row = vec![Cell::spanning("Header", "table", 2)];
        let spans = cell_spans(&row, &[150.0, 365.0]);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].1, 515.0);
    }

    #[test]
    fn test_wrap_splits_on_words() {
        // 11 chars per line at 10pt
        let lines = wrap("alpha beta gamma delta", 62.0, 10.0);
        assert_eq!(lines, vec!["alpha beta", "gamma delta"]);
    }

    #[test]
    fn test_wrap_breaks_long_words() {
        let lines = wrap("DE89370400440532013000", 57.0, 10.0);
        assert_eq!(lines, vec!["DE89370400", "4405320130", "00"]);
    }

    #[test]
    fn test_wrap_empty_text_is_one_line() {
        assert_eq!(wrap("", 100.0, 10.0), vec![String::new()]);
    }

    #[test]
    fn test_encode_win_ansi() {
        assert_eq!(encode_win_ansi("Zürich €5"), b"Z\xfcrich \x805".to_vec());
        assert_eq!(encode_win_ansi("日本"), b"??".to_vec());
        assert_eq!(encode_win_ansi("a\tb"), b"a b".to_vec());
    }
}
