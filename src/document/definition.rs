//! Styled content handed to the PDF renderer
//!
//! A document definition is a list of content blocks plus named text styles:
//! the document title, then one two-column table per section whose first row
//! is a header spanning both columns.

use super::model::DocumentModel;
use serde::Serialize;
use std::collections::BTreeMap;

/// Style applied to the document title
pub const TITLE_STYLE: &str = "title";
/// Style applied to each section's header row
pub const TABLE_HEADER_STYLE: &str = "table";

/// Width of the label column, in points
pub const LABEL_COLUMN_WIDTH: f32 = 150.0;
/// Space above each section table, in points
pub const TABLE_MARGIN_TOP: f32 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const GRAY: Rgb = Rgb(128, 128, 128);

    /// Components scaled to the 0..=1 range PDF colour operators take
    pub fn unit(&self) -> [f32; 3] {
        [
            f32::from(self.0) / 255.0,
            f32::from(self.1) / 255.0,
            f32::from(self.2) / 255.0,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextStyle {
    pub font_size: f32,
    pub bold: bool,
    pub color: Rgb,
    /// Background of the table cell using this style
    pub fill_color: Option<Rgb>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 12.0,
            bold: false,
            color: Rgb::BLACK,
            fill_color: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum ColumnWidth {
    Fixed(f32),
    /// Takes whatever width the fixed columns leave
    Star,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    pub text: String,
    pub style: Option<String>,
    pub col_span: usize,
}

impl Cell {
    pub fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            style: None,
            col_span: 1,
        }
    }

    pub fn spanning(text: &str, style: &str, col_span: usize) -> Self {
        Self {
            text: text.to_string(),
            style: Some(style.to_string()),
            col_span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    /// Leading rows repeated at the top of every page the table spans
    pub header_rows: usize,
    pub widths: Vec<ColumnWidth>,
    pub body: Vec<Vec<Cell>>,
    pub margin_top: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ContentBlock {
    Text { text: String, style: String },
    Table(Table),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocDefinition {
    pub styles: BTreeMap<String, TextStyle>,
    pub content: Vec<ContentBlock>,
}

impl DocDefinition {
    /// Lay out a document model as title text plus one table per section
    pub fn from_model(model: &DocumentModel) -> Self {
        let mut styles = BTreeMap::new();
        styles.insert(
            TITLE_STYLE.to_string(),
            TextStyle {
                font_size: 24.0,
                bold: true,
                ..TextStyle::default()
            },
        );
        styles.insert(
            TABLE_HEADER_STYLE.to_string(),
            TextStyle {
                font_size: 16.0,
                bold: true,
                color: Rgb::WHITE,
                fill_color: Some(Rgb::GRAY),
            },
        );

        let mut content = vec![ContentBlock::Text {
            text: model.title.clone(),
            style: TITLE_STYLE.to_string(),
        }];

        for section in &model.sections {
            let mut body = vec![vec![Cell::spanning(&section.title, TABLE_HEADER_STYLE, 2)]];
            body.extend(
                section
                    .rows
                    .iter()
                    .map(|row| vec![Cell::plain(&row.label), Cell::plain(&row.value)]),
            );
            content.push(ContentBlock::Table(Table {
                header_rows: 1,
                widths: vec![ColumnWidth::Fixed(LABEL_COLUMN_WIDTH), ColumnWidth::Star],
                body,
                margin_top: TABLE_MARGIN_TOP,
            }));
        }

        Self { styles, content }
    }

    /// Named style, or the default body style when the name is unknown
    pub fn style(&self, name: Option<&str>) -> TextStyle {
        name.and_then(|n| self.styles.get(n))
            .cloned()
            .unwrap_or_default()
    }

    /// Text of the first title block
    pub fn title(&self) -> Option<&str> {
        self.content.iter().find_map(|block| match block {
            ContentBlock::Text { text, style } if style == TITLE_STYLE => Some(text.as_str()),
            _ => None,
        })
    }
}
