//! Renderer-agnostic document model

use serde::Serialize;

/// One label/value line of a section table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub label: String,
    pub value: String,
}

impl Row {
    pub fn new(label: &str, value: &str) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
        }
    }
}

/// A titled table of rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentSection {
    pub key: String,
    pub title: String,
    pub rows: Vec<Row>,
}

/// Document title followed by its sections in render order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentModel {
    pub title: String,
    pub sections: Vec<DocumentSection>,
}

impl DocumentModel {
    #[cfg(test)]
    pub fn section(&self, key: &str) -> Option<&DocumentSection> {
        self.sections.iter().find(|s| s.key == key)
    }
}
