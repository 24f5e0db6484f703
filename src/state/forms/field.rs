//! Form field value objects

use crate::rules::GroupPath;
use crate::schema::{Choice, FieldDescriptor, FieldKind};
use chrono::NaiveDate;
use serde_json::{Number, Value};

/// Type-safe field values
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    /// Index into the field's choices, None until one is picked
    Choice(Option<usize>),
}

/// Represents a single form field with its configuration and value
#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub value: FieldValue,
    pub required: bool,
    /// Branch group owning the field; empty for section-level fields
    pub group: GroupPath,
}

impl FormField {
    pub fn from_descriptor(descriptor: &FieldDescriptor, required: bool, group: GroupPath) -> Self {
        let value = match descriptor.kind {
            FieldKind::Choice(_) => FieldValue::Choice(None),
            _ => FieldValue::Text(String::new()),
        };
        Self {
            name: descriptor.name.clone(),
            label: descriptor.title.clone(),
            kind: descriptor.kind.clone(),
            value,
            required,
            group,
        }
    }

    pub fn is_choice(&self) -> bool {
        matches!(self.kind, FieldKind::Choice(_))
    }

    fn choices(&self) -> &[Choice] {
        match &self.kind {
            FieldKind::Choice(choices) => choices,
            _ => &[],
        }
    }

    pub fn selected(&self) -> Option<&Choice> {
        match self.value {
            FieldValue::Choice(Some(index)) => self.choices().get(index),
            _ => None,
        }
    }

    /// Raw value: the typed text, or the selected choice's stored value
    pub fn as_text(&self) -> &str {
        match &self.value {
            FieldValue::Text(s) => s,
            FieldValue::Choice(_) => self.selected().map(|c| c.value.as_str()).unwrap_or(""),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_text().trim().is_empty()
    }

    /// Select a choice by its stored value; false when no option matches
    #[cfg(test)]
    pub fn select(&mut self, value: &str) -> bool {
        match self.choices().iter().position(|c| c.value == value) {
            Some(index) => {
                self.value = FieldValue::Choice(Some(index));
                true
            }
            None => false,
        }
    }

    /// Push a character to the field value. Number fields only take digits,
    /// a leading minus, and one decimal point. Choice fields jump to the next
    /// option whose label starts with the character.
    pub fn push_char(&mut self, c: char) {
        if self.is_choice() {
            self.jump_to(c);
            return;
        }

        let numeric = self.kind == FieldKind::Number;
        if let FieldValue::Text(s) = &mut self.value {
            let accepted = !numeric
                || c.is_ascii_digit()
                || (c == '-' && s.is_empty())
                || (c == '.' && !s.contains('.'));
            if accepted {
                s.push(c);
            }
        }
    }

    fn jump_to(&mut self, c: char) {
        let len = self.choices().len();
        let start = match self.value {
            FieldValue::Choice(Some(index)) => index + 1,
            _ => 0,
        };
        let target = c.to_lowercase().collect::<String>();
        let found = (0..len).map(|offset| (start + offset) % len).find(|&index| {
            self.choices()[index]
                .label
                .to_lowercase()
                .starts_with(&target)
        });
        if let Some(index) = found {
            self.value = FieldValue::Choice(Some(index));
        }
    }

    /// Remove the last character; unselects a choice
    pub fn pop_char(&mut self) {
        match &mut self.value {
            FieldValue::Text(s) => {
                s.pop();
            }
            FieldValue::Choice(index) => *index = None,
        }
    }

    /// Select the next option, wrapping around
    pub fn next_choice(&mut self) {
        let len = self.choices().len();
        if let FieldValue::Choice(index) = &mut self.value {
            if len > 0 {
                *index = Some(index.map_or(0, |i| (i + 1) % len));
            }
        }
    }

    /// Select the previous option, wrapping around
    pub fn prev_choice(&mut self) {
        let len = self.choices().len();
        if let FieldValue::Choice(index) = &mut self.value {
            if len > 0 {
                *index = Some(match *index {
                    None | Some(0) => len - 1,
                    Some(i) => i - 1,
                });
            }
        }
    }

    /// Clear the field value
    pub fn clear(&mut self) {
        match &mut self.value {
            FieldValue::Text(s) => s.clear(),
            FieldValue::Choice(index) => *index = None,
        }
    }

    /// Get the display value for rendering
    pub fn display_value(&self) -> String {
        match &self.value {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Choice(_) => self.selected().map(|c| c.label.clone()).unwrap_or_default(),
        }
    }

    /// Check the value against the field's kind and required flag
    pub fn validate(&self) -> Result<(), String> {
        if self.is_empty() {
            return if self.required {
                Err(format!("{} is required", self.label))
            } else {
                Ok(())
            };
        }

        let text = self.as_text().trim();
        match self.kind {
            FieldKind::Number if text.parse::<f64>().map_or(true, |n| !n.is_finite()) => {
                Err(format!("{} must be a number", self.label))
            }
            FieldKind::Date if NaiveDate::parse_from_str(text, "%Y-%m-%d").is_err() => {
                Err(format!("{} must be a date (YYYY-MM-DD)", self.label))
            }
            FieldKind::Email if !is_email(text) => {
                Err(format!("{} must be an email address", self.label))
            }
            _ => Ok(()),
        }
    }

    /// Value as it goes into the submitted data; None when empty
    pub fn json_value(&self) -> Option<Value> {
        if self.is_empty() {
            return None;
        }
        let text = self.as_text().trim();
        let value = match self.kind {
            FieldKind::Number => text
                .parse::<i64>()
                .map(Value::from)
                .ok()
                .or_else(|| text.parse::<f64>().ok().and_then(Number::from_f64).map(Value::Number))
                .unwrap_or_else(|| Value::String(text.to_string())),
            _ => Value::String(text.to_string()),
        };
        Some(value)
    }
}

/// One '@' with something on both sides and no whitespace
fn is_email(text: &str) -> bool {
    match text.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !text.contains(char::is_whitespace)
        }
        None => false,
    }
}
