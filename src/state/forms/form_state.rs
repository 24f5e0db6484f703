//! Form state management for the reimbursement form

use super::field::FormField;
use crate::form_data::FormData;
use crate::rules::{GroupKey, GroupPath, RuleSet, ValueLookup};
use crate::schema::{FormSchema, Section};
use std::collections::BTreeSet;

/// Trait for common form operations
pub trait Form {
    fn field_count(&self) -> usize;
    fn active_field(&self) -> usize;
    fn set_active_field(&mut self, index: usize);
    fn next_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        self.set_active_field((current + 1) % count);
    }
    fn prev_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        if current == 0 {
            self.set_active_field(count - 1);
        } else {
            self.set_active_field(current - 1);
        }
    }
    fn get_field(&self, index: usize) -> Option<&FormField>;
}

/// Every field a section can show, across all of its branch groups
#[derive(Debug, Clone)]
pub struct SectionState {
    pub key: String,
    pub title: String,
    pub fields: Vec<FormField>,
    rules: RuleSet,
}

impl SectionState {
    pub fn from_section(section: &Section) -> Self {
        let rules = RuleSet::derive(section);

        let mut fields: Vec<FormField> = section
            .fields
            .iter()
            .map(|f| FormField::from_descriptor(f, section.required.contains(&f.name), GroupPath::new()))
            .collect();
        for group in rules.groups() {
            fields.extend(
                group
                    .fields
                    .iter()
                    .map(|f| FormField::from_descriptor(f, group.is_required(&f.name), group.path.clone())),
            );
        }

        Self {
            key: section.key.clone(),
            title: section.title.clone(),
            fields,
            rules,
        }
    }

    pub fn hidden_groups(&self) -> BTreeSet<GroupPath> {
        self.rules.hidden(self)
    }

    /// Indices into `fields` of what is currently shown, in display order
    pub fn visible_indices(&self) -> Vec<usize> {
        let groups: Vec<&GroupPath> = self
            .rules
            .visible_groups(self)
            .into_iter()
            .map(|g| &g.path)
            .collect();
        self.fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.group.is_empty() || groups.contains(&&f.group))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn visible_fields(&self) -> impl Iterator<Item = &FormField> {
        self.visible_indices().into_iter().map(move |i| &self.fields[i])
    }

    /// Clear every field whose group is hidden; returns how many held a value
    pub fn clear_hidden(&mut self) -> usize {
        let removed = self.hidden_groups();
        let mut cleared = 0;
        for field in &mut self.fields {
            if !RuleSet::is_visible(&field.group, &removed) && !field.is_empty() {
                field.clear();
                cleared += 1;
            }
        }
        cleared
    }
}

/// Discriminators are read from the field with that name in the rule's scope
impl ValueLookup for SectionState {
    fn lookup(&self, scope: &[GroupKey], name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.group == scope && f.name == name)
            .map(FormField::as_text)
            .filter(|v| !v.is_empty())
    }
}

/// Position of a visible field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRef {
    pub section: usize,
    pub field: usize,
}

/// The whole form: every section plus a trailing submit button row
#[derive(Debug, Clone)]
pub struct ReimbursementForm {
    pub sections: Vec<SectionState>,
    /// Index into the visible fields; one past the last is the submit button
    pub active_field_index: usize,
}

impl ReimbursementForm {
    pub fn new(schema: &FormSchema) -> Self {
        Self {
            sections: schema.sections().iter().map(SectionState::from_section).collect(),
            active_field_index: 0,
        }
    }

    /// Currently visible fields, section by section
    pub fn visible(&self) -> Vec<FieldRef> {
        self.sections
            .iter()
            .enumerate()
            .flat_map(|(section, state)| {
                state
                    .visible_indices()
                    .into_iter()
                    .map(move |field| FieldRef { section, field })
            })
            .collect()
    }

    pub fn is_submit_active(&self) -> bool {
        self.active_field_index >= self.visible().len()
    }

    pub fn active_ref(&self) -> Option<FieldRef> {
        self.visible().get(self.active_field_index).copied()
    }

    pub fn active(&self) -> Option<&FormField> {
        self.get_field(self.active_field_index)
    }

    #[cfg(test)]
    pub fn section(&self, key: &str) -> Option<&SectionState> {
        self.sections.iter().find(|s| s.key == key)
    }

    /// Apply `edit` to the active field, then drop values that a changed
    /// discriminator has hidden
    fn edit_active(&mut self, edit: impl FnOnce(&mut FormField)) {
        let Some(active) = self.active_ref() else {
            return;
        };
        let section = &mut self.sections[active.section];
        let field = &mut section.fields[active.field];
        let before = field.as_text().to_string();
        edit(field);

        if field.is_choice() && field.as_text() != before {
            let cleared = section.clear_hidden();
            tracing::debug!(
                section = %section.key,
                field = %section.fields[active.field].name,
                cleared,
                "discriminator changed"
            );
        }
        let count = self.field_count();
        self.set_active_field(self.active_field_index.min(count - 1));
    }

    pub fn input_char(&mut self, c: char) {
        self.edit_active(|f| f.push_char(c));
    }

    pub fn backspace(&mut self) {
        self.edit_active(FormField::pop_char);
    }

    pub fn next_choice(&mut self) {
        self.edit_active(FormField::next_choice);
    }

    pub fn prev_choice(&mut self) {
        self.edit_active(FormField::prev_choice);
    }

    /// Problems with the visible fields, prefixed by section title
    pub fn validate(&self) -> Vec<String> {
        self.sections
            .iter()
            .flat_map(|section| {
                section
                    .visible_fields()
                    .filter_map(|f| f.validate().err())
                    .map(|e| format!("{}: {e}", section.title))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Non-empty visible values; the first field wins when a name repeats
    pub fn to_form_data(&self) -> FormData {
        let mut data = FormData::new();
        for section in &self.sections {
            for field in section.visible_fields() {
                if data.field(&section.key, &field.name).is_some() {
                    continue;
                }
                if let Some(value) = field.json_value() {
                    data.set(&section.key, &field.name, value);
                }
            }
        }
        data
    }
}

impl Form for ReimbursementForm {
    fn field_count(&self) -> usize {
        self.visible().len() + 1 // fields plus the submit button
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(self.field_count() - 1);
    }
    fn get_field(&self, index: usize) -> Option<&FormField> {
        self.visible()
            .get(index)
            .map(|r| &self.sections[r.section].fields[r.field])
    }
}
