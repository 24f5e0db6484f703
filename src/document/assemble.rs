//! Document assembly
//!
//! Walks submitted data against the schema and produces the label/value
//! tables that end up in the PDF. Rows follow schema declaration order; the
//! order of keys in the submitted data never matters.

use super::model::{DocumentModel, DocumentSection, Row};
use crate::form_data::FormData;
use crate::rules::RuleSet;
use crate::schema::{Branch, Dependency, FieldDescriptor, FormSchema, Section};
use serde_json::{Map, Value};
use std::collections::HashSet;
use thiserror::Error;

/// Reasons a submission cannot be turned into a document
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssembleError {
    #[error("section '{section}' must be an object")]
    MalformedSection { section: String },

    #[error("section '{section}' has no value for '{discriminator}'")]
    MissingDiscriminator {
        section: String,
        discriminator: String,
    },

    #[error("no '{discriminator}' branch matches '{value}' in section '{section}'")]
    UnresolvedBranch {
        section: String,
        discriminator: String,
        value: String,
    },

    #[error("more than one '{discriminator}' branch matches '{value}' in section '{section}'")]
    AmbiguousBranch {
        section: String,
        discriminator: String,
        value: String,
    },
}

/// Builds document models for one schema
pub struct Assembler<'s> {
    schema: &'s FormSchema,
    /// One rule set per schema section, same order
    rules: Vec<RuleSet>,
}

impl<'s> Assembler<'s> {
    pub fn new(schema: &'s FormSchema) -> Self {
        let rules = schema.sections().iter().map(RuleSet::derive).collect();
        Self { schema, rules }
    }

    /// Assemble every section in schema order. Fails without producing a
    /// partial document if any dependency cannot be resolved.
    pub fn assemble(&self, data: &FormData) -> Result<DocumentModel, AssembleError> {
        let empty = Map::new();
        let mut sections = Vec::with_capacity(self.schema.sections().len());

        for (section, rules) in self.schema.sections().iter().zip(&self.rules) {
            let values = match data.section(&section.key) {
                None | Some(Value::Null) => &empty,
                Some(Value::Object(values)) => values,
                Some(_) => {
                    return Err(AssembleError::MalformedSection {
                        section: section.key.clone(),
                    })
                }
            };

            let rows = resolved_fields(section, rules, values)?
                .into_iter()
                .filter_map(|field| {
                    let value = display_value(values.get(&field.name)?)?;
                    Some(Row::new(&field.title, &value))
                })
                .collect();

            sections.push(DocumentSection {
                key: section.key.clone(),
                title: section.title.clone(),
                rows,
            });
        }

        Ok(DocumentModel {
            title: self.schema.title().to_string(),
            sections,
        })
    }
}

/// Section fields followed by the fields of the resolved branch chain, first
/// declaration wins when a name repeats
fn resolved_fields<'a>(
    section: &'a Section,
    rules: &'a RuleSet,
    values: &Map<String, Value>,
) -> Result<Vec<&'a FieldDescriptor>, AssembleError> {
    let mut dependency = section.dependency.as_ref();

    while let Some(current) = dependency {
        let branch = resolve_branch(&section.key, current, values)?;
        tracing::debug!(
            section = %section.key,
            discriminator = %current.discriminator,
            branch = %branch.value,
            "resolved branch"
        );
        dependency = branch.dependency.as_ref();
    }

    // Every level resolved to one branch, so the rules leave exactly that chain
    let mut fields = rules.visible_fields(section, values);
    let mut seen = HashSet::new();
    fields.retain(|f| seen.insert(f.name.as_str()));
    Ok(fields)
}

fn resolve_branch<'a>(
    section: &str,
    dependency: &'a Dependency,
    values: &Map<String, Value>,
) -> Result<&'a Branch, AssembleError> {
    let value = values
        .get(&dependency.discriminator)
        .and_then(Value::as_str)
        .ok_or_else(|| AssembleError::MissingDiscriminator {
            section: section.to_string(),
            discriminator: dependency.discriminator.clone(),
        })?;

    let mut matches = dependency.matching(value);
    match (matches.next(), matches.next()) {
        (Some(branch), None) => Ok(branch),
        (None, _) => Err(AssembleError::UnresolvedBranch {
            section: section.to_string(),
            discriminator: dependency.discriminator.clone(),
            value: value.to_string(),
        }),
        (Some(_), Some(_)) => Err(AssembleError::AmbiguousBranch {
            section: section.to_string(),
            discriminator: dependency.discriminator.clone(),
            value: value.to_string(),
        }),
    }
}

/// Text shown for a submitted value; `null` counts as not filled in
fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}
