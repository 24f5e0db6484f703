//! Form schema
//!
//! Declarative description of the reimbursement form: ordered sections, their
//! field descriptors, and discriminated branches (a currency selects which
//! banking fields apply). The schema is built once at startup and only ever
//! read afterwards.

mod currency;
mod project;

pub use currency::Currency;
pub use project::PROJECTS;

use std::collections::HashSet;
use thiserror::Error;

/// Title used for the generated document unless configured otherwise
pub const DEFAULT_TITLE: &str = "SPI Reimbursement Request";

/// Errors raised while building or querying a schema
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("unknown currency code '{0}'")]
    UnknownCurrency(String),

    #[error("dependency on '{discriminator}' declares branch '{value}' more than once")]
    DuplicateBranch {
        discriminator: String,
        value: String,
    },

    #[error("discriminator '{discriminator}' is not a field next to its dependency in section '{section}'")]
    UnknownDiscriminator {
        section: String,
        discriminator: String,
    },

    #[error("section '{0}' is declared more than once")]
    DuplicateSection(String),
}

/// One enumerated option of a choice field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    /// Value stored in the submitted data
    pub value: String,
    /// Human readable label shown in the form
    pub label: String,
}

impl Choice {
    /// Option whose label is its value
    pub fn plain(value: &str) -> Self {
        Self {
            value: value.to_string(),
            label: value.to_string(),
        }
    }

    pub fn labelled(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

/// Primitive type of a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    /// Calendar date entered as `YYYY-MM-DD`
    Date,
    Email,
    Choice(Vec<Choice>),
}

/// A named field with the title used as its label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub title: String,
    pub kind: FieldKind,
}

impl FieldDescriptor {
    fn new(name: &str, title: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            kind,
        }
    }

    pub fn text(name: &str, title: &str) -> Self {
        Self::new(name, title, FieldKind::Text)
    }

    pub fn number(name: &str, title: &str) -> Self {
        Self::new(name, title, FieldKind::Number)
    }

    pub fn date(name: &str, title: &str) -> Self {
        Self::new(name, title, FieldKind::Date)
    }

    pub fn email(name: &str, title: &str) -> Self {
        Self::new(name, title, FieldKind::Email)
    }

    pub fn choice(name: &str, title: &str, choices: Vec<Choice>) -> Self {
        Self::new(name, title, FieldKind::Choice(choices))
    }

    /// Choice field whose options are plain values
    pub fn plain_choice(name: &str, title: &str, values: &[&str]) -> Self {
        Self::choice(name, title, values.iter().map(|v| Choice::plain(v)).collect())
    }

    /// Options of a choice field, empty for every other kind
    #[cfg(test)]
    pub fn choices(&self) -> &[Choice] {
        match &self.kind {
            FieldKind::Choice(choices) => choices,
            _ => &[],
        }
    }
}

/// Fields that apply only while the discriminator holds `value`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub value: String,
    pub fields: Vec<FieldDescriptor>,
    pub required: Vec<String>,
    pub dependency: Option<Dependency>,
}

impl Branch {
    pub fn new(value: &str) -> Self {
        Self {
            value: value.to_string(),
            fields: Vec::new(),
            required: Vec::new(),
            dependency: None,
        }
    }

    /// Add an optional field
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Add a field that must be filled in while this branch is active
    pub fn required(mut self, field: FieldDescriptor) -> Self {
        self.required.push(field.name.clone());
        self.fields.push(field);
        self
    }

    pub fn with_dependency(mut self, dependency: Dependency) -> Self {
        self.dependency = Some(dependency);
        self
    }

    #[cfg(test)]
    pub fn field_by_name(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A discriminator field and the mutually exclusive branches it selects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub discriminator: String,
    pub branches: Vec<Branch>,
}

impl Dependency {
    pub fn new(discriminator: &str, branches: Vec<Branch>) -> Self {
        Self {
            discriminator: discriminator.to_string(),
            branches,
        }
    }

    /// Discriminator values in declaration order
    #[cfg(test)]
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.branches.iter().map(|b| b.value.as_str())
    }

    /// Branches keyed by `value`; a well-formed schema yields at most one
    pub fn matching<'a, 'v>(&'a self, value: &'v str) -> impl Iterator<Item = &'a Branch> + 'v
    where
        'a: 'v,
    {
        self.branches.iter().filter(move |b| b.value == value)
    }

    fn check(&self, section: &str, siblings: &[FieldDescriptor]) -> Result<(), SchemaError> {
        if !siblings.iter().any(|f| f.name == self.discriminator) {
            return Err(SchemaError::UnknownDiscriminator {
                section: section.to_string(),
                discriminator: self.discriminator.clone(),
            });
        }

        let mut seen = HashSet::new();
        for branch in &self.branches {
            if !seen.insert(branch.value.as_str()) {
                return Err(SchemaError::DuplicateBranch {
                    discriminator: self.discriminator.clone(),
                    value: branch.value.clone(),
                });
            }
            if let Some(nested) = &branch.dependency {
                nested.check(section, &branch.fields)?;
            }
        }
        Ok(())
    }
}

/// A titled group of fields, optionally with a discriminated dependency
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub key: String,
    pub title: String,
    pub fields: Vec<FieldDescriptor>,
    pub required: Vec<String>,
    pub dependency: Option<Dependency>,
}

impl Section {
    pub fn new(key: &str, title: &str) -> Self {
        Self {
            key: key.to_string(),
            title: title.to_string(),
            fields: Vec::new(),
            required: Vec::new(),
            dependency: None,
        }
    }

    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn required(mut self, field: FieldDescriptor) -> Self {
        self.required.push(field.name.clone());
        self.fields.push(field);
        self
    }

    pub fn with_dependency(mut self, dependency: Dependency) -> Self {
        self.dependency = Some(dependency);
        self
    }

    #[cfg(test)]
    pub fn field_by_name(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// The complete form: a document title and its sections in render order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSchema {
    title: String,
    sections: Vec<Section>,
}

impl FormSchema {
    /// Build a schema, rejecting duplicate sections, duplicate branch values,
    /// and dependencies whose discriminator is not a sibling field.
    pub fn new(title: &str, sections: Vec<Section>) -> Result<Self, SchemaError> {
        let mut keys = HashSet::new();
        for section in &sections {
            if !keys.insert(section.key.as_str()) {
                return Err(SchemaError::DuplicateSection(section.key.clone()));
            }
            if let Some(dependency) = &section.dependency {
                dependency.check(&section.key, &section.fields)?;
            }
        }

        Ok(Self {
            title: title.to_string(),
            sections,
        })
    }

    /// The reimbursement request form: recipient metadata plus per-currency
    /// transfer details.
    pub fn reimbursement() -> Result<Self, SchemaError> {
        let meta = Section::new("meta", "meta / recipient information")
            .required(FieldDescriptor::plain_choice("project", "Project", PROJECTS))
            .required(FieldDescriptor::date("date", "Date"))
            .required(FieldDescriptor::text("name", "Name"))
            .required(FieldDescriptor::email("email", "Email"));

        let currencies = Currency::ALL
            .iter()
            .map(|c| Choice::labelled(c.code(), &c.label()))
            .collect();
        let curr = Section::new("curr", "currency / transfer information")
            .field(FieldDescriptor::number("amount", "Amount"))
            .required(FieldDescriptor::choice("currency", "Currency", currencies))
            .with_dependency(Dependency::new(
                "currency",
                Currency::ALL.iter().map(Currency::branch).collect(),
            ));

        Self::new(DEFAULT_TITLE, vec![meta, curr])
    }

    /// Same schema under a different document title
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    #[cfg(test)]
    pub fn section(&self, key: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_section() -> Section {
        Section::new("curr", "Currency")
            .required(FieldDescriptor::plain_choice("currency", "currency", &["EUR", "USD"]))
            .with_dependency(Dependency::new(
                "currency",
                vec![
                    Branch::new("EUR").required(FieldDescriptor::text("iban", "IBAN")),
                    Branch::new("USD").required(FieldDescriptor::text("routing_number", "Routing")),
                ],
            ))
    }

    #[test]
    fn test_reimbursement_schema_builds() {
        let schema = FormSchema::reimbursement().unwrap();
        assert_eq!(schema.title(), DEFAULT_TITLE);
        let keys: Vec<_> = schema.sections().iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["meta", "curr"]);
    }

    #[test]
    fn test_reimbursement_has_one_branch_per_currency() {
        let schema = FormSchema::reimbursement().unwrap();
        let dependency = schema.section("curr").unwrap().dependency.as_ref().unwrap();
        assert_eq!(dependency.discriminator, "currency");
        assert_eq!(dependency.branches.len(), Currency::ALL.len());
        for currency in Currency::ALL {
            assert_eq!(dependency.matching(currency.code()).count(), 1);
        }
    }

    #[test]
    fn test_matched_branch_outlives_the_lookup_value() {
        let schema = FormSchema::reimbursement().unwrap();
        let dependency = schema.section("curr").unwrap().dependency.as_ref().unwrap();
        let branch;
        {
            let code = String::from("EUR");
            branch = dependency.matching(&code).next().unwrap();
        }
        assert_eq!(branch.value, "EUR");
    }

    #[test]
    fn test_currency_choice_lists_every_code() {
        let schema = FormSchema::reimbursement().unwrap();
        let field = schema.section("curr").unwrap().field_by_name("currency").unwrap();
        let values: Vec<_> = field.choices().iter().map(|c| c.value.as_str()).collect();
        let dependency = schema.section("curr").unwrap().dependency.as_ref().unwrap();
        assert_eq!(values, dependency.values().collect::<Vec<_>>());
    }

    #[test]
    fn test_meta_fields_are_required() {
        let schema = FormSchema::reimbursement().unwrap();
        let meta = schema.section("meta").unwrap();
        assert_eq!(meta.required, vec!["project", "date", "name", "email"]);
    }

    #[test]
    fn test_with_title_overrides_title() {
        let schema = FormSchema::reimbursement().unwrap().with_title("Travel Claim");
        assert_eq!(schema.title(), "Travel Claim");
    }

    #[test]
    fn test_duplicate_branch_is_rejected() {
        let section = Section::new("curr", "Currency")
            .required(FieldDescriptor::text("currency", "Currency"))
            .with_dependency(Dependency::new(
                "currency",
                vec![Branch::new("EUR"), Branch::new("EUR")],
            ));
        let err = FormSchema::new("t", vec![section]).unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateBranch {
                discriminator: "currency".to_string(),
                value: "EUR".to_string(),
            }
        );
    }

    #[test]
    fn test_discriminator_must_be_sibling_field() {
        let section = Section::new("curr", "Currency")
            .with_dependency(Dependency::new("currency", vec![Branch::new("EUR")]));
        let err = FormSchema::new("t", vec![section]).unwrap_err();
        assert!(matches!(err, SchemaError::UnknownDiscriminator { .. }));
    }

    #[test]
    fn test_nested_discriminator_is_checked_against_branch_fields() {
        let nested = Dependency::new("method", vec![Branch::new("ACH")]);
        let section = Section::new("curr", "Currency")
            .required(FieldDescriptor::text("currency", "Currency"))
            .with_dependency(Dependency::new(
                "currency",
                vec![Branch::new("USD").with_dependency(nested)],
            ));
        let err = FormSchema::new("t", vec![section]).unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnknownDiscriminator {
                section: "curr".to_string(),
                discriminator: "method".to_string(),
            }
        );
    }

    #[test]
    fn test_duplicate_section_is_rejected() {
        let err = FormSchema::new("t", vec![sample_section(), sample_section()]).unwrap_err();
        assert_eq!(err, SchemaError::DuplicateSection("curr".to_string()));
    }

    #[test]
    fn test_required_builder_records_name() {
        let section = sample_section();
        assert_eq!(section.required, vec!["currency"]);
        let branch = &section.dependency.as_ref().unwrap().branches[0];
        assert_eq!(branch.required, vec!["iban"]);
        assert_eq!(branch.field_by_name("iban").unwrap().title, "IBAN");
    }

    #[test]
    fn test_choices_empty_for_text() {
        assert!(FieldDescriptor::text("name", "Name").choices().is_empty());
    }
}
