//! Conditional visibility rules
//!
//! Every branch of a dependency becomes one rule: "if the discriminator is not
//! `value`, remove the field group owned by `value`". A nested dependency
//! (USD payment methods) contributes rules scoped under its parent group, so
//! removing the parent also removes everything beneath it.
//!
//! Rules only ever remove their own group, which keeps the rule set
//! idempotent and independent of evaluation order.

use crate::schema::{Dependency, FieldDescriptor, Section};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// One step from a section root to a branch group
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    pub discriminator: String,
    pub value: String,
}

impl GroupKey {
    pub fn new(discriminator: &str, value: &str) -> Self {
        Self {
            discriminator: discriminator.to_string(),
            value: value.to_string(),
        }
    }
}

/// Location of a field group; the empty path is the section itself
pub type GroupPath = Vec<GroupKey>;

/// Source of discriminator values for rule evaluation
pub trait ValueLookup {
    /// Current value of `name` among the fields owned by `scope`
    fn lookup(&self, scope: &[GroupKey], name: &str) -> Option<&str>;
}

/// Submitted section data is flat, so the scope is irrelevant
impl ValueLookup for Map<String, Value> {
    fn lookup(&self, _scope: &[GroupKey], name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }
}

/// "If `discriminator` ≠ `value`, remove the group at `scope` + (`discriminator`, `value`)"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalRule {
    pub scope: GroupPath,
    pub discriminator: String,
    pub value: String,
}

impl ConditionalRule {
    /// Path of the group this rule removes
    pub fn group(&self) -> GroupPath {
        let mut path = self.scope.clone();
        path.push(GroupKey::new(&self.discriminator, &self.value));
        path
    }

    /// True when the condition holds and the group must be removed.
    /// An unset discriminator never equals `value`, so it always fires.
    pub fn fires(&self, values: &impl ValueLookup) -> bool {
        values.lookup(&self.scope, &self.discriminator) != Some(self.value.as_str())
    }
}

/// Fields owned by one branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldGroup {
    pub path: GroupPath,
    pub fields: Vec<FieldDescriptor>,
    pub required: Vec<String>,
}

impl FieldGroup {
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }
}

/// The rules and field groups derived from one section
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RuleSet {
    rules: Vec<ConditionalRule>,
    groups: Vec<FieldGroup>,
}

impl RuleSet {
    /// Derive one rule per discriminator value, depth first in declaration
    /// order. Sections without a dependency yield an empty set.
    pub fn derive(section: &Section) -> Self {
        let mut set = Self::default();
        if let Some(dependency) = &section.dependency {
            set.collect(dependency, &GroupPath::new());
        }
        tracing::debug!(
            section = %section.key,
            rules = set.rules.len(),
            "derived conditional rules"
        );
        set
    }

    fn collect(&mut self, dependency: &Dependency, scope: &GroupPath) {
        for branch in &dependency.branches {
            let rule = ConditionalRule {
                scope: scope.clone(),
                discriminator: dependency.discriminator.clone(),
                value: branch.value.clone(),
            };
            let path = rule.group();
            self.groups.push(FieldGroup {
                path: path.clone(),
                fields: branch.fields.clone(),
                required: branch.required.clone(),
            });
            self.rules.push(rule);

            if let Some(nested) = &branch.dependency {
                self.collect(nested, &path);
            }
        }
    }

    #[cfg(test)]
    pub fn rules(&self) -> &[ConditionalRule] {
        &self.rules
    }

    pub fn groups(&self) -> &[FieldGroup] {
        &self.groups
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Groups removed by the firing subset of `rules`, in any order
    pub fn removed_groups<'r>(
        rules: impl IntoIterator<Item = &'r ConditionalRule>,
        values: &impl ValueLookup,
    ) -> BTreeSet<GroupPath> {
        rules
            .into_iter()
            .filter(|rule| rule.fires(values))
            .map(ConditionalRule::group)
            .collect()
    }

    /// Groups removed by this rule set for the given values
    pub fn hidden(&self, values: &impl ValueLookup) -> BTreeSet<GroupPath> {
        Self::removed_groups(&self.rules, values)
    }

    /// A group survives when neither it nor any ancestor was removed
    pub fn is_visible(path: &[GroupKey], removed: &BTreeSet<GroupPath>) -> bool {
        !removed.iter().any(|r| path.starts_with(r))
    }

    /// Groups left after applying every rule, in declaration order
    pub fn visible_groups(&self, values: &impl ValueLookup) -> Vec<&FieldGroup> {
        let removed = self.hidden(values);
        self.groups
            .iter()
            .filter(|g| Self::is_visible(&g.path, &removed))
            .collect()
    }

    /// Section fields followed by the fields of every surviving group
    pub fn visible_fields<'a>(
        &'a self,
        section: &'a Section,
        values: &impl ValueLookup,
    ) -> Vec<&'a FieldDescriptor> {
        section
            .fields
            .iter()
            .chain(self.visible_groups(values).into_iter().flat_map(|g| &g.fields))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Branch, FieldDescriptor, FormSchema};
    use serde_json::json;

    fn curr_section() -> Section {
        Section::new("curr", "curr")
            .required(FieldDescriptor::plain_choice("currency", "currency", &["EUR", "USD"]))
            .with_dependency(Dependency::new(
                "currency",
                vec![
                    Branch::new("EUR").required(FieldDescriptor::text("iban", "IBAN")),
                    Branch::new("USD")
                        .required(FieldDescriptor::text("routing_number", "Routing Number"))
                        .required(FieldDescriptor::text("account_number", "Account Number")),
                ],
            ))
    }

    fn values(value: serde_json::Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn names(fields: Vec<&FieldDescriptor>) -> Vec<&str> {
        fields.into_iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn test_one_rule_per_branch() {
        let rules = RuleSet::derive(&curr_section());
        assert_eq!(rules.len(), 2);
        let values: Vec<_> = rules.rules().iter().map(|r| r.value.as_str()).collect();
        assert_eq!(values, vec!["EUR", "USD"]);
    }

    #[test]
    fn test_section_without_dependency_has_no_rules() {
        let section = Section::new("meta", "meta").field(FieldDescriptor::text("name", "Name"));
        let rules = RuleSet::derive(&section);
        assert!(rules.is_empty());
        assert_eq!(names(rules.visible_fields(&section, &Map::new())), vec!["name"]);
    }

    #[test]
    fn test_selected_branch_stays_visible() {
        let section = curr_section();
        let rules = RuleSet::derive(&section);

        let eur = values(json!({"currency": "EUR"}));
        assert_eq!(names(rules.visible_fields(&section, &eur)), vec!["currency", "iban"]);

        let usd = values(json!({"currency": "USD"}));
        assert_eq!(
            names(rules.visible_fields(&section, &usd)),
            vec!["currency", "routing_number", "account_number"]
        );
    }

    #[test]
    fn test_unset_discriminator_hides_every_group() {
        let section = curr_section();
        let rules = RuleSet::derive(&section);
        assert!(rules.visible_groups(&Map::new()).is_empty());
        assert_eq!(rules.hidden(&Map::new()).len(), 2);
    }

    #[test]
    fn test_unknown_value_hides_every_group() {
        let section = curr_section();
        let rules = RuleSet::derive(&section);
        let gbp = values(json!({"currency": "GBP"}));
        assert!(rules.visible_groups(&gbp).is_empty());
    }

    #[test]
    fn test_rule_order_does_not_matter() {
        let rules = RuleSet::derive(&curr_section());
        let usd = values(json!({"currency": "USD"}));
        let forward = RuleSet::removed_groups(rules.rules(), &usd);
        let backward = RuleSet::removed_groups(rules.rules().iter().rev(), &usd);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_applying_twice_is_idempotent() {
        let rules = RuleSet::derive(&curr_section());
        let eur = values(json!({"currency": "EUR"}));
        let doubled: Vec<_> = rules.rules().iter().chain(rules.rules()).collect();
        assert_eq!(
            RuleSet::removed_groups(doubled, &eur),
            RuleSet::removed_groups(rules.rules(), &eur)
        );
    }

    #[test]
    fn test_every_currency_leaves_exactly_its_branch() {
        let schema = FormSchema::reimbursement().unwrap();
        let section = schema.section("curr").unwrap();
        let rules = RuleSet::derive(section);
        let dependency = section.dependency.as_ref().unwrap();

        for branch in &dependency.branches {
            let data = values(json!({"currency": branch.value}));
            let top: Vec<_> = rules
                .visible_groups(&data)
                .into_iter()
                .filter(|g| g.path.len() == 1)
                .collect();
            assert_eq!(top.len(), 1, "{}", branch.value);
            assert_eq!(top[0].fields, branch.fields);
        }
    }

    #[test]
    fn test_nested_rules_are_scoped_under_parent() {
        let schema = FormSchema::reimbursement().unwrap();
        let rules = RuleSet::derive(schema.section("curr").unwrap());
        // 50 currencies plus the two USD payment methods
        assert_eq!(rules.len(), 52);

        let nested: Vec<_> = rules.rules().iter().filter(|r| !r.scope.is_empty()).collect();
        assert_eq!(nested.len(), 2);
        assert!(nested
            .iter()
            .all(|r| r.scope == vec![GroupKey::new("currency", "USD")]));
    }

    #[test]
    fn test_nested_group_follows_payment_method() {
        let schema = FormSchema::reimbursement().unwrap();
        let section = schema.section("curr").unwrap();
        let rules = RuleSet::derive(section);

        let ach = values(json!({"currency": "USD", "payment_method": "ACH"}));
        assert_eq!(
            names(rules.visible_fields(section, &ach)),
            vec!["amount", "currency", "payment_method", "routing_number", "account_number"]
        );

        let undecided = values(json!({"currency": "USD"}));
        assert_eq!(
            names(rules.visible_fields(section, &undecided)),
            vec!["amount", "currency", "payment_method"]
        );
    }

    #[test]
    fn test_removing_parent_removes_nested_group() {
        let schema = FormSchema::reimbursement().unwrap();
        let section = schema.section("curr").unwrap();
        let rules = RuleSet::derive(section);

        let stale = values(json!({"currency": "EUR", "payment_method": "ACH"}));
        assert_eq!(
            names(rules.visible_fields(section, &stale)),
            vec!["amount", "currency", "iban"]
        );
    }

    #[test]
    fn test_is_visible_checks_ancestors() {
        let parent = vec![GroupKey::new("currency", "USD")];
        let child = vec![
            GroupKey::new("currency", "USD"),
            GroupKey::new("payment_method", "ACH"),
        ];
        let removed: BTreeSet<GroupPath> = [parent.clone()].into_iter().collect();
        assert!(!RuleSet::is_visible(&parent, &removed));
        assert!(!RuleSet::is_visible(&child, &removed));
        assert!(RuleSet::is_visible(&child, &BTreeSet::new()));
    }
}
