//! Validation engine
//!
//! Runs the rule chain over every input field of a form. Errors are values:
//! nothing here returns `Err`.

use formdef_core::{FieldDefinition, FieldValue, FormDefinition, SubmissionValueMap, ValidationErrorMap};
use serde::{Deserialize, Serialize};

use crate::rule::RuleKind;

/// A failed rule on one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field_id: String,
    pub rule: RuleKind,
    pub message: String,
}

/// Ordered rule chain
#[derive(Debug, Clone)]
pub struct Validator {
    rules: Vec<RuleKind>,
}

impl Validator {
    /// Validator with the default rule order
    pub fn new() -> Self {
        Self {
            rules: RuleKind::ORDER.to_vec(),
        }
    }

    /// Validator restricted to a subset of rules (order is kept as given)
    pub fn with_rules(rules: Vec<RuleKind>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[RuleKind] {
        &self.rules
    }

    /// First failing rule for one field, if any
    pub fn validate_field(
        &self,
        field: &FieldDefinition,
        value: Option<&FieldValue>,
    ) -> Option<FieldViolation> {
        if field.field_type.is_inert() {
            return None;
        }

        self.rules.iter().find_map(|rule| {
            rule.check(field, value).map(|message| FieldViolation {
                field_id: field.id.clone(),
                rule: *rule,
                message,
            })
        })
    }

    /// Every violation, in field order
    pub fn violations(&self, form: &FormDefinition, values: &SubmissionValueMap) -> Vec<FieldViolation> {
        form.ordered_fields()
            .into_iter()
            .filter_map(|field| self.validate_field(field, values.get(&field.id)))
            .collect()
    }

    /// Full sweep, recomputed from scratch
    pub fn validate(&self, form: &FormDefinition, values: &SubmissionValueMap) -> ValidationErrorMap {
        let errors: ValidationErrorMap = self
            .violations(form, values)
            .into_iter()
            .map(|v| (v.field_id, v.message))
            .collect();

        tracing::debug!(form = %form.id, errors = errors.len(), "validation sweep");
        errors
    }

    /// Re-check one edited field and update the map in place.
    ///
    /// Used while filling: only touched fields are re-checked so untouched
    /// fields are not flagged before the first submit.
    pub fn revalidate_field(
        &self,
        field: &FieldDefinition,
        values: &SubmissionValueMap,
        errors: &mut ValidationErrorMap,
    ) {
        match self.validate_field(field, values.get(&field.id)) {
            Some(violation) => {
                errors.insert(violation.field_id, violation.message);
            }
            None => {
                errors.remove(&field.id);
            }
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}
