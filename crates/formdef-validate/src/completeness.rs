//! Form completeness: whether an authored form may be published
use formdef_core::FormDefinition;
use serde::{Deserialize, Serialize};

/// Outcome of a completeness check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completeness {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Completeness {
    pub fn complete() -> Self {
        Self { ok: true, reason: None }
    }

    pub fn incomplete(reason: impl Into<String>) -> Self {
        Self {
            ok: false,
            reason: Some(reason.into()),
        }
    }
}

/// Fails on the first of: no fields, blank title, a blank field label,
/// a choice field without options.
pub fn check_complete(form: &FormDefinition) -> Completeness {
    if form.fields.is_empty() {
        return Completeness::incomplete("fields is empty");
    }
    if form.title.trim().is_empty() {
        return Completeness::incomplete("title is empty");
    }

    for (idx, field) in form.ordered_fields().into_iter().enumerate() {
        if field.label.trim().is_empty() {
            return Completeness::incomplete(format!("field {} has an empty label", idx + 1));
        }
        if field.is_missing_options() {
            return Completeness::incomplete(format!("field '{}' has no options", field.label));
        }
    }

    Completeness::complete()
}

#[cfg(test)]
mod tests {
    use super::*;
    use formdef_core::{FieldDefinition, FieldOption, FieldType};
    use proptest::prelude::*;

    #[test]
    fn test_zero_fields() {
        let form = FormDefinition::new("Survey");
        assert_eq!(check_complete(&form), Completeness::incomplete("fields is empty"));
    }

    #[test]
    fn test_blank_title() {
        let mut form = FormDefinition::new("  ");
        form.fields.push(FieldDefinition::new(FieldType::Text, "Name"));
        assert_eq!(check_complete(&form).reason.as_deref(), Some("title is empty"));
    }

    #[test]
    fn test_blank_label_reports_position() {
        let mut form = FormDefinition::new("Survey");
        form.fields.push(FieldDefinition::new(FieldType::Text, "Name").with_order(1));
        form.fields.push(FieldDefinition::new(FieldType::Text, "").with_order(2));
        assert_eq!(check_complete(&form).reason.as_deref(), Some("field 2 has an empty label"));
    }

    #[test]
    fn test_complete_form() {
        let mut form = FormDefinition::new("Survey");
        form.fields.push(
            FieldDefinition::new(FieldType::Radio, "Size").with_options(vec![FieldOption::plain("S")]),
        );
        form.fields.push(FieldDefinition::new(FieldType::Checkbox, "Subscribe"));
        assert!(check_complete(&form).ok);
    }

    fn choice_type() -> impl Strategy<Value = FieldType> {
        prop_oneof![
            Just(FieldType::Select),
            Just(FieldType::MultiSelect),
            Just(FieldType::Radio)
        ]
    }

    proptest! {
        #[test]
        fn prop_choice_without_options_is_incomplete(
            field_type in choice_type(),
            label in "[A-Za-z][A-Za-z ]{0,15}",
            others in 0usize..4,
        ) {
            let mut form = FormDefinition::new("Survey");
            for i in 0..others {
                form.fields.push(FieldDefinition::new(FieldType::Text, format!("f{}", i)).with_order(i as u32 + 1));
            }
            form.fields.push(FieldDefinition::new(field_type, label).with_order(others as u32 + 1));
            prop_assert!(!check_complete(&form).ok);
        }
    }
}
