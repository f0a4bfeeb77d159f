//! Persisted form definition shape (camelCase JSON)
use formdef_core::{Customization, FieldOption, FormSettings, ValidationRules};
use serde::{Deserialize, Serialize};

/// Request/response body of the create and fetch form endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedForm {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub form_title: String,

    #[serde(default)]
    pub form_description: String,

    /// Sales stage the form belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage_id: Option<String>,

    /// Asset category the form belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,

    #[serde(default)]
    pub created_by: String,

    #[serde(default)]
    pub fields: Vec<WireField>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<FormSettings>,
}

/// One field as the backend stores it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireField {
    /// Raw type tag; checked against the known set on decode
    pub field_type: String,

    #[serde(default)]
    pub label: String,

    #[serde(default)]
    pub placeholder: String,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub help_text: String,

    #[serde(default)]
    pub options: Vec<WireOption>,

    #[serde(default)]
    pub validation: ValidationRules,

    #[serde(default)]
    pub properties: FieldProperties,
}

/// Options arrive either as bare strings or as `{value, label}` pairs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireOption {
    Plain(String),
    Pair(FieldOption),
}

impl From<WireOption> for FieldOption {
    fn from(option: WireOption) -> Self {
        match option {
            WireOption::Plain(text) => FieldOption::plain(text),
            WireOption::Pair(pair) => pair,
        }
    }
}

/// Free-form `properties` object: identity, position and customization
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,

    #[serde(flatten)]
    pub customization: Customization,

    /// Some writers nest the customization object instead of flattening it.
    /// Read on decode, never written.
    #[serde(default, rename = "customization", skip_serializing)]
    pub nested_customization: Option<Customization>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_option_shapes() {
        let options: Vec<WireOption> =
            serde_json::from_str(r#"["Red", {"value": "b", "label": "Blue"}]"#).unwrap();
        let options: Vec<FieldOption> = options.into_iter().map(Into::into).collect();
        assert_eq!(options[0], FieldOption::plain("Red"));
        assert_eq!(options[1], FieldOption::new("b", "Blue"));
    }

    #[test]
    fn test_properties_flatten_customization() {
        let props: FieldProperties = serde_json::from_str(
            r#"{"id":"f1","order":3,"inputMask":{"mask":"phone"},"transformation":{"type":"titleCase","applyOnInput":true}}"#,
        )
        .unwrap();
        assert_eq!(props.id.as_deref(), Some("f1"));
        assert_eq!(props.order, Some(3));
        assert!(props.customization.input_mask.is_some());
        assert!(props.customization.transformation.unwrap().apply_on_input);
    }

    #[test]
    fn test_nested_customization_is_captured() {
        let props: FieldProperties =
            serde_json::from_str(r#"{"id":"f1","customization":{"inputMask":{"mask":"phone"}}}"#).unwrap();
        assert!(props.customization.is_empty());
        assert!(props.nested_customization.unwrap().input_mask.is_some());
    }

    #[test]
    fn test_minimal_field() {
        let field: WireField = serde_json::from_str(r#"{"fieldType":"text","label":"Name"}"#).unwrap();
        assert_eq!(field.field_type, "text");
        assert!(!field.required);
        assert!(field.options.is_empty());
    }
}
