//! Form definitions: ordered fields plus settings and a persistence target.

use serde::{Deserialize, Serialize};

use crate::field::FieldDefinition;

/// What a form is attached to on the backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum FormTarget {
    /// Standalone form
    #[default]
    None,
    /// Sales pipeline stage form
    Stage(String),
    /// Asset category custom form
    Category(String),
}

/// Viewer behaviour settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormSettings {
    pub allow_save_progress: bool,
    pub show_progress_bar: bool,
    pub submit_button_text: String,
    pub success_message: String,
    pub error_message: String,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            allow_save_progress: false,
            show_progress_bar: true,
            submit_button_text: "Submit".to_string(),
            success_message: "Form submitted successfully!".to_string(),
            error_message: "There was an error submitting the form. Please try again.".to_string(),
        }
    }
}

/// A complete form document, persisted as a unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDefinition {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub target: FormTarget,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
    #[serde(default)]
    pub settings: FormSettings,
}

impl FormDefinition {
    /// Create an empty form with a fresh id
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            description: String::new(),
            target: FormTarget::None,
            fields: Vec::new(),
            settings: FormSettings::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_target(mut self, target: FormTarget) -> Self {
        self.target = target;
        self
    }

    pub fn field(&self, field_id: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.id == field_id)
    }

    pub fn field_mut(&mut self, field_id: &str) -> Option<&mut FieldDefinition> {
        self.fields.iter_mut().find(|f| f.id == field_id)
    }

    pub fn position(&self, field_id: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.id == field_id)
    }

    /// Stable sort by `order`; ties keep insertion order
    pub fn sort_fields(&mut self) {
        self.fields.sort_by_key(|f| f.order);
    }

    /// Rewrite `order` to the contiguous sequence 1..N in current position order
    pub fn renumber(&mut self) {
        for (idx, field) in self.fields.iter_mut().enumerate() {
            field.order = idx as u32 + 1;
        }
    }

    /// Fields in declared order without mutating the document
    pub fn ordered_fields(&self) -> Vec<&FieldDefinition> {
        let mut fields: Vec<&FieldDefinition> = self.fields.iter().collect();
        fields.sort_by_key(|f| f.order);
        fields
    }

    /// Required fields that actually collect a value
    pub fn required_fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields
            .iter()
            .filter(|f| f.required && !f.field_type.is_inert())
    }

    /// Content hash of the parts of the document a value map depends on
    /// (field ids, types, options and order). Saved progress is tied to it.
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.id.as_bytes());
        for field in self.ordered_fields() {
            hasher.update(b"\x1f");
            hasher.update(field.id.as_bytes());
            hasher.update(b"\x1e");
            hasher.update(field.field_type.as_str().as_bytes());
            for option in &field.options {
                hasher.update(b"\x1d");
                hasher.update(option.value.as_bytes());
            }
        }
        format!("blake3:{}", hasher.finalize())
    }
}
