//! Inputs to builder operations
use formdef_catalog::FieldTemplate;
use formdef_core::{Customization, FieldDefinition, FieldOption, FieldType, ValidationRules};
use serde::{Deserialize, Serialize};

/// What a new field starts from
#[derive(Debug, Clone, Copy)]
pub enum FieldSeed<'a> {
    Template(&'a FieldTemplate),
    Type(FieldType),
}

impl<'a> From<&'a FieldTemplate> for FieldSeed<'a> {
    fn from(template: &'a FieldTemplate) -> Self {
        FieldSeed::Template(template)
    }
}

impl From<FieldType> for FieldSeed<'_> {
    fn from(field_type: FieldType) -> Self {
        FieldSeed::Type(field_type)
    }
}

impl FieldSeed<'_> {
    /// Fresh field with a new id; bare types get `"<Type Name> Field"`
    pub fn instantiate(&self) -> FieldDefinition {
        match self {
            FieldSeed::Template(template) => template.instantiate(),
            FieldSeed::Type(field_type) => {
                FieldDefinition::new(*field_type, format!("{} Field", field_type.display_name()))
            }
        }
    }
}

/// Direction for [`FormBuilder::move_field`](crate::FormBuilder::move_field)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

/// Partial update of a field. `None` leaves the attribute alone; for
/// optional attributes `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldPatch {
    pub label: Option<String>,
    pub field_type: Option<FieldType>,
    pub placeholder: Option<Option<String>>,
    pub help_text: Option<Option<String>>,
    pub required: Option<bool>,
    pub options: Option<Vec<FieldOption>>,
    pub validation: Option<Option<ValidationRules>>,
    pub customization: Option<Option<Customization>>,
}

impl FieldPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn field_type(mut self, field_type: FieldType) -> Self {
        self.field_type = Some(field_type);
        self
    }

    pub fn placeholder(mut self, placeholder: Option<String>) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    pub fn help_text(mut self, help: Option<String>) -> Self {
        self.help_text = Some(help);
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn options(mut self, options: Vec<FieldOption>) -> Self {
        self.options = Some(options);
        self
    }

    pub fn validation(mut self, rules: Option<ValidationRules>) -> Self {
        self.validation = Some(rules);
        self
    }

    pub fn customization(mut self, customization: Option<Customization>) -> Self {
        self.customization = Some(customization);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge into a field. Id and order are never patched.
    pub fn apply_to(self, field: &mut FieldDefinition) {
        if let Some(field_type) = self.field_type {
            field.change_type(field_type);
        }
        if let Some(label) = self.label {
            field.label = label;
        }
        if let Some(placeholder) = self.placeholder {
            field.placeholder = placeholder;
        }
        if let Some(help) = self.help_text {
            field.help_text = help;
        }
        if let Some(required) = self.required {
            field.required = required;
        }
        if let Some(options) = self.options {
            field.options = options;
        }
        if let Some(validation) = self.validation {
            field.validation = validation;
        }
        if let Some(customization) = self.customization {
            field.customization = customization;
        }
        field.enforce_invariants();
    }
}
