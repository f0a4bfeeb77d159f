//! Field templates and catalogs
use std::path::Path;

use formdef_core::{Customization, FieldDefinition, FieldOption, FieldType, ValidationRules};
use serde::{Deserialize, Serialize};

use crate::CatalogError;

/// Preset a new field is created from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldTemplate {
    pub key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationRules>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customization: Option<Customization>,
}

impl FieldTemplate {
    pub fn new(key: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            field_type,
            placeholder: None,
            help_text: None,
            required: false,
            options: Vec::new(),
            validation: None,
            customization: None,
        }
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help_text = Some(help.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(FieldOption::plain).collect();
        self
    }

    pub fn validation(mut self, rules: ValidationRules) -> Self {
        self.validation = Some(rules);
        self
    }

    pub fn customization(mut self, customization: Customization) -> Self {
        self.customization = Some(customization);
        self
    }

    /// A fresh field (new id, order 0) carrying the template's presets
    pub fn instantiate(&self) -> FieldDefinition {
        let mut field = FieldDefinition::new(self.field_type, self.label.clone());
        field.placeholder = self.placeholder.clone();
        field.help_text = self.help_text.clone();
        field.required = self.required;
        field.options = self.options.clone();
        field.validation = self.validation.clone();
        field.customization = self.customization.clone();
        field.enforce_invariants();
        field
    }
}

/// Ordered, key-addressable list of templates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub name: String,
    #[serde(default)]
    pub templates: Vec<FieldTemplate>,
}

impl Catalog {
    pub fn new(name: impl Into<String>, templates: Vec<FieldTemplate>) -> Self {
        Self {
            name: name.into(),
            templates,
        }
    }

    pub fn get(&self, key: &str) -> Option<&FieldTemplate> {
        self.templates.iter().find(|t| t.key == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.templates.iter().map(|t| t.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Parse a catalog; keys must be unique
    pub fn from_yaml(yaml: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_yaml::from_str(yaml)?;
        catalog.check_unique()?;
        Ok(catalog)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Add or replace templates by key; new keys are appended
    pub fn extend(mut self, other: Catalog) -> Self {
        for template in other.templates {
            match self.templates.iter_mut().find(|t| t.key == template.key) {
                Some(existing) => {
                    tracing::debug!(key = %template.key, catalog = %self.name, "template overridden");
                    *existing = template;
                }
                None => self.templates.push(template),
            }
        }
        self
    }

    fn check_unique(&self) -> Result<(), CatalogError> {
        for (idx, template) in self.templates.iter().enumerate() {
            if self.templates[..idx].iter().any(|t| t.key == template.key) {
                return Err(CatalogError::DuplicateKey(template.key.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formdef_core::{NamedPattern, Pattern};

    const YAML: &str = r#"
name: custom
templates:
  - key: plate
    label: License plate
    type: text
    placeholder: ABC-1234
    customization:
      transformation:
        type: uppercase
        applyOnInput: true
  - key: color
    label: Paint
    type: select
    options:
      - { value: red, label: Red }
      - { value: blue, label: Blue }
"#;

    #[test]
    fn test_yaml_catalog() {
        let catalog = Catalog::from_yaml(YAML).unwrap();
        assert_eq!(catalog.keys().collect::<Vec<_>>(), vec!["plate", "color"]);
        let color = catalog.get("color").unwrap();
        assert_eq!(color.field_type, FieldType::Select);
        assert_eq!(color.options[1].label, "Blue");
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let yaml = "name: dup\ntemplates:\n  - {key: a, label: A, type: text}\n  - {key: a, label: B, type: email}\n";
        assert!(matches!(Catalog::from_yaml(yaml), Err(CatalogError::DuplicateKey(k)) if k == "a"));
    }

    #[test]
    fn test_instantiate_gets_fresh_id_and_invariants() {
        let template = FieldTemplate::new("work-email", "Work email", FieldType::Email).required();
        let a = template.instantiate();
        let b = template.instantiate();
        assert_ne!(a.id, b.id);
        assert!(a.required);
        assert_eq!(
            a.validation.unwrap().pattern,
            Some(Pattern::Named(NamedPattern::Email))
        );
    }

    #[test]
    fn test_extend_overrides_by_key() {
        let base = Catalog::new("base", vec![FieldTemplate::new("a", "A", FieldType::Text)]);
        let merged = base.extend(Catalog::new(
            "extra",
            vec![
                FieldTemplate::new("a", "A2", FieldType::Textarea),
                FieldTemplate::new("b", "B", FieldType::Date),
            ],
        ));
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.get("a").unwrap().label, "A2");
    }
}
