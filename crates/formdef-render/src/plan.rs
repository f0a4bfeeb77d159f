//! Render plans: what a viewer draws, in order, for a form and its state
use std::collections::BTreeMap;

use formdef_core::{
    EmptyProgressPolicy, FieldDefinition, FieldOption, FieldValue, FormDefinition, FormError,
    SubmissionValueMap, UnknownFieldPolicy, ValidationErrorMap,
};
use formdef_transform::AffixSelection;
use formdef_validate::completion_percentage;
use formdef_wire::UnsupportedField;
use serde::{Deserialize, Serialize};

use crate::widget::{resolve_tag, resolve_widget, WidgetKind};

/// One slot of the plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetSpec {
    pub field_id: String,
    pub label: String,
    pub widget: WidgetKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    pub required: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub prefix_choices: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suffix_choices: Vec<String>,
    pub interactive: bool,
    pub order: u32,
}

impl WidgetSpec {
    fn from_field(
        field: &FieldDefinition,
        values: &SubmissionValueMap,
        errors: &ValidationErrorMap,
        selection: Option<&AffixSelection>,
    ) -> Self {
        let widget = resolve_widget(field);
        let helper = field.input_helper();
        let selected_prefix = selection.and_then(|s| s.prefix.as_deref());
        let selected_suffix = selection.and_then(|s| s.suffix.as_deref());

        Self {
            field_id: field.id.clone(),
            label: field.label.clone(),
            widget,
            placeholder: field.placeholder.clone(),
            help_text: field.help_text.clone(),
            required: field.required,
            options: field.options.clone(),
            value: values.get(&field.id).cloned(),
            error: errors.get(&field.id).cloned(),
            prefix: helper.and_then(|h| h.resolve_prefix(selected_prefix)),
            suffix: helper.and_then(|h| h.resolve_suffix(selected_suffix)),
            prefix_choices: helper
                .filter(|h| h.show_prefix_dropdown)
                .map(|h| h.prefix_options.clone())
                .unwrap_or_default(),
            suffix_choices: helper
                .filter(|h| h.show_suffix_dropdown)
                .map(|h| h.suffix_options.clone())
                .unwrap_or_default(),
            interactive: widget.is_interactive(),
            order: field.order,
        }
    }

    fn placeholder_for(unsupported: &UnsupportedField, widget: WidgetKind) -> Self {
        Self {
            field_id: format!("unsupported-{}", unsupported.order),
            label: unsupported.label.clone(),
            widget,
            placeholder: None,
            help_text: Some(format!("Field type '{}' is not supported", unsupported.tag)),
            required: false,
            options: Vec::new(),
            value: None,
            error: None,
            prefix: None,
            suffix: None,
            prefix_choices: Vec::new(),
            suffix_choices: Vec::new(),
            interactive: false,
            order: unsupported.order,
        }
    }
}

/// Everything a viewer needs to draw a form in its current state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderPlan {
    pub form_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub submit_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    pub widgets: Vec<WidgetSpec>,
}

impl RenderPlan {
    /// Plan with default affix selections and the zero-required progress policy
    pub fn build(form: &FormDefinition, values: &SubmissionValueMap, errors: &ValidationErrorMap) -> Self {
        Self::build_with(form, values, errors, &BTreeMap::new(), EmptyProgressPolicy::Zero)
    }

    /// Plan honouring per-field dropdown selections
    pub fn build_with(
        form: &FormDefinition,
        values: &SubmissionValueMap,
        errors: &ValidationErrorMap,
        selections: &BTreeMap<String, AffixSelection>,
        progress_policy: EmptyProgressPolicy,
    ) -> Self {
        let widgets = form
            .ordered_fields()
            .into_iter()
            .map(|field| WidgetSpec::from_field(field, values, errors, selections.get(&field.id)))
            .collect();

        let progress = form
            .settings
            .show_progress_bar
            .then(|| completion_percentage(form, values, progress_policy));

        Self {
            form_id: form.id.clone(),
            title: form.title.clone(),
            description: form.description.clone(),
            submit_label: form.settings.submit_button_text.clone(),
            progress,
            widgets,
        }
    }

    /// Merge placeholders for fields whose type tag was not recognised on decode
    pub fn with_unsupported(
        mut self,
        unsupported: &[UnsupportedField],
        policy: UnknownFieldPolicy,
    ) -> Result<Self, FormError> {
        for field in unsupported {
            let widget = resolve_tag(&field.tag, policy)?;
            self.widgets.push(WidgetSpec::placeholder_for(field, widget));
        }
        self.widgets.sort_by_key(|w| w.order);
        Ok(self)
    }

    pub fn interactive_count(&self) -> usize {
        self.widgets.iter().filter(|w| w.interactive).count()
    }
}
