//! Field type → widget contract dispatch
use formdef_core::{FieldDefinition, FieldType, FormError, UnknownFieldPolicy};
use serde::{Deserialize, Serialize};

/// Flavour of a single-line text input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextInputKind {
    Plain,
    Email,
    Tel,
    Url,
    Password,
    Number,
    Currency,
}

/// Granularity of a date picker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateKind {
    Date,
    DateTime,
    Month,
    Week,
}

/// Non-interactive slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InertKind {
    Hidden,
    Section,
    Divider,
    Spacer,
    /// Stand-in for a type tag this build does not know
    Unsupported,
}

/// Widget contract a viewer must honour for a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "widget", content = "variant", rename_all = "snake_case")]
pub enum WidgetKind {
    TextInput(TextInputKind),
    MultiLineText,
    DatePicker(DateKind),
    SingleChoiceList,
    MultiChoiceList,
    RadioGroup,
    /// Single toggle or, with options, a group of boxes
    Checkbox,
    FilePicker,
    RangeSlider,
    ColorPicker,
    Rating,
    SignaturePad,
    Inert(InertKind),
}

impl WidgetKind {
    /// Contract for a known type tag
    pub fn for_type(field_type: FieldType) -> Self {
        match field_type {
            FieldType::Text => WidgetKind::TextInput(TextInputKind::Plain),
            FieldType::Email => WidgetKind::TextInput(TextInputKind::Email),
            FieldType::Tel => WidgetKind::TextInput(TextInputKind::Tel),
            FieldType::Url => WidgetKind::TextInput(TextInputKind::Url),
            FieldType::Password => WidgetKind::TextInput(TextInputKind::Password),
            FieldType::Number => WidgetKind::TextInput(TextInputKind::Number),
            FieldType::Currency => WidgetKind::TextInput(TextInputKind::Currency),
            FieldType::Textarea => WidgetKind::MultiLineText,
            FieldType::Date => WidgetKind::DatePicker(DateKind::Date),
            FieldType::Datetime => WidgetKind::DatePicker(DateKind::DateTime),
            FieldType::Month => WidgetKind::DatePicker(DateKind::Month),
            FieldType::Week => WidgetKind::DatePicker(DateKind::Week),
            FieldType::Select => WidgetKind::SingleChoiceList,
            FieldType::MultiSelect => WidgetKind::MultiChoiceList,
            FieldType::Radio => WidgetKind::RadioGroup,
            FieldType::Checkbox => WidgetKind::Checkbox,
            FieldType::File => WidgetKind::FilePicker,
            FieldType::Range => WidgetKind::RangeSlider,
            FieldType::Color => WidgetKind::ColorPicker,
            FieldType::Rating => WidgetKind::Rating,
            FieldType::Signature => WidgetKind::SignaturePad,
            FieldType::Hidden => WidgetKind::Inert(InertKind::Hidden),
            FieldType::Section => WidgetKind::Inert(InertKind::Section),
            FieldType::Divider => WidgetKind::Inert(InertKind::Divider),
            FieldType::Spacer => WidgetKind::Inert(InertKind::Spacer),
        }
    }

    pub fn is_interactive(&self) -> bool {
        !matches!(self, WidgetKind::Inert(_))
    }

    /// Short name used in outlines and logs
    pub fn name(&self) -> &'static str {
        match self {
            WidgetKind::TextInput(_) => "text input",
            WidgetKind::MultiLineText => "multi-line text",
            WidgetKind::DatePicker(_) => "date picker",
            WidgetKind::SingleChoiceList => "single-choice list",
            WidgetKind::MultiChoiceList => "multi-choice list",
            WidgetKind::RadioGroup => "radio group",
            WidgetKind::Checkbox => "checkbox",
            WidgetKind::FilePicker => "file picker",
            WidgetKind::RangeSlider => "range slider",
            WidgetKind::ColorPicker => "colour picker",
            WidgetKind::Rating => "rating",
            WidgetKind::SignaturePad => "signature pad",
            WidgetKind::Inert(InertKind::Unsupported) => "unsupported",
            WidgetKind::Inert(_) => "inert",
        }
    }
}

/// Widget for a field definition. Total over [`FieldType`].
pub fn resolve_widget(field: &FieldDefinition) -> WidgetKind {
    WidgetKind::for_type(field.field_type)
}

/// Widget for a raw type tag from outside the process
pub fn resolve_tag(tag: &str, policy: UnknownFieldPolicy) -> Result<WidgetKind, FormError> {
    match tag.parse::<FieldType>() {
        Ok(field_type) => Ok(WidgetKind::for_type(field_type)),
        Err(err) => match policy {
            UnknownFieldPolicy::Fail => Err(err),
            UnknownFieldPolicy::Placeholder => {
                tracing::warn!(tag = %tag, "unsupported field type rendered as placeholder");
                Ok(WidgetKind::Inert(InertKind::Unsupported))
            }
        },
    }
}
