//! Field definitions
//!
//! A field is one input of a form: its type tag, display text, options,
//! validation rules and the cosmetic hints (case transform, input mask,
//! prefix/suffix helper) applied to keystrokes before they are stored.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FormError;

/// Input type tag. Determines the widget contract, the validation rules
/// that apply and whether the transformation pipeline runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Email,
    Tel,
    Number,
    Url,
    Date,
    Textarea,
    Select,
    MultiSelect,
    Checkbox,
    Radio,
    File,
    Currency,
    Password,
    Datetime,
    Month,
    Week,
    Color,
    Range,
    Rating,
    Signature,
    Hidden,
    Section,
    Divider,
    Spacer,
}

impl FieldType {
    /// Every field type, in catalog order
    pub const ALL: [FieldType; 25] = [
        FieldType::Text,
        FieldType::Email,
        FieldType::Tel,
        FieldType::Number,
        FieldType::Url,
        FieldType::Date,
        FieldType::Textarea,
        FieldType::Select,
        FieldType::MultiSelect,
        FieldType::Checkbox,
        FieldType::Radio,
        FieldType::File,
        FieldType::Currency,
        FieldType::Password,
        FieldType::Datetime,
        FieldType::Month,
        FieldType::Week,
        FieldType::Color,
        FieldType::Range,
        FieldType::Rating,
        FieldType::Signature,
        FieldType::Hidden,
        FieldType::Section,
        FieldType::Divider,
        FieldType::Spacer,
    ];

    /// Wire tag (`"multi_select"`, `"datetime"`, ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Email => "email",
            FieldType::Tel => "tel",
            FieldType::Number => "number",
            FieldType::Url => "url",
            FieldType::Date => "date",
            FieldType::Textarea => "textarea",
            FieldType::Select => "select",
            FieldType::MultiSelect => "multi_select",
            FieldType::Checkbox => "checkbox",
            FieldType::Radio => "radio",
            FieldType::File => "file",
            FieldType::Currency => "currency",
            FieldType::Password => "password",
            FieldType::Datetime => "datetime",
            FieldType::Month => "month",
            FieldType::Week => "week",
            FieldType::Color => "color",
            FieldType::Range => "range",
            FieldType::Rating => "rating",
            FieldType::Signature => "signature",
            FieldType::Hidden => "hidden",
            FieldType::Section => "section",
            FieldType::Divider => "divider",
            FieldType::Spacer => "spacer",
        }
    }

    /// Human name used for default labels
    pub fn display_name(&self) -> &'static str {
        match self {
            FieldType::Text => "Text",
            FieldType::Email => "Email",
            FieldType::Tel => "Phone",
            FieldType::Number => "Number",
            FieldType::Url => "URL",
            FieldType::Date => "Date",
            FieldType::Textarea => "Text Area",
            FieldType::Select => "Dropdown",
            FieldType::MultiSelect => "Multi Select",
            FieldType::Checkbox => "Checkbox",
            FieldType::Radio => "Radio",
            FieldType::File => "File Upload",
            FieldType::Currency => "Currency",
            FieldType::Password => "Password",
            FieldType::Datetime => "Date & Time",
            FieldType::Month => "Month",
            FieldType::Week => "Week",
            FieldType::Color => "Color",
            FieldType::Range => "Range",
            FieldType::Rating => "Rating",
            FieldType::Signature => "Signature",
            FieldType::Hidden => "Hidden",
            FieldType::Section => "Section",
            FieldType::Divider => "Divider",
            FieldType::Spacer => "Spacer",
        }
    }

    /// Choice types must carry at least one option
    pub fn is_choice(&self) -> bool {
        matches!(self, FieldType::Select | FieldType::MultiSelect | FieldType::Radio)
    }

    /// Choice types plus checkbox, which becomes a group when given options
    pub fn accepts_options(&self) -> bool {
        self.is_choice() || *self == FieldType::Checkbox
    }

    /// Decorative types that collect no value
    pub fn is_inert(&self) -> bool {
        matches!(self, FieldType::Section | FieldType::Divider | FieldType::Spacer)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            FieldType::Number | FieldType::Currency | FieldType::Range | FieldType::Rating
        )
    }

    /// Types whose keystrokes go through the transformation pipeline
    pub fn is_text_like(&self) -> bool {
        matches!(
            self,
            FieldType::Text
                | FieldType::Email
                | FieldType::Tel
                | FieldType::Number
                | FieldType::Url
                | FieldType::Textarea
                | FieldType::Currency
                | FieldType::Password
        )
    }

    /// Named pattern installed by default on this type, if any
    pub fn default_pattern(&self) -> Option<NamedPattern> {
        match self {
            FieldType::Email => Some(NamedPattern::Email),
            FieldType::Url => Some(NamedPattern::Url),
            _ => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase().replace('-', "_");
        FieldType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == tag)
            .ok_or_else(|| FormError::UnsupportedFieldType(s.to_string()))
    }
}

/// One entry of a choice field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub value: String,
    pub label: String,
}

impl FieldOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    /// Option whose value and label are the same text
    pub fn plain(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            value: text.clone(),
            label: text,
        }
    }
}

/// Built-in validators addressable by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedPattern {
    Email,
    Url,
}

impl NamedPattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            NamedPattern::Email => "email",
            NamedPattern::Url => "url",
        }
    }
}

/// `validation.pattern`: a named validator or a raw regular expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Pattern {
    Named(NamedPattern),
    Regex(String),
}

impl From<String> for Pattern {
    fn from(s: String) -> Self {
        match s.as_str() {
            "email" => Pattern::Named(NamedPattern::Email),
            "url" => Pattern::Named(NamedPattern::Url),
            _ => Pattern::Regex(s),
        }
    }
}

impl From<Pattern> for String {
    fn from(p: Pattern) -> Self {
        match p {
            Pattern::Named(named) => named.as_str().to_string(),
            Pattern::Regex(expr) => expr,
        }
    }
}

/// Author-declared validation rules
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRules {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<Pattern>,

    /// Replaces the text of length, range and pattern errors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Lets an email/url field go without its named pattern
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub relax_pattern: bool,
}

impl ValidationRules {
    pub fn with_pattern(pattern: Pattern) -> Self {
        Self {
            pattern: Some(pattern),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Case transform applied to text input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CaseTransform {
    TitleCase,
    Uppercase,
    Lowercase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transformation {
    #[serde(rename = "type")]
    pub kind: CaseTransform,

    /// Apply on every keystroke; otherwise once when values are committed
    #[serde(default)]
    pub apply_on_input: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaskKind {
    /// `(XXX) XXX-XXXX`
    Phone,
    /// `XXXXX XXXXX`
    Generic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputMask {
    pub mask: MaskKind,
}

/// Prefix/suffix composition hints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputHelper {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,

    #[serde(default)]
    pub show_prefix_dropdown: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prefix_options: Vec<String>,

    #[serde(default)]
    pub show_suffix_dropdown: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suffix_options: Vec<String>,
}

impl InputHelper {
    /// Prefix in effect given the user's dropdown selection.
    ///
    /// A dropdown without a (known) selection falls back to its first option.
    pub fn resolve_prefix(&self, selected: Option<&str>) -> Option<String> {
        resolve_affix(
            self.prefix.as_deref(),
            self.show_prefix_dropdown,
            &self.prefix_options,
            selected,
        )
    }

    pub fn resolve_suffix(&self, selected: Option<&str>) -> Option<String> {
        resolve_affix(
            self.suffix.as_deref(),
            self.show_suffix_dropdown,
            &self.suffix_options,
            selected,
        )
    }
}

fn resolve_affix(
    fixed: Option<&str>,
    dropdown: bool,
    options: &[String],
    selected: Option<&str>,
) -> Option<String> {
    if !options.is_empty() && (dropdown || fixed.is_none()) {
        let chosen = selected
            .and_then(|s| options.iter().find(|o| o.as_str() == s))
            .unwrap_or(&options[0]);
        return Some(chosen.clone());
    }
    fixed.map(str::to_string)
}

/// Presentation and behaviour hints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customization {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transformation: Option<Transformation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_mask: Option<InputMask>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_helper: Option<InputHelper>,
}

impl Customization {
    pub fn is_empty(&self) -> bool {
        self.transformation.is_none() && self.input_mask.is_none() && self.input_helper.is_none()
    }
}

/// One input of a form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    /// Generated at creation, stable for the field's lifetime
    pub id: String,

    #[serde(rename = "type")]
    pub field_type: FieldType,

    pub label: String,

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

    /// 1-based position; the source of truth for render and submission order
    #[serde(default)]
    pub order: u32,
}

impl FieldDefinition {
    /// Create a field with a fresh id
    pub fn new(field_type: FieldType, label: impl Into<String>) -> Self {
        let mut field = Self {
            id: uuid::Uuid::new_v4().to_string(),
            field_type,
            label: label.into(),
            placeholder: None,
            help_text: None,
            required: false,
            options: Vec::new(),
            validation: None,
            customization: None,
            order: 0,
        };
        field.enforce_invariants();
        field
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_help_text(mut self, help: impl Into<String>) -> Self {
        self.help_text = Some(help.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_options(mut self, options: Vec<FieldOption>) -> Self {
        self.options = options;
        self.enforce_invariants();
        self
    }

    pub fn with_validation(mut self, rules: ValidationRules) -> Self {
        self.validation = Some(rules);
        self.enforce_invariants();
        self
    }

    pub fn with_customization(mut self, customization: Customization) -> Self {
        self.customization = Some(customization);
        self
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order = order;
        self
    }

    pub fn is_choice(&self) -> bool {
        self.field_type.is_choice()
    }

    /// Choice field still waiting for its first option
    pub fn is_missing_options(&self) -> bool {
        self.is_choice() && self.options.is_empty()
    }

    /// Checkbox rendered as a group rather than a single toggle
    pub fn is_checkbox_group(&self) -> bool {
        self.field_type == FieldType::Checkbox && !self.options.is_empty()
    }

    pub fn input_helper(&self) -> Option<&InputHelper> {
        self.customization.as_ref().and_then(|c| c.input_helper.as_ref())
    }

    /// Switch to another type. The named pattern the old type installed is
    /// removed with it; other rules stay.
    pub fn change_type(&mut self, field_type: FieldType) {
        if field_type == self.field_type {
            return;
        }
        if let (Some(named), Some(rules)) = (self.field_type.default_pattern(), self.validation.as_mut()) {
            if rules.pattern == Some(Pattern::Named(named)) {
                rules.pattern = None;
            }
        }
        self.field_type = field_type;
        self.enforce_invariants();
    }

    /// Restore the structural invariants after an edit:
    /// - options only on types that take them
    /// - email/url keep their named pattern unless relaxed
    pub fn enforce_invariants(&mut self) {
        if !self.field_type.accepts_options() {
            self.options.clear();
        }

        if let Some(named) = self.field_type.default_pattern() {
            let rules = self.validation.get_or_insert_with(ValidationRules::default);
            if rules.pattern.is_none() && !rules.relax_pattern {
                rules.pattern = Some(Pattern::Named(named));
            }
        }

        if self.validation.as_ref().is_some_and(ValidationRules::is_empty) {
            self.validation = None;
        }
        if self.customization.as_ref().is_some_and(Customization::is_empty) {
            self.customization = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_tags_round_trip() {
        for t in FieldType::ALL {
            assert_eq!(t.as_str().parse::<FieldType>().unwrap(), t);
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.as_str()));
        }
    }

    #[test]
    fn test_field_type_parse_is_lenient_on_case_and_dashes() {
        assert_eq!("Multi-Select".parse::<FieldType>().unwrap(), FieldType::MultiSelect);
        assert_eq!(" EMAIL ".parse::<FieldType>().unwrap(), FieldType::Email);
    }

    #[test]
    fn test_unknown_field_type() {
        let err = "hologram".parse::<FieldType>().unwrap_err();
        assert_eq!(err, FormError::UnsupportedFieldType("hologram".to_string()));
    }

    #[test]
    fn test_email_gets_named_pattern() {
        let field = FieldDefinition::new(FieldType::Email, "Email");
        let rules = field.validation.unwrap();
        assert_eq!(rules.pattern, Some(Pattern::Named(NamedPattern::Email)));
    }

    #[test]
    fn test_relaxed_email_keeps_no_pattern() {
        let field = FieldDefinition::new(FieldType::Email, "Email").with_validation(
            ValidationRules {
                relax_pattern: true,
                ..ValidationRules::default()
            },
        );
        assert_eq!(field.validation.unwrap().pattern, None);
    }

    #[test]
    fn test_change_type_drops_installed_pattern() {
        let mut field = FieldDefinition::new(FieldType::Email, "Contact");
        field.change_type(FieldType::Text);
        assert_eq!(field.validation, None);

        let mut field = FieldDefinition::new(FieldType::Url, "Site").with_validation(ValidationRules {
            max_length: Some(80),
            ..ValidationRules::default()
        });
        field.change_type(FieldType::Email);
        let rules = field.validation.unwrap();
        assert_eq!(rules.pattern, Some(Pattern::Named(NamedPattern::Email)));
        assert_eq!(rules.max_length, Some(80));
    }

    #[test]
    fn test_change_type_keeps_author_regex() {
        let mut field = FieldDefinition::new(FieldType::Text, "Code")
            .with_validation(ValidationRules::with_pattern(Pattern::Regex("^[A-Z]{3}$".into())));
        field.change_type(FieldType::Textarea);
        assert_eq!(
            field.validation.unwrap().pattern,
            Some(Pattern::Regex("^[A-Z]{3}$".into()))
        );
    }

    #[test]
    fn test_options_dropped_on_non_choice_type() {
        let field = FieldDefinition::new(FieldType::Text, "Name")
            .with_options(vec![FieldOption::plain("a")]);
        assert!(field.options.is_empty());

        let group = FieldDefinition::new(FieldType::Checkbox, "Tags")
            .with_options(vec![FieldOption::plain("a")]);
        assert!(group.is_checkbox_group());
    }

    #[test]
    fn test_pattern_serde() {
        let rules: ValidationRules = serde_json::from_str(r#"{"pattern":"url"}"#).unwrap();
        assert_eq!(rules.pattern, Some(Pattern::Named(NamedPattern::Url)));

        let rules: ValidationRules = serde_json::from_str(r#"{"pattern":"^[A-Z]{3}$"}"#).unwrap();
        assert_eq!(rules.pattern, Some(Pattern::Regex("^[A-Z]{3}$".to_string())));
    }

    #[test]
    fn test_prefix_dropdown_defaults_to_first_option() {
        let helper = InputHelper {
            show_prefix_dropdown: true,
            prefix_options: vec!["$".to_string(), "€".to_string()],
            ..InputHelper::default()
        };
        assert_eq!(helper.resolve_prefix(None), Some("$".to_string()));
        assert_eq!(helper.resolve_prefix(Some("€")), Some("€".to_string()));
        assert_eq!(helper.resolve_prefix(Some("£")), Some("$".to_string()));
    }

    #[test]
    fn test_static_suffix() {
        let helper = InputHelper {
            suffix: Some(" kg".to_string()),
            ..InputHelper::default()
        };
        assert_eq!(helper.resolve_suffix(None), Some(" kg".to_string()));
        assert_eq!(helper.resolve_prefix(None), None);
    }
}
