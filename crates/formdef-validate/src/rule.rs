//! Individual field rules
//!
//! Each rule looks at one field and its submitted value and either passes
//! or yields the message shown next to the field.

use formdef_core::{FieldDefinition, FieldType, FieldValue, NamedPattern, Pattern};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const EMAIL_MESSAGE: &str = "Please enter a valid email address";
pub const PHONE_MESSAGE: &str = "Please enter a valid phone number";
pub const URL_MESSAGE: &str = "Please enter a valid URL";

lazy_static! {
    /// `local@domain.tld`: one `@`, a dot after it, no whitespace
    static ref EMAIL: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();

    /// Digits, whitespace, `+`, parentheses and dashes only
    static ref PHONE: Regex = Regex::new(r"^[+0-9\s()\-]+$").unwrap();

    /// Optional http(s) scheme, dotted host, optional port and path
    static ref URL: Regex =
        Regex::new(r"^(?i)(https?://)?([a-z0-9]([a-z0-9-]*[a-z0-9])?\.)+[a-z]{2,}(:[0-9]{1,5})?(/\S*)?$").unwrap();

    /// First signed decimal in a value (affixes and grouping commas around it)
    static ref NUMBER: Regex = Regex::new(r"-?[0-9]+(\.[0-9]+)?").unwrap();
}

/// Rules in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Required,
    EmailShape,
    PhoneChars,
    MaxLength,
    MinLength,
    NumericRange,
    Pattern,
}

impl RuleKind {
    /// Default evaluation order; the first failing rule wins
    pub const ORDER: [RuleKind; 7] = [
        RuleKind::Required,
        RuleKind::EmailShape,
        RuleKind::PhoneChars,
        RuleKind::MaxLength,
        RuleKind::MinLength,
        RuleKind::NumericRange,
        RuleKind::Pattern,
    ];

    /// Evaluate the rule. `None` means the field passes.
    pub fn check(&self, field: &FieldDefinition, value: Option<&FieldValue>) -> Option<String> {
        let present = value.filter(|v| !v.is_empty());

        match self {
            RuleKind::Required => {
                (field.required && present.is_none()).then(|| format!("{} is required", field.label))
            }
            RuleKind::EmailShape => {
                let text = present?.as_text()?.trim();
                (field.field_type == FieldType::Email && !is_email(text))
                    .then(|| EMAIL_MESSAGE.to_string())
            }
            RuleKind::PhoneChars => {
                let text = present?.as_text()?;
                (field.field_type == FieldType::Tel && !PHONE.is_match(text))
                    .then(|| PHONE_MESSAGE.to_string())
            }
            RuleKind::MaxLength => {
                let max = field.validation.as_ref()?.max_length?;
                let len = present?.as_text()?.chars().count();
                (len > max).then(|| {
                    custom_or(field, || format!("{} must be at most {} characters", field.label, max))
                })
            }
            RuleKind::MinLength => {
                let min = field.validation.as_ref()?.min_length?;
                let len = present?.as_text()?.chars().count();
                (len < min).then(|| {
                    custom_or(field, || format!("{} must be at least {} characters", field.label, min))
                })
            }
            RuleKind::NumericRange => check_range(field, present?.as_text()?),
            RuleKind::Pattern => check_pattern(field, present?.as_text()?.trim()),
        }
    }
}

/// ASCII `local@domain.tld`
pub fn is_email(text: &str) -> bool {
    text.is_ascii() && EMAIL.is_match(text)
}

pub fn is_url(text: &str) -> bool {
    URL.is_match(text)
}

/// First decimal number in the text, ignoring grouping commas
pub fn parse_numeric(text: &str) -> Option<f64> {
    let cleaned = text.replace(',', "");
    NUMBER.find(&cleaned)?.as_str().parse().ok()
}

fn custom_or(field: &FieldDefinition, default: impl FnOnce() -> String) -> String {
    field
        .validation
        .as_ref()
        .and_then(|r| r.message.clone())
        .unwrap_or_else(default)
}

fn check_range(field: &FieldDefinition, text: &str) -> Option<String> {
    let rules = field.validation.as_ref()?;
    if !field.field_type.is_numeric() || (rules.min.is_none() && rules.max.is_none()) {
        return None;
    }

    let Some(number) = parse_numeric(text) else {
        return Some(custom_or(field, || format!("{} must be a number", field.label)));
    };

    if let Some(min) = rules.min {
        if number < min {
            return Some(custom_or(field, || format!("{} must be at least {}", field.label, min)));
        }
    }
    if let Some(max) = rules.max {
        if number > max {
            return Some(custom_or(field, || format!("{} must be at most {}", field.label, max)));
        }
    }
    None
}

fn check_pattern(field: &FieldDefinition, text: &str) -> Option<String> {
    match field.validation.as_ref()?.pattern.as_ref()? {
        // email fields were already checked by shape
        Pattern::Named(NamedPattern::Email) => (field.field_type != FieldType::Email
            && !is_email(text))
        .then(|| custom_or(field, || EMAIL_MESSAGE.to_string())),
        Pattern::Named(NamedPattern::Url) => {
            (!is_url(text)).then(|| custom_or(field, || URL_MESSAGE.to_string()))
        }
        Pattern::Regex(expr) => match Regex::new(expr) {
            Ok(re) => (!re.is_match(text))
                .then(|| custom_or(field, || format!("{} has an invalid format", field.label))),
            Err(e) => {
                tracing::warn!(field = %field.id, pattern = %expr, error = %e, "skipping invalid pattern");
                None
            }
        },
    }
}
