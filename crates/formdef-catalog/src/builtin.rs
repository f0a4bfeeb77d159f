//! Built-in catalogs per surface
use formdef_core::{
    CaseTransform, Customization, FieldType, InputHelper, InputMask, MaskKind, ValidationRules,
    Transformation,
};

use crate::template::{Catalog, FieldTemplate};

fn case(kind: CaseTransform) -> Customization {
    Customization {
        transformation: Some(Transformation {
            kind,
            apply_on_input: true,
        }),
        ..Customization::default()
    }
}

fn mask(mask: MaskKind) -> Customization {
    Customization {
        input_mask: Some(InputMask { mask }),
        ..Customization::default()
    }
}

fn prefix_choices(options: &[&str]) -> Customization {
    Customization {
        input_helper: Some(InputHelper {
            show_prefix_dropdown: true,
            prefix_options: options.iter().map(|o| o.to_string()).collect(),
            ..InputHelper::default()
        }),
        ..Customization::default()
    }
}

fn suffix(text: &str) -> Customization {
    Customization {
        input_helper: Some(InputHelper {
            suffix: Some(text.to_string()),
            ..InputHelper::default()
        }),
        ..Customization::default()
    }
}

fn max_len(n: usize) -> ValidationRules {
    ValidationRules {
        max_length: Some(n),
        ..ValidationRules::default()
    }
}

/// Templates every surface offers
fn common() -> Vec<FieldTemplate> {
    vec![
        FieldTemplate::new("full-name", "Full Name", FieldType::Text)
            .placeholder("Jane Doe")
            .customization(case(CaseTransform::TitleCase)),
        FieldTemplate::new("email", "Email Address", FieldType::Email).placeholder("name@example.com"),
        FieldTemplate::new("phone-us", "Phone Number", FieldType::Tel)
            .placeholder("(555) 555-5555")
            .customization(mask(MaskKind::Phone)),
        FieldTemplate::new("currency-smart", "Amount", FieldType::Currency)
            .placeholder("0.00")
            .customization(prefix_choices(&["$", "€"])),
        FieldTemplate::new("notes", "Notes", FieldType::Textarea).validation(max_len(1000)),
    ]
}

/// General-purpose catalog: the common presets plus one template per type
pub fn standalone() -> Catalog {
    let mut templates = common();
    templates.extend([
        FieldTemplate::new("website", "Website", FieldType::Url).placeholder("https://"),
        FieldTemplate::new("quantity", "Quantity", FieldType::Number).validation(ValidationRules {
            min: Some(0.0),
            ..ValidationRules::default()
        }),
        FieldTemplate::new("choice", "Choose one", FieldType::Select).options(["Option 1", "Option 2"]),
        FieldTemplate::new("multi-choice", "Choose any", FieldType::MultiSelect)
            .options(["Option 1", "Option 2", "Option 3"]),
        FieldTemplate::new("yes-no", "Yes or no", FieldType::Radio).options(["Yes", "No"]),
        FieldTemplate::new("agree", "I agree to the terms", FieldType::Checkbox).required(),
        FieldTemplate::new("date", "Date", FieldType::Date),
        FieldTemplate::new("appointment", "Appointment", FieldType::Datetime),
        FieldTemplate::new("attachment", "Attachment", FieldType::File),
        FieldTemplate::new("satisfaction", "Satisfaction", FieldType::Rating).validation(ValidationRules {
            min: Some(1.0),
            max: Some(5.0),
            ..ValidationRules::default()
        }),
        FieldTemplate::new("signature", "Signature", FieldType::Signature),
        FieldTemplate::new("section", "Section", FieldType::Section),
        FieldTemplate::new("divider", "Divider", FieldType::Divider),
    ]);
    Catalog::new("standalone", templates)
}

/// Lead qualification presets for pipeline stages
pub fn sales() -> Catalog {
    let mut templates = common();
    templates.extend([
        FieldTemplate::new("company", "Company", FieldType::Text).customization(case(CaseTransform::TitleCase)),
        FieldTemplate::new("budget", "Budget", FieldType::Currency)
            .required()
            .customization(prefix_choices(&["$", "€", "£"])),
        FieldTemplate::new("decision-date", "Expected Decision", FieldType::Date),
        FieldTemplate::new("lead-source", "Lead Source", FieldType::Select)
            .options(["Referral", "Website", "Event", "Cold outreach"]),
        FieldTemplate::new("interest", "Products of Interest", FieldType::MultiSelect)
            .options(["Hardware", "Software", "Services"]),
        FieldTemplate::new("priority", "Priority", FieldType::Radio).options(["Low", "Medium", "High"]),
    ]);
    Catalog::new("sales", templates)
}

/// Inventory presets for asset categories
pub fn asset() -> Catalog {
    let mut templates = common();
    templates.extend([
        FieldTemplate::new("serial-number", "Serial Number", FieldType::Text)
            .required()
            .customization(case(CaseTransform::Uppercase)),
        FieldTemplate::new("asset-tag", "Asset Tag", FieldType::Text)
            .help("Digits only, grouped automatically")
            .customization(mask(MaskKind::Generic)),
        FieldTemplate::new("purchase-date", "Purchase Date", FieldType::Date),
        FieldTemplate::new("purchase-price", "Purchase Price", FieldType::Currency)
            .customization(prefix_choices(&["$", "€"])),
        FieldTemplate::new("weight", "Weight", FieldType::Number).customization(suffix(" kg")),
        FieldTemplate::new("condition", "Condition", FieldType::Select)
            .required()
            .options(["New", "Good", "Fair", "Poor"]),
        FieldTemplate::new("photo", "Photo", FieldType::File),
        FieldTemplate::new("warranty-until", "Warranty Until", FieldType::Month),
    ]);
    Catalog::new("asset", templates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalogs_have_unique_keys() {
        for catalog in [standalone(), sales(), asset()] {
            let mut keys: Vec<_> = catalog.keys().collect();
            let total = keys.len();
            keys.sort();
            keys.dedup();
            assert_eq!(keys.len(), total, "duplicate key in {}", catalog.name);
        }
    }

    #[test]
    fn test_choice_templates_carry_options() {
        for catalog in [standalone(), sales(), asset()] {
            for template in &catalog.templates {
                if template.field_type.is_choice() {
                    assert!(!template.options.is_empty(), "{} has no options", template.key);
                }
            }
        }
    }

    #[test]
    fn test_currency_smart_is_shared() {
        for catalog in [standalone(), sales(), asset()] {
            let template = catalog.get("currency-smart").unwrap();
            let helper = template.customization.as_ref().unwrap().input_helper.as_ref().unwrap();
            assert!(helper.show_prefix_dropdown);
            assert_eq!(helper.prefix_options, vec!["$".to_string(), "€".to_string()]);
        }
    }
}
