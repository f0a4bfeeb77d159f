//! FormDefinition ↔ PersistedForm
use std::collections::HashSet;

use formdef_core::{
    AuthorContext, FieldDefinition, FieldOption, FieldType, FormDefinition, FormTarget,
    UnknownFieldPolicy, ValidationRules,
};
use serde::{Deserialize, Serialize};

use crate::persisted::{FieldProperties, PersistedForm, WireField, WireOption};
use crate::WireError;

/// A field whose type tag is outside the known set, kept so a viewer can
/// show a placeholder in its slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsupportedField {
    /// 1-based position among all decoded fields
    pub order: u32,
    pub tag: String,
    pub label: String,
}

/// Result of decoding a persisted document
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedForm {
    pub form: FormDefinition,
    /// Id of the author who created the document
    pub created_by: String,
    /// Only populated under [`UnknownFieldPolicy::Placeholder`]
    pub unsupported: Vec<UnsupportedField>,
}

/// Build the persisted document. `createdBy` comes from the explicit author.
pub fn encode(form: &FormDefinition, author: &AuthorContext) -> PersistedForm {
    let (stage_id, category_id) = match &form.target {
        FormTarget::None => (None, None),
        FormTarget::Stage(id) => (Some(id.clone()), None),
        FormTarget::Category(id) => (None, Some(id.clone())),
    };

    PersistedForm {
        id: Some(form.id.clone()),
        form_title: form.title.clone(),
        form_description: form.description.clone(),
        stage_id,
        category_id,
        created_by: author.user_id.clone(),
        fields: form.ordered_fields().into_iter().map(encode_field).collect(),
        settings: Some(form.settings.clone()),
    }
}

fn encode_field(field: &FieldDefinition) -> WireField {
    WireField {
        field_type: field.field_type.as_str().to_string(),
        label: field.label.clone(),
        placeholder: field.placeholder.clone().unwrap_or_default(),
        required: field.required,
        help_text: field.help_text.clone().unwrap_or_default(),
        options: field.options.iter().cloned().map(WireOption::Pair).collect(),
        validation: field.validation.clone().unwrap_or_default(),
        properties: FieldProperties {
            id: Some(field.id.clone()),
            order: Some(field.order),
            customization: field.customization.clone().unwrap_or_default(),
            nested_customization: None,
        },
    }
}

/// Rebuild a definition from its persisted document.
///
/// Fields are ordered by `properties.order` (position when absent, ties
/// keep document order) and renumbered 1..N. Fields without an id get a
/// fresh one; an id used twice is an error.
pub fn decode(persisted: PersistedForm, policy: UnknownFieldPolicy) -> Result<DecodedForm, WireError> {
    let target = match (persisted.stage_id, persisted.category_id) {
        (Some(_), Some(_)) => return Err(WireError::ConflictingTarget),
        (Some(stage), None) => FormTarget::Stage(stage),
        (None, Some(category)) => FormTarget::Category(category),
        (None, None) => FormTarget::None,
    };

    let mut form = FormDefinition::new(persisted.form_title)
        .with_description(persisted.form_description)
        .with_target(target);
    if let Some(id) = persisted.id {
        form.id = id;
    }
    if let Some(settings) = persisted.settings {
        form.settings = settings;
    }

    // (order, field) and (order, unsupported) share one position space
    let mut slots: Vec<(u32, Result<FieldDefinition, UnsupportedField>)> = Vec::new();
    let mut ids = HashSet::new();
    for (idx, wire) in persisted.fields.into_iter().enumerate() {
        let order = wire.properties.order.unwrap_or(idx as u32 + 1);
        match wire.field_type.parse::<FieldType>() {
            Ok(field_type) => {
                let field = decode_field(wire, field_type, order);
                if !ids.insert(field.id.clone()) {
                    return Err(WireError::DuplicateFieldId(field.id));
                }
                slots.push((order, Ok(field)));
            }
            Err(_) => match policy {
                UnknownFieldPolicy::Fail => {
                    return Err(WireError::UnsupportedFieldType {
                        position: idx + 1,
                        tag: wire.field_type,
                    })
                }
                UnknownFieldPolicy::Placeholder => {
                    tracing::warn!(tag = %wire.field_type, position = idx + 1, "unsupported field type, keeping a placeholder");
                    slots.push((
                        order,
                        Err(UnsupportedField {
                            order,
                            tag: wire.field_type,
                            label: wire.label,
                        }),
                    ));
                }
            },
        }
    }
    slots.sort_by_key(|(order, _)| *order);

    let mut unsupported = Vec::new();
    for (position, (_, slot)) in slots.into_iter().enumerate() {
        let order = position as u32 + 1;
        match slot {
            Ok(field) => form.fields.push(field.with_order(order)),
            Err(placeholder) => unsupported.push(UnsupportedField { order, ..placeholder }),
        }
    }

    // placeholders keep their slot; known fields stay contiguous among themselves
    if unsupported.is_empty() {
        form.renumber();
    }

    Ok(DecodedForm {
        form,
        created_by: persisted.created_by,
        unsupported,
    })
}

fn decode_field(wire: WireField, field_type: FieldType, order: u32) -> FieldDefinition {
    let dropped_options = !field_type.accepts_options() && !wire.options.is_empty();
    if dropped_options {
        tracing::debug!(tag = %wire.field_type, "dropping options on a type that takes none");
    }

    let properties = wire.properties;
    let customization = match properties.nested_customization {
        Some(nested) if properties.customization.is_empty() => {
            tracing::warn!(label = %wire.label, "customization nested under properties, reading it anyway");
            nested
        }
        Some(_) => {
            tracing::warn!(label = %wire.label, "nested customization ignored, flattened keys take precedence");
            properties.customization
        }
        None => properties.customization,
    };

    let mut field = FieldDefinition {
        id: properties
            .id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
        field_type,
        label: wire.label,
        placeholder: non_empty(wire.placeholder),
        help_text: non_empty(wire.help_text),
        required: wire.required,
        options: wire.options.into_iter().map(FieldOption::from).collect(),
        validation: Some(wire.validation).filter(|v: &ValidationRules| !v.is_empty()),
        customization: Some(customization),
        order,
    };
    field.enforce_invariants();
    field
}

fn non_empty(text: String) -> Option<String> {
    (!text.trim().is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn persisted(fields: &str) -> PersistedForm {
        serde_json::from_str(&format!(
            r#"{{"formTitle":"Inspection","stageId":"st-9","createdBy":"u1","fields":{}}}"#,
            fields
        ))
        .unwrap()
    }

    #[test]
    fn test_decode_orders_by_properties() {
        let decoded = decode(
            persisted(
                r#"[{"fieldType":"text","label":"B","properties":{"order":2}},
                    {"fieldType":"text","label":"A","properties":{"order":1}}]"#,
            ),
            UnknownFieldPolicy::Fail,
        )
        .unwrap();
        let labels: Vec<_> = decoded.form.fields.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(labels, vec!["A", "B"]);
        assert_eq!(decoded.form.target, FormTarget::Stage("st-9".to_string()));
        assert_eq!(decoded.created_by, "u1");
    }

    #[test]
    fn test_unknown_type_fails_under_fail_policy() {
        let err = decode(
            persisted(r#"[{"fieldType":"text","label":"A"},{"fieldType":"hologram","label":"H"}]"#),
            UnknownFieldPolicy::Fail,
        )
        .unwrap_err();
        assert!(matches!(err, WireError::UnsupportedFieldType { position: 2, .. }));
    }

    #[test]
    fn test_unknown_type_placeholder_keeps_slot() {
        let decoded = decode(
            persisted(
                r#"[{"fieldType":"text","label":"A"},{"fieldType":"hologram","label":"H"},{"fieldType":"email","label":"E"}]"#,
            ),
            UnknownFieldPolicy::Placeholder,
        )
        .unwrap();
        assert_eq!(decoded.form.fields.len(), 2);
        assert_eq!(decoded.unsupported.len(), 1);
        assert_eq!(decoded.unsupported[0].order, 2);
        assert_eq!(decoded.form.fields[1].order, 3);
    }

    #[test]
    fn test_conflicting_target() {
        let mut doc = persisted("[]");
        doc.category_id = Some("cat".to_string());
        assert!(matches!(
            decode(doc, UnknownFieldPolicy::Fail),
            Err(WireError::ConflictingTarget)
        ));
    }

    #[test]
    fn test_missing_ids_are_generated() {
        let decoded = decode(
            persisted(r#"[{"fieldType":"text","label":"A"},{"fieldType":"text","label":"B"}]"#),
            UnknownFieldPolicy::Fail,
        )
        .unwrap();
        assert_ne!(decoded.form.fields[0].id, decoded.form.fields[1].id);
        assert!(!decoded.form.fields[0].id.is_empty());
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let err = decode(
            persisted(
                r#"[{"fieldType":"text","label":"A","properties":{"id":"x"}},
                    {"fieldType":"email","label":"B","properties":{"id":"x"}}]"#,
            ),
            UnknownFieldPolicy::Fail,
        )
        .unwrap_err();
        assert!(matches!(err, WireError::DuplicateFieldId(ref id) if id == "x"));
        assert!(formdef_core::FormError::from(err).to_string().starts_with("WIRE/DUPLICATE_ID"));
    }

    #[test]
    fn test_nested_customization_keeps_mask() {
        let decoded = decode(
            persisted(
                r#"[{"fieldType":"tel","label":"Phone",
                     "properties":{"id":"p","customization":{"inputMask":{"mask":"phone"}}}}]"#,
            ),
            UnknownFieldPolicy::Fail,
        )
        .unwrap();
        let customization = decoded.form.fields[0].customization.as_ref().unwrap();
        assert_eq!(customization.input_mask.unwrap().mask, formdef_core::MaskKind::Phone);
    }

    #[test]
    fn test_encode_stamps_author() {
        let form = FormDefinition::new("Checkout").with_target(FormTarget::Category("c-1".into()));
        let doc = encode(&form, &AuthorContext::new("admin-7"));
        assert_eq!(doc.created_by, "admin-7");
        assert_eq!(doc.category_id.as_deref(), Some("c-1"));
        assert!(doc.stage_id.is_none());
    }
}
