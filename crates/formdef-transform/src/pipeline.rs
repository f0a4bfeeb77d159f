//! Transform pipeline: chains input stages in their fixed order
use formdef_core::FieldDefinition;

use crate::affix::{compose, AffixSelection};
use crate::case::apply_case;
use crate::mask::apply_mask;

/// One step of the keystroke pipeline
pub trait InputStage: Send + Sync {
    /// Stage id (ex: "case.on_input")
    fn id(&self) -> &'static str;

    /// Whether the field declares this transform
    fn applies_to(&self, field: &FieldDefinition) -> bool;

    /// Transform the running value
    fn apply(&self, value: String, field: &FieldDefinition, selection: &AffixSelection) -> String;
}

/// Case transform from `customization.transformation`
pub struct CaseStage {
    /// Also run transforms declared with `apply_on_input = false`
    pub include_deferred: bool,
}

impl InputStage for CaseStage {
    fn id(&self) -> &'static str {
        if self.include_deferred {
            "case.on_commit"
        } else {
            "case.on_input"
        }
    }

    fn applies_to(&self, field: &FieldDefinition) -> bool {
        field.field_type.is_text_like()
            && field
                .customization
                .as_ref()
                .and_then(|c| c.transformation)
                .is_some_and(|t| t.apply_on_input || self.include_deferred)
    }

    fn apply(&self, value: String, field: &FieldDefinition, _selection: &AffixSelection) -> String {
        match field.customization.as_ref().and_then(|c| c.transformation) {
            Some(t) => apply_case(t.kind, &value),
            None => value,
        }
    }
}

/// Input mask from `customization.input_mask`
pub struct MaskStage;

impl InputStage for MaskStage {
    fn id(&self) -> &'static str {
        "mask"
    }

    fn applies_to(&self, field: &FieldDefinition) -> bool {
        field.field_type.is_text_like()
            && field.customization.as_ref().is_some_and(|c| c.input_mask.is_some())
    }

    fn apply(&self, value: String, field: &FieldDefinition, _selection: &AffixSelection) -> String {
        match field.customization.as_ref().and_then(|c| c.input_mask) {
            Some(mask) => apply_mask(mask.mask, &value),
            None => value,
        }
    }
}

/// Prefix/suffix from `customization.input_helper`
pub struct AffixStage;

impl InputStage for AffixStage {
    fn id(&self) -> &'static str {
        "affix"
    }

    fn applies_to(&self, field: &FieldDefinition) -> bool {
        field.field_type.is_text_like() && field.input_helper().is_some()
    }

    fn apply(&self, value: String, field: &FieldDefinition, selection: &AffixSelection) -> String {
        let Some(helper) = field.input_helper() else {
            return value;
        };
        let prefix = helper.resolve_prefix(selection.prefix.as_deref());
        let suffix = helper.resolve_suffix(selection.suffix.as_deref());
        compose(&value, prefix.as_deref(), suffix.as_deref())
    }
}

/// Ordered chain of input stages
pub struct TransformPipeline {
    stages: Vec<Box<dyn InputStage>>,
    pipeline_id: String,
}

impl TransformPipeline {
    pub fn new(stages: Vec<Box<dyn InputStage>>) -> Self {
        let pipeline_id = stages
            .iter()
            .map(|s| s.id())
            .collect::<Vec<_>>()
            .join("→");

        Self { stages, pipeline_id }
    }

    /// Keystroke pipeline: case (on-input only) → mask → affix
    pub fn on_input() -> Self {
        Self::new(vec![
            Box::new(CaseStage { include_deferred: false }),
            Box::new(MaskStage),
            Box::new(AffixStage),
        ])
    }

    /// Commit pipeline: every declared case transform → mask → affix
    pub fn on_commit() -> Self {
        Self::new(vec![
            Box::new(CaseStage { include_deferred: true }),
            Box::new(MaskStage),
            Box::new(AffixStage),
        ])
    }

    /// Run every applicable stage over a raw value
    pub fn run(&self, field: &FieldDefinition, raw: &str, selection: &AffixSelection) -> String {
        let mut current = raw.to_string();

        for stage in &self.stages {
            if !stage.applies_to(field) {
                continue;
            }
            current = stage.apply(current, field, selection);
            tracing::trace!(stage = stage.id(), field = %field.id, value = %current, "input stage applied");
        }

        current
    }

    pub fn pipeline_id(&self) -> &str {
        &self.pipeline_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formdef_core::{
        CaseTransform, Customization, FieldType, InputHelper, InputMask, MaskKind, Transformation,
    };

    fn currency_smart() -> FieldDefinition {
        FieldDefinition::new(FieldType::Currency, "Amount").with_customization(Customization {
            input_helper: Some(InputHelper {
                show_prefix_dropdown: true,
                prefix_options: vec!["$".to_string(), "€".to_string()],
                ..InputHelper::default()
            }),
            ..Customization::default()
        })
    }

    #[test]
    fn test_pipeline_id() {
        assert_eq!(TransformPipeline::on_input().pipeline_id(), "case.on_input→mask→affix");
    }

    #[test]
    fn test_currency_smart_default_prefix() {
        let stored = TransformPipeline::on_input().run(&currency_smart(), "50", &AffixSelection::default());
        assert_eq!(stored, "$50");
    }

    #[test]
    fn test_currency_smart_selected_prefix() {
        let selection = AffixSelection::default().prefix("€");
        let stored = TransformPipeline::on_input().run(&currency_smart(), "50", &selection);
        assert_eq!(stored, "€50");
    }

    #[test]
    fn test_fixed_order_case_then_mask_then_affix() {
        let field = FieldDefinition::new(FieldType::Text, "Ref").with_customization(Customization {
            transformation: Some(Transformation {
                kind: CaseTransform::Uppercase,
                apply_on_input: true,
            }),
            input_mask: Some(InputMask { mask: MaskKind::Generic }),
            input_helper: Some(InputHelper {
                prefix: Some("id-".to_string()),
                ..InputHelper::default()
            }),
        });

        // the prefix is added after masking, so its letters survive
        let stored = TransformPipeline::on_input().run(&field, "12345abc67890", &AffixSelection::default());
        assert_eq!(stored, "id-12345 67890");
    }

    #[test]
    fn test_deferred_case_waits_for_commit() {
        let field = FieldDefinition::new(FieldType::Text, "Name").with_customization(Customization {
            transformation: Some(Transformation {
                kind: CaseTransform::TitleCase,
                apply_on_input: false,
            }),
            ..Customization::default()
        });

        let selection = AffixSelection::default();
        assert_eq!(TransformPipeline::on_input().run(&field, "ada lovelace", &selection), "ada lovelace");
        assert_eq!(TransformPipeline::on_commit().run(&field, "ada lovelace", &selection), "Ada Lovelace");
    }

    #[test]
    fn test_non_text_fields_untouched() {
        let field = FieldDefinition::new(FieldType::Date, "When").with_customization(Customization {
            transformation: Some(Transformation {
                kind: CaseTransform::Uppercase,
                apply_on_input: true,
            }),
            ..Customization::default()
        });
        assert_eq!(
            TransformPipeline::on_input().run(&field, "2024-01-01t", &AffixSelection::default()),
            "2024-01-01t"
        );
    }
}
