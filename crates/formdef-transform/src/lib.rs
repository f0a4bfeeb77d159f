//! Formdef Transform: author-declared cosmetic transforms on raw input
//!
//! Keystrokes reach the stored value through a fixed chain:
//!
//! ```text
//! raw → case transform → input mask → prefix + value + suffix → stored
//! ```
//!
//! # Example
//!
//! ```
//! use formdef_core::{Customization, FieldDefinition, FieldType, InputMask, MaskKind};
//! use formdef_transform::{transform_input, AffixSelection};
//!
//! let field = FieldDefinition::new(FieldType::Tel, "Phone").with_customization(Customization {
//!     input_mask: Some(InputMask { mask: MaskKind::Phone }),
//!     ..Customization::default()
//! });
//!
//! let stored = transform_input(&field, "555.123.4567", &AffixSelection::default());
//! assert_eq!(stored, "(555) 123-4567");
//! ```

pub mod affix;
pub mod case;
pub mod mask;
pub mod pipeline;

pub use affix::{compose, strip_affixes, AffixSelection};
pub use case::{apply_case, title_case};
pub use mask::{apply_mask, digits_only, generic_mask, phone_mask};
pub use pipeline::{AffixStage, CaseStage, InputStage, MaskStage, TransformPipeline};

use formdef_core::FieldDefinition;

/// Run the keystroke pipeline for one field
pub fn transform_input(field: &FieldDefinition, raw: &str, selection: &AffixSelection) -> String {
    TransformPipeline::on_input().run(field, raw, selection)
}

/// Run the pipeline including case transforms deferred until commit
pub fn commit_input(field: &FieldDefinition, raw: &str, selection: &AffixSelection) -> String {
    TransformPipeline::on_commit().run(field, raw, selection)
}
