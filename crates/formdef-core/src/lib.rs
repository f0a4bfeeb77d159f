//! Formdef Core: field and form definitions shared by every builder surface
//!
//! The three builders of the business app (sales stage forms, asset custom
//! forms, the standalone form builder) all speak the types in this crate.
//! Everything else in the workspace (transforms, validation, rendering,
//! persistence, fill sessions) is a function over these types.

pub mod config;
pub mod context;
pub mod error;
pub mod field;
pub mod form;
pub mod values;

pub use config::{ConfigOverrides, EmptyProgressPolicy, FormdefConfig, UnknownFieldPolicy};
pub use context::AuthorContext;
pub use error::{FormError, Result};
pub use field::{
    CaseTransform, Customization, FieldDefinition, FieldOption, FieldType, InputHelper,
    InputMask, MaskKind, NamedPattern, Pattern, Transformation, ValidationRules,
};
pub use form::{FormDefinition, FormSettings, FormTarget};
pub use values::{is_filled, FieldValue, SubmissionValueMap, ValidationErrorMap};

/// Engine version stamped into persisted documents
pub const FORMDEF_VERSION: &str = "1.0.0";
