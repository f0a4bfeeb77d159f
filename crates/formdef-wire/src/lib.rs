//! Formdef Wire: the JSON documents exchanged with the backend
//!
//! Two shapes cross the boundary:
//! - the persisted form definition (`formTitle`, `fields[].fieldType`, ...)
//! - the submission payload (`formId`, `leadId|assetId`, `formData`, `submittedAt`)
//!
//! Definitions are always written and read as a whole document.

pub mod codec;
pub mod persisted;
pub mod submission;

pub use codec::{decode, encode, DecodedForm, UnsupportedField};
pub use persisted::{FieldProperties, PersistedForm, WireField, WireOption};
pub use submission::{SubmissionPayload, SubmissionSubject};

use formdef_core::{AuthorContext, FormDefinition, FormError, UnknownFieldPolicy};
use thiserror::Error;

/// Errors raised while encoding or decoding documents
#[derive(Debug, Error)]
pub enum WireError {
    #[error("WIRE/JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("FIELD/UNSUPPORTED_TYPE: '{tag}' at position {position}")]
    UnsupportedFieldType { position: usize, tag: String },

    #[error("WIRE/TARGET: both stageId and categoryId are set")]
    ConflictingTarget,

    #[error("WIRE/DUPLICATE_ID: field id '{0}' appears more than once")]
    DuplicateFieldId(String),
}

impl From<WireError> for FormError {
    fn from(err: WireError) -> Self {
        match err {
            WireError::UnsupportedFieldType { tag, .. } => FormError::UnsupportedFieldType(tag),
            WireError::Json(e) => FormError::Wire(format!("JSON: {}", e)),
            WireError::ConflictingTarget => {
                FormError::Wire("TARGET: both stageId and categoryId are set".to_string())
            }
            WireError::DuplicateFieldId(id) => {
                FormError::Wire(format!("DUPLICATE_ID: field id '{}' appears more than once", id))
            }
        }
    }
}

/// Serialize a definition to its persisted JSON text
pub fn to_json(form: &FormDefinition, author: &AuthorContext) -> Result<String, WireError> {
    Ok(serde_json::to_string_pretty(&encode(form, author))?)
}

/// Parse persisted JSON text
pub fn from_json(json: &str, policy: UnknownFieldPolicy) -> Result<DecodedForm, WireError> {
    let persisted: PersistedForm = serde_json::from_str(json)?;
    decode(persisted, policy)
}
