//! Unified error model
use thiserror::Error;

/// Errors shared by every formdef crate.
///
/// Validation failures of submitted values are not errors: they are
/// returned as a [`crate::ValidationErrorMap`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("FIELD/UNSUPPORTED_TYPE: {0}")]
    UnsupportedFieldType(String),

    #[error("FIELD/NOT_FOUND: {0}")]
    FieldNotFound(String),

    #[error("FORM/FIELD_CAP: a form can hold at most {cap} fields")]
    FieldCapReached { cap: usize },

    #[error("FORM/INCOMPLETE: {0}")]
    Incomplete(String),

    #[error("WIRE/{0}")]
    Wire(String),

    #[error("CONFIG/{0}")]
    Config(String),

    #[error("STATE/{0}")]
    InvalidTransition(String),

    #[error("PORT/{0}")]
    Port(String),
}

pub type Result<T> = std::result::Result<T, FormError>;
