//! Formdef Validate: turns a form and a value map into an error map
//!
//! # Architecture
//!
//! ```text
//! FormDefinition + SubmissionValueMap
//!        ↓
//!   per field: Required → EmailShape → PhoneChars → MaxLength → MinLength
//!              → NumericRange → Pattern      (first failure wins)
//!        ↓
//!   ValidationErrorMap   (+ completion percentage for the progress bar)
//! ```
//!
//! # Example
//!
//! ```
//! use formdef_core::{FieldDefinition, FieldType, FormDefinition, SubmissionValueMap};
//! use formdef_validate::validate_form;
//!
//! let mut form = FormDefinition::new("Contact");
//! let email = FieldDefinition::new(FieldType::Email, "Email").with_order(1);
//! let email_id = email.id.clone();
//! form.fields.push(email);
//!
//! let mut values = SubmissionValueMap::new();
//! values.insert(email_id.clone(), "not-an-email".into());
//!
//! let errors = validate_form(&form, &values);
//! assert_eq!(errors[&email_id], "Please enter a valid email address");
//! ```

pub mod completeness;
pub mod engine;
pub mod progress;
pub mod rule;

pub use completeness::{check_complete, Completeness};
pub use engine::{FieldViolation, Validator};
pub use progress::{completion_percentage, Progress};
pub use rule::{RuleKind, EMAIL_MESSAGE, PHONE_MESSAGE, URL_MESSAGE};

use formdef_core::{FormDefinition, SubmissionValueMap, ValidationErrorMap};

/// Full sweep with the default rule order
pub fn validate_form(form: &FormDefinition, values: &SubmissionValueMap) -> ValidationErrorMap {
    Validator::new().validate(form, values)
}

/// Quick check: would this submission go through
pub fn would_submit(form: &FormDefinition, values: &SubmissionValueMap) -> bool {
    validate_form(form, values).is_empty()
}
