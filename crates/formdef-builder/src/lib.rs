//! Formdef Builder: authoring operations over a form definition
//!
//! A [`FormBuilder`] exclusively owns the definition being edited. Every
//! operation keeps `order` contiguous (1..N) and re-applies the field
//! invariants. [`FormBuilder::snapshot`] hands out an immutable `Arc`;
//! later edits copy on write.
//!
//! A definition that passes the completeness check becomes a [`ReadyForm`],
//! the only thing the session layer will persist.

pub mod builder;
pub mod patch;

pub use builder::{FormBuilder, ReadyForm};
pub use patch::{Direction, FieldPatch, FieldSeed};
