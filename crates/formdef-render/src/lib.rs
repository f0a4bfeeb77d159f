//! Formdef Render: what a viewer draws for each field
//!
//! `resolve_widget` maps every [`FieldType`](formdef_core::FieldType) to a
//! widget contract. [`RenderPlan`] combines the contracts with the current
//! values, errors and prefix/suffix selections, and [`OutlineRenderer`]
//! turns a plan into plain text.
//!
//! # Example
//!
//! ```ignore
//! use formdef_render::{RenderPlan, OutlineRenderer};
//!
//! let plan = RenderPlan::build(&form, &values, &errors);
//! println!("{}", OutlineRenderer::new()?.outline(&plan)?);
//! ```

pub mod outline;
pub mod plan;
pub mod widget;

pub use outline::{OutlineRenderer, OutlineTemplates, DEFAULT_OUTLINE};
pub use plan::{RenderPlan, WidgetSpec};
pub use widget::{resolve_tag, resolve_widget, DateKind, InertKind, TextInputKind, WidgetKind};

use thiserror::Error;

/// Errors from outline rendering
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("RENDER/TEMPLATES: {0}")]
    Templates(String),

    #[error("RENDER/FAILED: {0}")]
    Render(String),
}
