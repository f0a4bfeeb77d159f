//! Formdef Catalog: field templates offered to form authors
//!
//! A catalog is an ordered list of [`FieldTemplate`]s keyed by a short slug
//! (`"currency-smart"`, `"phone-us"`, ...). Each [`Surface`] ships its own
//! built-in catalog; catalogs can also be loaded from YAML.

pub mod builtin;
pub mod surface;
pub mod template;

pub use surface::Surface;
pub use template::{Catalog, FieldTemplate};

use formdef_core::FormError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("CATALOG/YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CATALOG/IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("CATALOG/DUPLICATE_KEY: {0}")]
    DuplicateKey(String),

    #[error("CATALOG/UNKNOWN_SURFACE: {0}")]
    UnknownSurface(String),
}

impl From<CatalogError> for FormError {
    fn from(err: CatalogError) -> Self {
        FormError::Config(err.to_string())
    }
}
