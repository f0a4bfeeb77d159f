//! Surfaces: the places forms are authored and filled
use std::fmt;
use std::str::FromStr;

use formdef_core::{FormTarget, FormdefConfig};
use formdef_wire::SubmissionSubject;
use serde::{Deserialize, Serialize};

use crate::builtin;
use crate::template::Catalog;
use crate::CatalogError;

/// Where a form lives. Sales forms hang off pipeline stages and are filled
/// per lead; asset forms hang off categories and are filled per asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    Sales,
    Asset,
    Standalone,
}

impl Surface {
    pub const ALL: [Surface; 3] = [Surface::Sales, Surface::Asset, Surface::Standalone];

    pub fn as_str(&self) -> &'static str {
        match self {
            Surface::Sales => "sales",
            Surface::Asset => "asset",
            Surface::Standalone => "standalone",
        }
    }

    pub fn catalog(&self) -> Catalog {
        match self {
            Surface::Sales => builtin::sales(),
            Surface::Asset => builtin::asset(),
            Surface::Standalone => builtin::standalone(),
        }
    }

    /// Config profile of the same name
    pub fn config(&self) -> FormdefConfig {
        match self {
            Surface::Sales => FormdefConfig::sales(),
            Surface::Asset => FormdefConfig::asset(),
            Surface::Standalone => FormdefConfig::standalone(),
        }
    }

    /// Target a form on this surface is bound to
    pub fn target(&self, id: impl Into<String>) -> FormTarget {
        match self {
            Surface::Sales => FormTarget::Stage(id.into()),
            Surface::Asset => FormTarget::Category(id.into()),
            Surface::Standalone => FormTarget::None,
        }
    }

    /// Record a submission on this surface references
    pub fn subject(&self, id: impl Into<String>) -> SubmissionSubject {
        match self {
            Surface::Sales => SubmissionSubject::Lead(id.into()),
            Surface::Asset => SubmissionSubject::Asset(id.into()),
            Surface::Standalone => SubmissionSubject::None,
        }
    }

    /// Surface a definition belongs to, judged by its target
    pub fn of_target(target: &FormTarget) -> Self {
        match target {
            FormTarget::Stage(_) => Surface::Sales,
            FormTarget::Category(_) => Surface::Asset,
            FormTarget::None => Surface::Standalone,
        }
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Surface {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Surface::ALL
            .into_iter()
            .find(|surface| surface.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CatalogError::UnknownSurface(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_wiring() {
        assert_eq!(Surface::Asset.config().field_cap, Some(15));
        assert_eq!(Surface::Sales.config().field_cap, None);
        assert_eq!(Surface::Sales.target("st-1"), FormTarget::Stage("st-1".into()));
        assert_eq!(Surface::Asset.subject("a-1"), SubmissionSubject::Asset("a-1".into()));
        assert_eq!(Surface::Standalone.subject("x"), SubmissionSubject::None);
    }

    #[test]
    fn test_parse_and_round_trip() {
        for surface in Surface::ALL {
            assert_eq!(surface.as_str().parse::<Surface>().unwrap(), surface);
            assert_eq!(Surface::of_target(&surface.target("id")), surface);
        }
        assert!("crm".parse::<Surface>().is_err());
        assert_eq!(" Sales ".parse::<Surface>().unwrap(), Surface::Sales);
    }

    #[test]
    fn test_catalog_names_match() {
        for surface in Surface::ALL {
            assert_eq!(surface.catalog().name, surface.as_str());
        }
    }
}
