//! Configuration profiles
//!
//! Each builder surface gets a named profile (`standalone`, `sales`,
//! `asset`). Profiles can be overlaid from YAML and from the environment.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{FormError, Result};

/// Completion percentage of a form that has no required fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyProgressPolicy {
    /// Report 0%
    Zero,
    /// Report 100%: nothing is required, so nothing is missing
    Full,
}

/// What to do with a field type tag outside the known set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownFieldPolicy {
    /// Return `UnsupportedFieldType`
    Fail,
    /// Log a warning and render an inert placeholder
    Placeholder,
}

impl Default for UnknownFieldPolicy {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            UnknownFieldPolicy::Fail
        } else {
            UnknownFieldPolicy::Placeholder
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormdefConfig {
    /// Profile name (e.g. "asset")
    pub profile: String,

    /// Maximum fields per form; `None` is unlimited
    pub field_cap: Option<usize>,

    /// Delay before a submitted fill session clears itself
    pub reset_delay_ms: u64,

    pub empty_progress: EmptyProgressPolicy,

    pub unknown_field_types: UnknownFieldPolicy,
}

/// Partial configuration read from YAML; set keys win over the profile
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverrides {
    pub profile: Option<String>,
    /// `0` means unlimited
    pub field_cap: Option<usize>,
    pub reset_delay_ms: Option<u64>,
    pub empty_progress: Option<EmptyProgressPolicy>,
    pub unknown_field_types: Option<UnknownFieldPolicy>,
}

impl FormdefConfig {
    /// Standalone form builder: no field cap
    pub fn standalone() -> Self {
        Self {
            profile: "standalone".to_string(),
            field_cap: None,
            reset_delay_ms: 2_500,
            empty_progress: EmptyProgressPolicy::Zero,
            unknown_field_types: UnknownFieldPolicy::default(),
        }
    }

    /// Sales stage forms: no field cap, slightly faster reset
    pub fn sales() -> Self {
        Self {
            profile: "sales".to_string(),
            reset_delay_ms: 2_000,
            ..Self::standalone()
        }
    }

    /// Asset custom forms: 15 fields per form
    pub fn asset() -> Self {
        Self {
            profile: "asset".to_string(),
            field_cap: Some(15),
            reset_delay_ms: 3_000,
            ..Self::standalone()
        }
    }

    /// Get profile by name, falling back to standalone
    pub fn for_profile(name: &str) -> Self {
        match name {
            "sales" => Self::sales(),
            "asset" => Self::asset(),
            "standalone" => Self::standalone(),
            other => {
                tracing::warn!(profile = other, "unknown profile, using standalone");
                Self::standalone()
            }
        }
    }

    /// Parse YAML overrides on top of the profile they name
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let overrides: ConfigOverrides =
            serde_yaml::from_str(yaml).map_err(|e| FormError::Config(e.to_string()))?;
        let base = Self::for_profile(overrides.profile.as_deref().unwrap_or("standalone"));
        Ok(base.merge(&overrides))
    }

    /// Load a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| FormError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml(&yaml)
    }

    /// Merge with overrides (overrides take precedence)
    pub fn merge(mut self, other: &ConfigOverrides) -> Self {
        if let Some(profile) = &other.profile { self.profile = profile.clone(); }
        if let Some(cap) = other.field_cap { self.field_cap = (cap > 0).then_some(cap); }
        if let Some(ms) = other.reset_delay_ms { self.reset_delay_ms = ms; }
        if let Some(policy) = other.empty_progress { self.empty_progress = policy; }
        if let Some(policy) = other.unknown_field_types { self.unknown_field_types = policy; }
        self
    }

    /// Apply `FORMDEF_FIELD_CAP` and `FORMDEF_RESET_DELAY_MS`
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from(self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut overrides = ConfigOverrides::default();
        if let Some(raw) = lookup("FORMDEF_FIELD_CAP") {
            let cap = raw
                .trim()
                .parse()
                .map_err(|_| FormError::Config(format!("FORMDEF_FIELD_CAP: not a number: {}", raw)))?;
            overrides.field_cap = Some(cap);
        }
        if let Some(raw) = lookup("FORMDEF_RESET_DELAY_MS") {
            let ms = raw.trim().parse().map_err(|_| {
                FormError::Config(format!("FORMDEF_RESET_DELAY_MS: not a number: {}", raw))
            })?;
            overrides.reset_delay_ms = Some(ms);
        }
        Ok(self.merge(&overrides))
    }

    pub fn reset_delay(&self) -> Duration {
        Duration::from_millis(self.reset_delay_ms)
    }
}

impl Default for FormdefConfig {
    fn default() -> Self {
        Self::standalone()
    }
}
