//! Prefix/suffix composition
use serde::{Deserialize, Serialize};

/// The user's current choice in prefix/suffix dropdowns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffixSelection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
}

impl AffixSelection {
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }
}

/// `prefix + value + suffix`
pub fn compose(value: &str, prefix: Option<&str>, suffix: Option<&str>) -> String {
    let mut out = String::with_capacity(
        value.len() + prefix.map_or(0, str::len) + suffix.map_or(0, str::len),
    );
    out.push_str(prefix.unwrap_or(""));
    out.push_str(value);
    out.push_str(suffix.unwrap_or(""));
    out
}

/// Inverse of [`compose`] when the stored value still carries both affixes
pub fn strip_affixes<'a>(stored: &'a str, prefix: Option<&str>, suffix: Option<&str>) -> &'a str {
    let mut core = stored;
    if let Some(p) = prefix {
        core = core.strip_prefix(p).unwrap_or(core);
    }
    if let Some(s) = suffix {
        core = core.strip_suffix(s).unwrap_or(core);
    }
    core
}
