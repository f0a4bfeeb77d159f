//! Saved progress snapshots
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use formdef_core::SubmissionValueMap;
use formdef_transform::AffixSelection;
use serde::{Deserialize, Serialize};

/// Values of a partially filled form, tied to the definition they were
/// entered against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    pub form_id: String,
    /// `FormDefinition::fingerprint` at save time
    pub fingerprint: String,
    pub values: SubmissionValueMap,
    /// What the user typed, before transforms
    #[serde(default)]
    pub raw: BTreeMap<String, String>,
    #[serde(default)]
    pub selections: BTreeMap<String, AffixSelection>,
    pub saved_at: DateTime<Utc>,
}

impl ProgressSnapshot {
    pub fn matches(&self, fingerprint: &str) -> bool {
        self.fingerprint == fingerprint
    }
}
