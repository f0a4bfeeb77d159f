//! Submission payload sent when a filled form is submitted
use chrono::{DateTime, Utc};
use formdef_core::SubmissionValueMap;
use serde::{Deserialize, Serialize};

/// Record a submission is attached to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum SubmissionSubject {
    /// Sales surface
    Lead(String),
    /// Asset surface
    Asset(String),
    /// Standalone forms
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub form_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<String>,

    pub form_data: SubmissionValueMap,

    /// RFC 3339, UTC
    pub submitted_at: DateTime<Utc>,
}

impl SubmissionPayload {
    pub fn new(
        form_id: impl Into<String>,
        subject: &SubmissionSubject,
        form_data: SubmissionValueMap,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        let (lead_id, asset_id) = match subject {
            SubmissionSubject::Lead(id) => (Some(id.clone()), None),
            SubmissionSubject::Asset(id) => (None, Some(id.clone())),
            SubmissionSubject::None => (None, None),
        };
        Self {
            form_id: form_id.into(),
            lead_id,
            asset_id,
            form_data,
            submitted_at,
        }
    }

    pub fn subject(&self) -> SubmissionSubject {
        match (&self.lead_id, &self.asset_id) {
            (Some(lead), _) => SubmissionSubject::Lead(lead.clone()),
            (None, Some(asset)) => SubmissionSubject::Asset(asset.clone()),
            (None, None) => SubmissionSubject::None,
        }
    }

    pub fn to_json(&self) -> Result<String, crate::WireError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use formdef_core::FieldValue;

    #[test]
    fn test_lead_payload_shape() {
        let mut data = SubmissionValueMap::new();
        data.insert("f1".to_string(), FieldValue::from("Ada"));
        data.insert("f2".to_string(), FieldValue::from(true));
        data.insert("f3".to_string(), FieldValue::from(vec!["a".to_string(), "b".to_string()]));
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();

        let payload = SubmissionPayload::new("form-1", &SubmissionSubject::Lead("lead-9".into()), data, at);
        let json: serde_json::Value = serde_json::from_str(&payload.to_json().unwrap()).unwrap();

        assert_eq!(json["formId"], "form-1");
        assert_eq!(json["leadId"], "lead-9");
        assert!(json.get("assetId").is_none());
        assert_eq!(json["formData"]["f1"], "Ada");
        assert_eq!(json["formData"]["f2"], true);
        assert_eq!(json["formData"]["f3"][1], "b");
        assert_eq!(json["submittedAt"], "2024-05-01T12:30:00Z");
    }

    #[test]
    fn test_subject_round_trip() {
        let at = Utc::now();
        let payload = SubmissionPayload::new(
            "form-2",
            &SubmissionSubject::Asset("asset-3".into()),
            SubmissionValueMap::new(),
            at,
        );
        assert_eq!(payload.subject(), SubmissionSubject::Asset("asset-3".into()));
        assert!(payload.lead_id.is_none());
    }
}
