//! In-memory port implementations
use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use formdef_core::FormTarget;
use formdef_wire::{PersistedForm, SubmissionPayload};
use tokio::sync::{Mutex, RwLock};

use crate::ports::{FormStore, GatewayError, ProgressStore, SubmissionGateway};
use crate::progress::ProgressSnapshot;

#[derive(Debug, Default)]
pub struct InMemoryFormStore {
    forms: RwLock<HashMap<String, PersistedForm>>,
}

impl InMemoryFormStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.forms.read().await.len()
    }
}

#[async_trait]
impl FormStore for InMemoryFormStore {
    async fn save(&self, form: &PersistedForm) -> Result<String, GatewayError> {
        let id = form
            .id
            .clone()
            .ok_or_else(|| GatewayError::Rejected("form has no id".to_string()))?;
        self.forms.write().await.insert(id.clone(), form.clone());
        Ok(id)
    }

    async fn fetch(&self, form_id: &str) -> Result<Option<PersistedForm>, GatewayError> {
        Ok(self.forms.read().await.get(form_id).cloned())
    }

    async fn list_for_target(&self, target: &FormTarget) -> Result<Vec<PersistedForm>, GatewayError> {
        let forms = self.forms.read().await;
        let mut matching: Vec<PersistedForm> = forms
            .values()
            .filter(|form| match target {
                FormTarget::Stage(id) => form.stage_id.as_deref() == Some(id.as_str()),
                FormTarget::Category(id) => form.category_id.as_deref() == Some(id.as_str()),
                FormTarget::None => form.stage_id.is_none() && form.category_id.is_none(),
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.form_title.cmp(&b.form_title));
        Ok(matching)
    }
}

/// Records payloads; failures can be queued to exercise the retry path
#[derive(Debug, Default)]
pub struct InMemorySubmissionGateway {
    submitted: RwLock<Vec<SubmissionPayload>>,
    scripted_failures: Mutex<VecDeque<GatewayError>>,
}

impl InMemorySubmissionGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next call with `error`
    pub async fn fail_next(&self, error: GatewayError) {
        self.scripted_failures.lock().await.push_back(error);
    }

    pub async fn submitted(&self) -> Vec<SubmissionPayload> {
        self.submitted.read().await.clone()
    }
}

#[async_trait]
impl SubmissionGateway for InMemorySubmissionGateway {
    async fn submit(&self, payload: &SubmissionPayload) -> Result<(), GatewayError> {
        if let Some(error) = self.scripted_failures.lock().await.pop_front() {
            return Err(error);
        }
        self.submitted.write().await.push(payload.clone());
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryProgressStore {
    snapshots: RwLock<HashMap<String, ProgressSnapshot>>,
}

impl InMemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProgressStore for InMemoryProgressStore {
    async fn save(&self, snapshot: &ProgressSnapshot) -> Result<(), GatewayError> {
        self.snapshots
            .write()
            .await
            .insert(snapshot.form_id.clone(), snapshot.clone());
        Ok(())
    }

    async fn load(&self, form_id: &str) -> Result<Option<ProgressSnapshot>, GatewayError> {
        Ok(self.snapshots.read().await.get(form_id).cloned())
    }

    async fn clear(&self, form_id: &str) -> Result<(), GatewayError> {
        self.snapshots.write().await.remove(form_id);
        Ok(())
    }
}
