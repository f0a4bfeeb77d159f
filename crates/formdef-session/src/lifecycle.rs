//! Authoring lifecycle: Empty → Drafting → Ready → Persisted
use std::sync::Arc;

use formdef_builder::{FormBuilder, ReadyForm};
use formdef_core::{AuthorContext, FormDefinition, FormError, FormdefConfig, Result};
use formdef_wire::{decode, encode, UnsupportedField};

use crate::ports::FormStore;

/// A definition that has been stored and can be filled
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedForm {
    form: Arc<FormDefinition>,
    created_by: String,
    fingerprint: String,
    unsupported: Vec<UnsupportedField>,
}

impl PublishedForm {
    pub(crate) fn new(form: Arc<FormDefinition>, created_by: String, unsupported: Vec<UnsupportedField>) -> Self {
        let fingerprint = form.fingerprint();
        Self {
            form,
            created_by,
            fingerprint,
            unsupported,
        }
    }

    /// Fetch and decode a stored definition, as a viewer does before filling
    pub async fn load(store: &dyn FormStore, form_id: &str, config: &FormdefConfig) -> Result<Self> {
        let persisted = store
            .fetch(form_id)
            .await?
            .ok_or_else(|| FormError::Port(format!("NOT_FOUND: form {}", form_id)))?;
        let decoded = decode(persisted, config.unknown_field_types)?;
        if !decoded.unsupported.is_empty() {
            tracing::warn!(form = form_id, count = decoded.unsupported.len(), "form has unsupported fields");
        }
        Ok(Self::new(Arc::new(decoded.form), decoded.created_by, decoded.unsupported))
    }

    pub fn definition(&self) -> &FormDefinition {
        &self.form
    }

    pub fn shared(&self) -> Arc<FormDefinition> {
        Arc::clone(&self.form)
    }

    pub fn created_by(&self) -> &str {
        &self.created_by
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Fields skipped on decode under the placeholder policy
    pub fn unsupported(&self) -> &[UnsupportedField] {
        &self.unsupported
    }
}

/// Where an authored form is
#[derive(Debug, Clone, Default)]
pub enum FormLifecycle {
    #[default]
    Empty,
    Drafting(FormBuilder),
    Ready(ReadyForm),
    Persisted(PublishedForm),
}

impl FormLifecycle {
    pub fn new() -> Self {
        Self::Empty
    }

    pub fn state_name(&self) -> &'static str {
        match self {
            FormLifecycle::Empty => "empty",
            FormLifecycle::Drafting(_) => "drafting",
            FormLifecycle::Ready(_) => "ready",
            FormLifecycle::Persisted(_) => "persisted",
        }
    }

    fn invalid(&self, action: &str) -> FormError {
        FormError::InvalidTransition(format!("cannot {} while {}", action, self.state_name()))
    }

    fn enter(&mut self, next: FormLifecycle) {
        tracing::info!(from = self.state_name(), to = next.state_name(), "form lifecycle transition");
        *self = next;
    }

    /// Empty → Drafting with a fresh definition
    pub fn start(&mut self, title: impl Into<String>, config: FormdefConfig) -> Result<()> {
        match self {
            FormLifecycle::Empty => {
                self.enter(FormLifecycle::Drafting(FormBuilder::new(title, config)));
                Ok(())
            }
            _ => Err(self.invalid("start a draft")),
        }
    }

    /// Empty → Drafting with an existing definition
    pub fn open(&mut self, form: FormDefinition, config: FormdefConfig) -> Result<()> {
        match self {
            FormLifecycle::Empty => {
                self.enter(FormLifecycle::Drafting(FormBuilder::from_definition(form, config)));
                Ok(())
            }
            _ => Err(self.invalid("open a definition")),
        }
    }

    /// The draft being edited
    pub fn builder(&mut self) -> Result<&mut FormBuilder> {
        let state = self.state_name();
        match self {
            FormLifecycle::Drafting(builder) => Ok(builder),
            _ => Err(FormError::InvalidTransition(format!("cannot edit while {}", state))),
        }
    }

    /// Drafting → Ready when the definition is complete; stays Drafting otherwise
    pub fn mark_ready(&mut self) -> Result<()> {
        let ready = match self {
            FormLifecycle::Drafting(builder) => builder.ready()?,
            _ => return Err(self.invalid("mark ready")),
        };
        self.enter(FormLifecycle::Ready(ready));
        Ok(())
    }

    /// Ready → Drafting
    pub fn reopen(&mut self) -> Result<()> {
        match std::mem::take(self) {
            FormLifecycle::Ready(ready) => {
                self.enter(FormLifecycle::Drafting(ready.into_builder()));
                Ok(())
            }
            other => {
                *self = other;
                Err(self.invalid("reopen"))
            }
        }
    }

    /// Ready → Persisted. On a store failure the form stays Ready.
    pub async fn persist(&mut self, store: &dyn FormStore, author: &AuthorContext) -> Result<()> {
        let ready = match self {
            FormLifecycle::Ready(ready) => ready.clone(),
            _ => return Err(self.invalid("persist")),
        };

        let document = encode(ready.definition(), author);
        if let Err(err) = store.save(&document).await {
            tracing::warn!(form = %ready.definition().id, error = %err, "saving form failed");
            return Err(err.into());
        }

        let published = PublishedForm::new(ready.shared(), author.user_id.clone(), Vec::new());
        self.enter(FormLifecycle::Persisted(published));
        Ok(())
    }

    pub fn published(&self) -> Option<&PublishedForm> {
        match self {
            FormLifecycle::Persisted(published) => Some(published),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryFormStore;
    use crate::ports::GatewayError;
    use async_trait::async_trait;
    use formdef_core::{FieldType, FormTarget};
    use formdef_wire::PersistedForm;

    struct DownStore;

    #[async_trait]
    impl FormStore for DownStore {
        async fn save(&self, _form: &PersistedForm) -> std::result::Result<String, GatewayError> {
            Err(GatewayError::Unavailable("backend down".into()))
        }

        async fn fetch(&self, _id: &str) -> std::result::Result<Option<PersistedForm>, GatewayError> {
            Ok(None)
        }

        async fn list_for_target(
            &self,
            _target: &FormTarget,
        ) -> std::result::Result<Vec<PersistedForm>, GatewayError> {
            Ok(Vec::new())
        }
    }

    fn drafted() -> FormLifecycle {
        let mut lifecycle = FormLifecycle::new();
        lifecycle.start("Feedback", FormdefConfig::default()).unwrap();
        lifecycle.builder().unwrap().add_field(FieldType::Text).unwrap();
        lifecycle
    }

    #[test]
    fn test_incomplete_draft_stays_drafting() {
        let mut lifecycle = FormLifecycle::new();
        lifecycle.start("Feedback", FormdefConfig::default()).unwrap();
        let err = lifecycle.mark_ready().unwrap_err();
        assert_eq!(err, FormError::Incomplete("fields is empty".into()));
        assert_eq!(lifecycle.state_name(), "drafting");
    }

    #[test]
    fn test_transitions_out_of_order_are_rejected() {
        let mut lifecycle = FormLifecycle::new();
        assert!(matches!(lifecycle.mark_ready(), Err(FormError::InvalidTransition(_))));
        assert!(matches!(lifecycle.reopen(), Err(FormError::InvalidTransition(_))));
        assert_eq!(lifecycle.state_name(), "empty");

        let mut lifecycle = drafted();
        assert!(lifecycle.start("Again", FormdefConfig::default()).is_err());
    }

    #[test]
    fn test_reopen_returns_to_drafting() {
        let mut lifecycle = drafted();
        lifecycle.mark_ready().unwrap();
        assert!(lifecycle.builder().is_err());
        lifecycle.reopen().unwrap();
        assert_eq!(lifecycle.builder().unwrap().field_count(), 1);
    }

    #[tokio::test]
    async fn test_persist_then_load() {
        let store = InMemoryFormStore::new();
        let mut lifecycle = drafted();
        let author = AuthorContext::new("admin-1");

        assert!(lifecycle.persist(&store, &author).await.is_err());
        lifecycle.mark_ready().unwrap();
        lifecycle.persist(&store, &author).await.unwrap();

        let published = lifecycle.published().unwrap();
        assert_eq!(published.created_by(), "admin-1");

        let loaded = PublishedForm::load(&store, &published.definition().id, &FormdefConfig::default())
            .await
            .unwrap();
        assert_eq!(loaded.definition(), published.definition());
        assert_eq!(loaded.fingerprint(), published.fingerprint());
    }

    #[tokio::test]
    async fn test_store_failure_keeps_ready() {
        let mut lifecycle = drafted();
        lifecycle.mark_ready().unwrap();
        let err = lifecycle
            .persist(&DownStore, &AuthorContext::new("admin-1"))
            .await
            .unwrap_err();
        assert!(matches!(err, FormError::Port(_)));
        assert_eq!(lifecycle.state_name(), "ready");
    }

    #[tokio::test]
    async fn test_load_missing_form() {
        let store = InMemoryFormStore::new();
        assert!(PublishedForm::load(&store, "nope", &FormdefConfig::default())
            .await
            .is_err());
    }
}
