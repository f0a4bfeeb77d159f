//! Fill sessions: values, live validation and submission for one form
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use formdef_core::{
    FieldDefinition, FieldValue, FormDefinition, FormError, FormdefConfig, Result,
    SubmissionValueMap, ValidationErrorMap,
};
use formdef_transform::{commit_input, transform_input, AffixSelection};
use formdef_validate::{Progress, Validator};
use formdef_wire::{SubmissionPayload, SubmissionSubject};

use crate::lifecycle::PublishedForm;
use crate::ports::{GatewayError, ProgressStore, SubmissionGateway};
use crate::progress::ProgressSnapshot;

/// Where a fill session is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FillPhase {
    Filling,
    Validating,
    Submitted { at: DateTime<Utc> },
    SubmissionFailed { message: String },
}

impl FillPhase {
    pub fn name(&self) -> &'static str {
        match self {
            FillPhase::Filling => "filling",
            FillPhase::Validating => "validating",
            FillPhase::Submitted { .. } => "submitted",
            FillPhase::SubmissionFailed { .. } => "submission_failed",
        }
    }

    fn accepts_input(&self) -> bool {
        matches!(self, FillPhase::Filling | FillPhase::SubmissionFailed { .. })
    }
}

/// Puts the phase back to `Filling` if a submit is dropped mid-flight
struct InFlight<'a> {
    phase: &'a mut FillPhase,
    form_id: &'a str,
}

impl InFlight<'_> {
    fn land(self) {
        std::mem::forget(self);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        tracing::warn!(form = self.form_id, "submission abandoned in flight, back to filling");
        *self.phase = FillPhase::Filling;
    }
}

/// Result of a submit attempt
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Delivered; the payload that was sent
    Submitted(SubmissionPayload),
    /// Blocked by validation; back to filling with these errors
    Invalid(ValidationErrorMap),
    /// The gateway refused or was unreachable; retry is allowed
    Failed(GatewayError),
}

/// Values being entered into one published form
pub struct FillSession {
    form: Arc<FormDefinition>,
    fingerprint: String,
    config: FormdefConfig,
    subject: SubmissionSubject,
    gateway: Arc<dyn SubmissionGateway>,
    progress_store: Option<Arc<dyn ProgressStore>>,
    validator: Validator,
    values: SubmissionValueMap,
    raw: BTreeMap<String, String>,
    selections: BTreeMap<String, AffixSelection>,
    errors: ValidationErrorMap,
    touched: BTreeSet<String>,
    phase: FillPhase,
}

impl FillSession {
    /// Start filling a stored definition. Drafts cannot be filled.
    pub fn new(
        published: &PublishedForm,
        subject: SubmissionSubject,
        config: FormdefConfig,
        gateway: Arc<dyn SubmissionGateway>,
    ) -> Self {
        Self {
            form: published.shared(),
            fingerprint: published.fingerprint().to_string(),
            config,
            subject,
            gateway,
            progress_store: None,
            validator: Validator::new(),
            values: SubmissionValueMap::new(),
            raw: BTreeMap::new(),
            selections: BTreeMap::new(),
            errors: ValidationErrorMap::new(),
            touched: BTreeSet::new(),
            phase: FillPhase::Filling,
        }
    }

    /// Enable save/resume of in-progress values
    pub fn with_progress_store(mut self, store: Arc<dyn ProgressStore>) -> Self {
        self.progress_store = Some(store);
        self
    }

    pub fn form(&self) -> &FormDefinition {
        &self.form
    }

    pub fn phase(&self) -> &FillPhase {
        &self.phase
    }

    pub fn values(&self) -> &SubmissionValueMap {
        &self.values
    }

    pub fn errors(&self) -> &ValidationErrorMap {
        &self.errors
    }

    pub fn selections(&self) -> &BTreeMap<String, AffixSelection> {
        &self.selections
    }

    pub fn progress(&self) -> Progress {
        Progress::measure(&self.form, &self.values, self.config.empty_progress)
    }

    fn set_phase(&mut self, next: FillPhase) {
        tracing::info!(form = %self.form.id, from = self.phase.name(), to = next.name(), "fill phase transition");
        self.phase = next;
    }

    fn ensure_accepts_input(&mut self) -> Result<()> {
        if !self.phase.accepts_input() {
            return Err(FormError::InvalidTransition(format!(
                "cannot edit values while {}",
                self.phase.name()
            )));
        }
        if matches!(self.phase, FillPhase::SubmissionFailed { .. }) {
            self.set_phase(FillPhase::Filling);
        }
        Ok(())
    }

    fn field(&self, field_id: &str) -> Result<FieldDefinition> {
        self.form
            .field(field_id)
            .cloned()
            .ok_or_else(|| FormError::FieldNotFound(field_id.to_string()))
    }

    fn touch(&mut self, field: &FieldDefinition) {
        self.touched.insert(field.id.clone());
        self.validator
            .revalidate_field(field, &self.values, &mut self.errors);
    }

    /// Typed text for a field. Text-like fields run the keystroke pipeline;
    /// the stored value is returned.
    pub fn input(&mut self, field_id: &str, raw: &str) -> Result<FieldValue> {
        self.ensure_accepts_input()?;
        let field = self.field(field_id)?;

        let stored = if field.field_type.is_text_like() {
            let selection = self.selections.get(field_id).cloned().unwrap_or_default();
            self.raw.insert(field.id.clone(), raw.to_string());
            transform_input(&field, raw, &selection)
        } else {
            raw.to_string()
        };

        let value = FieldValue::Text(stored);
        self.values.insert(field.id.clone(), value.clone());
        self.touch(&field);
        Ok(value)
    }

    /// Toggles, option lists and other structured values, stored as given
    pub fn set_value(&mut self, field_id: &str, value: FieldValue) -> Result<()> {
        self.ensure_accepts_input()?;
        let field = self.field(field_id)?;
        self.raw.remove(field_id);
        self.values.insert(field.id.clone(), value);
        self.touch(&field);
        Ok(())
    }

    pub fn clear_value(&mut self, field_id: &str) -> Result<()> {
        self.ensure_accepts_input()?;
        let field = self.field(field_id)?;
        self.raw.remove(field_id);
        self.values.remove(field_id);
        self.touch(&field);
        Ok(())
    }

    /// Choose a prefix from the field's dropdown and recompose its value
    pub fn select_prefix(&mut self, field_id: &str, prefix: impl Into<String>) -> Result<()> {
        let prefix = prefix.into();
        self.change_selection(field_id, |selection| selection.prefix = Some(prefix))
    }

    /// Choose a suffix from the field's dropdown and recompose its value
    pub fn select_suffix(&mut self, field_id: &str, suffix: impl Into<String>) -> Result<()> {
        let suffix = suffix.into();
        self.change_selection(field_id, |selection| selection.suffix = Some(suffix))
    }

    fn change_selection(&mut self, field_id: &str, update: impl FnOnce(&mut AffixSelection)) -> Result<()> {
        self.ensure_accepts_input()?;
        let field = self.field(field_id)?;
        let selection = self.selections.entry(field.id.clone()).or_default();
        update(selection);
        let selection = selection.clone();

        if let Some(raw) = self.raw.get(field_id) {
            let stored = transform_input(&field, raw, &selection);
            self.values.insert(field.id.clone(), FieldValue::Text(stored));
            self.touch(&field);
        }
        Ok(())
    }

    // case transforms declared for commit run once, over what was typed
    fn commit_values(&mut self) {
        for (field_id, raw) in &self.raw {
            let Some(field) = self.form.field(field_id) else {
                continue;
            };
            let selection = self.selections.get(field_id).cloned().unwrap_or_default();
            let committed = commit_input(field, raw, &selection);
            self.values.insert(field_id.clone(), FieldValue::Text(committed));
        }
    }

    /// Validate everything and, when clean, hand the payload to the gateway.
    ///
    /// Takes `&mut self` for the whole attempt, so a second submit cannot
    /// start while one is in flight. Dropping the future during the gateway
    /// call leaves the session filling, values intact.
    pub async fn submit(&mut self) -> Result<SubmitOutcome> {
        if !self.phase.accepts_input() {
            return Err(FormError::InvalidTransition(format!(
                "cannot submit while {}",
                self.phase.name()
            )));
        }
        self.set_phase(FillPhase::Validating);

        self.commit_values();
        self.errors = self.validator.validate(&self.form, &self.values);
        self.touched = self.form.fields.iter().map(|f| f.id.clone()).collect();
        if !self.errors.is_empty() {
            self.set_phase(FillPhase::Filling);
            return Ok(SubmitOutcome::Invalid(self.errors.clone()));
        }

        let at = Utc::now();
        let payload = SubmissionPayload::new(self.form.id.clone(), &self.subject, self.values.clone(), at);
        let gateway = Arc::clone(&self.gateway);
        let in_flight = InFlight {
            phase: &mut self.phase,
            form_id: &self.form.id,
        };
        let delivered = gateway.submit(&payload).await;
        in_flight.land();

        match delivered {
            Ok(()) => {
                self.set_phase(FillPhase::Submitted { at });
                if let Err(err) = self.clear_progress().await {
                    tracing::warn!(form = %self.form.id, error = %err, "clearing saved progress failed");
                }
                Ok(SubmitOutcome::Submitted(payload))
            }
            Err(err) => {
                tracing::warn!(form = %self.form.id, error = %err, "submission failed");
                let message = self.form.settings.error_message.clone();
                self.set_phase(FillPhase::SubmissionFailed { message });
                Ok(SubmitOutcome::Failed(err))
            }
        }
    }

    /// Clear values and return to filling
    pub fn reset(&mut self) {
        self.values.clear();
        self.raw.clear();
        self.selections.clear();
        self.errors.clear();
        self.touched.clear();
        self.set_phase(FillPhase::Filling);
    }

    /// After a successful submit, wait the configured delay, then reset
    pub async fn auto_reset(&mut self) -> Result<()> {
        if !matches!(self.phase, FillPhase::Submitted { .. }) {
            return Err(FormError::InvalidTransition(format!(
                "cannot auto-reset while {}",
                self.phase.name()
            )));
        }
        tokio::time::sleep(self.config.reset_delay()).await;
        self.reset();
        Ok(())
    }

    /// Store the current values. `false` when the form does not allow
    /// saving or no store is attached.
    pub async fn save_progress(&self) -> Result<bool> {
        let Some(store) = self.progress_store.as_ref() else {
            return Ok(false);
        };
        if !self.form.settings.allow_save_progress {
            return Ok(false);
        }

        let snapshot = ProgressSnapshot {
            form_id: self.form.id.clone(),
            fingerprint: self.fingerprint.clone(),
            values: self.values.clone(),
            raw: self.raw.clone(),
            selections: self.selections.clone(),
            saved_at: Utc::now(),
        };
        store.save(&snapshot).await?;
        tracing::debug!(form = %self.form.id, values = snapshot.values.len(), "progress saved");
        Ok(true)
    }

    /// Restore saved values. A snapshot taken against a different version
    /// of the definition is discarded. Returns whether anything was restored.
    pub async fn resume(&mut self) -> Result<bool> {
        self.ensure_accepts_input()?;
        let Some(store) = self.progress_store.clone() else {
            return Ok(false);
        };
        let Some(snapshot) = store.load(&self.form.id).await? else {
            return Ok(false);
        };

        if !snapshot.matches(&self.fingerprint) {
            tracing::warn!(form = %self.form.id, "saved progress is for another version of the form, discarding");
            store.clear(&self.form.id).await?;
            return Ok(false);
        }

        self.values = snapshot.values;
        self.raw = snapshot.raw;
        self.selections = snapshot.selections;
        self.errors.clear();
        self.touched.clear();
        let restored: Vec<FieldDefinition> = self
            .form
            .fields
            .iter()
            .filter(|f| self.values.contains_key(&f.id))
            .cloned()
            .collect();
        for field in &restored {
            self.touch(field);
        }
        tracing::debug!(form = %self.form.id, values = self.values.len(), "progress restored");
        Ok(true)
    }

    async fn clear_progress(&self) -> std::result::Result<(), GatewayError> {
        match self.progress_store.as_ref() {
            Some(store) => store.clear(&self.form.id).await,
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{InMemoryProgressStore, InMemorySubmissionGateway};
    use formdef_core::{
        CaseTransform, Customization, FieldOption, FieldType, InputHelper, Transformation,
    };

    fn publish(form: FormDefinition) -> PublishedForm {
        PublishedForm::new(Arc::new(form), "admin-1".to_string(), Vec::new())
    }

    struct Fixture {
        session: FillSession,
        gateway: Arc<InMemorySubmissionGateway>,
        name: String,
        email: String,
        budget: String,
    }

    fn fixture() -> Fixture {
        let mut form = FormDefinition::new("Lead capture");
        let name = FieldDefinition::new(FieldType::Text, "Name")
            .required()
            .with_customization(Customization {
                transformation: Some(Transformation {
                    kind: CaseTransform::TitleCase,
                    apply_on_input: false,
                }),
                ..Customization::default()
            })
            .with_order(1);
        let email = FieldDefinition::new(FieldType::Email, "Email").with_order(2);
        let budget = FieldDefinition::new(FieldType::Currency, "Budget")
            .with_customization(Customization {
                input_helper: Some(InputHelper {
                    show_prefix_dropdown: true,
                    prefix_options: vec!["$".into(), "€".into()],
                    ..InputHelper::default()
                }),
                ..Customization::default()
            })
            .with_order(3);
        let ids = (name.id.clone(), email.id.clone(), budget.id.clone());
        form.fields.extend([name, email, budget]);
        form.settings.allow_save_progress = true;

        let gateway = Arc::new(InMemorySubmissionGateway::new());
        let config = FormdefConfig {
            reset_delay_ms: 5,
            ..FormdefConfig::sales()
        };
        let session = FillSession::new(
            &publish(form),
            SubmissionSubject::Lead("lead-1".into()),
            config,
            gateway.clone(),
        );
        Fixture {
            session,
            gateway,
            name: ids.0,
            email: ids.1,
            budget: ids.2,
        }
    }

    #[test]
    fn test_input_applies_pipeline_and_revalidates() {
        let mut f = fixture();
        let stored = f.session.input(&f.budget, "50").unwrap();
        assert_eq!(stored, FieldValue::from("$50"));

        f.session.input(&f.email, "not-an-email").unwrap();
        assert_eq!(f.session.errors()[&f.email], "Please enter a valid email address");
        // untouched required field is not flagged yet
        assert!(!f.session.errors().contains_key(&f.name));

        f.session.input(&f.email, "ada@example.com").unwrap();
        assert!(f.session.errors().is_empty());
    }

    #[test]
    fn test_prefix_selection_recomposes() {
        let mut f = fixture();
        f.session.input(&f.budget, "50").unwrap();
        f.session.select_prefix(&f.budget, "€").unwrap();
        assert_eq!(f.session.values()[&f.budget], FieldValue::from("€50"));
    }

    #[test]
    fn test_unknown_field() {
        let mut f = fixture();
        assert_eq!(
            f.session.input("nope", "x").unwrap_err(),
            FormError::FieldNotFound("nope".into())
        );
    }

    #[tokio::test]
    async fn test_invalid_submit_returns_errors_and_keeps_filling() {
        let mut f = fixture();
        let outcome = f.session.submit().await.unwrap();
        match outcome {
            SubmitOutcome::Invalid(errors) => assert_eq!(errors[&f.name], "Name is required"),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(f.session.phase(), &FillPhase::Filling);
        assert!(f.gateway.submitted().await.is_empty());
    }

    #[tokio::test]
    async fn test_submit_applies_commit_transform() {
        let mut f = fixture();
        f.session.input(&f.name, "ada LOVELACE").unwrap();
        assert_eq!(f.session.values()[&f.name], FieldValue::from("ada LOVELACE"));

        let outcome = f.session.submit().await.unwrap();
        let SubmitOutcome::Submitted(payload) = outcome else {
            panic!("expected submission");
        };
        assert_eq!(payload.form_data[&f.name], FieldValue::from("Ada Lovelace"));
        assert_eq!(payload.lead_id.as_deref(), Some("lead-1"));
        assert!(matches!(f.session.phase(), FillPhase::Submitted { .. }));

        assert!(f.session.input(&f.name, "again").is_err());
        assert!(f.session.submit().await.is_err());

        f.session.auto_reset().await.unwrap();
        assert_eq!(f.session.phase(), &FillPhase::Filling);
        assert!(f.session.values().is_empty());
    }

    #[tokio::test]
    async fn test_gateway_failure_is_retryable() {
        let mut f = fixture();
        f.session.input(&f.name, "Ada").unwrap();
        f.gateway
            .fail_next(GatewayError::Unavailable("timeout".into()))
            .await;

        let outcome = f.session.submit().await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Failed(GatewayError::Unavailable(_))));
        assert_eq!(
            f.session.phase(),
            &FillPhase::SubmissionFailed {
                message: "There was an error submitting the form. Please try again.".into()
            }
        );
        assert_eq!(f.session.values()[&f.name], FieldValue::from("Ada"));

        let outcome = f.session.submit().await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Submitted(_)));
        assert_eq!(f.gateway.submitted().await.len(), 1);
    }

    struct StalledGateway;

    #[async_trait::async_trait]
    impl SubmissionGateway for StalledGateway {
        async fn submit(&self, _payload: &SubmissionPayload) -> std::result::Result<(), GatewayError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_abandoned_submit_returns_to_filling() {
        let mut f = fixture();
        f.session.gateway = Arc::new(StalledGateway);
        f.session.input(&f.name, "Ada").unwrap();

        let timed_out = tokio::time::timeout(std::time::Duration::from_millis(10), f.session.submit()).await;
        assert!(timed_out.is_err());
        assert_eq!(f.session.phase(), &FillPhase::Filling);
        assert_eq!(f.session.values()[&f.name], FieldValue::from("Ada"));
        assert!(f.session.input(&f.name, "Ada L").is_ok());
    }

    #[tokio::test]
    async fn test_auto_reset_requires_submitted() {
        let mut f = fixture();
        assert!(f.session.auto_reset().await.is_err());
    }

    #[tokio::test]
    async fn test_save_and_resume() {
        let store = Arc::new(InMemoryProgressStore::new());
        let mut f = fixture();
        let published = publish(f.session.form().clone());
        f.session = FillSession::new(
            &published,
            SubmissionSubject::Lead("lead-1".into()),
            FormdefConfig::sales(),
            f.gateway.clone(),
        )
        .with_progress_store(store.clone());

        f.session.input(&f.budget, "75").unwrap();
        f.session.select_prefix(&f.budget, "€").unwrap();
        f.session.set_value(&f.email, FieldValue::from("bad")).unwrap();
        assert!(f.session.save_progress().await.unwrap());

        let mut resumed = FillSession::new(
            &published,
            SubmissionSubject::Lead("lead-1".into()),
            FormdefConfig::sales(),
            f.gateway.clone(),
        )
        .with_progress_store(store.clone());
        assert!(resumed.resume().await.unwrap());
        assert_eq!(resumed.values()[&f.budget], FieldValue::from("€75"));
        assert!(resumed.errors().contains_key(&f.email));

        resumed.select_prefix(&f.budget, "$").unwrap();
        assert_eq!(resumed.values()[&f.budget], FieldValue::from("$75"));
    }

    #[tokio::test]
    async fn test_resume_discards_stale_snapshot() {
        let store = Arc::new(InMemoryProgressStore::new());
        let f = fixture();
        let original = f.session.form().clone();

        let mut session = FillSession::new(
            &publish(original.clone()),
            SubmissionSubject::None,
            FormdefConfig::default(),
            f.gateway.clone(),
        )
        .with_progress_store(store.clone());
        session.input(&f.email, "ada@example.com").unwrap();
        session.save_progress().await.unwrap();

        let mut changed = original;
        changed.fields.push(
            FieldDefinition::new(FieldType::Radio, "Size")
                .with_options(vec![FieldOption::plain("S")])
                .with_order(4),
        );
        let mut session = FillSession::new(
            &publish(changed),
            SubmissionSubject::None,
            FormdefConfig::default(),
            f.gateway.clone(),
        )
        .with_progress_store(store.clone());

        assert!(!session.resume().await.unwrap());
        assert!(session.values().is_empty());
        assert!(store.load(&session.form().id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_progress_respects_setting() {
        let store = Arc::new(InMemoryProgressStore::new());
        let f = fixture();
        let mut form = f.session.form().clone();
        form.settings.allow_save_progress = false;
        let session = FillSession::new(
            &publish(form),
            SubmissionSubject::None,
            FormdefConfig::default(),
            f.gateway.clone(),
        )
        .with_progress_store(store);
        assert!(!session.save_progress().await.unwrap());
    }
}
