//! Form builder
use std::sync::Arc;

use formdef_core::{
    FieldDefinition, FormDefinition, FormError, FormSettings, FormTarget, FormdefConfig, Result,
};
use formdef_validate::{check_complete, Completeness};

use crate::patch::{Direction, FieldPatch, FieldSeed};

/// Exclusive editor of one form definition
#[derive(Debug, Clone)]
pub struct FormBuilder {
    form: Arc<FormDefinition>,
    config: FormdefConfig,
}

impl FormBuilder {
    /// Empty draft
    pub fn new(title: impl Into<String>, config: FormdefConfig) -> Self {
        Self {
            form: Arc::new(FormDefinition::new(title)),
            config,
        }
    }

    /// Re-open a persisted definition: fields sorted by `order` (stable) and
    /// renumbered 1..N, invariants re-applied
    pub fn from_definition(mut form: FormDefinition, config: FormdefConfig) -> Self {
        form.sort_fields();
        form.renumber();
        for field in &mut form.fields {
            field.enforce_invariants();
        }
        tracing::debug!(form = %form.id, fields = form.fields.len(), "definition reopened");
        Self {
            form: Arc::new(form),
            config,
        }
    }

    pub fn form(&self) -> &FormDefinition {
        &self.form
    }

    pub fn config(&self) -> &FormdefConfig {
        &self.config
    }

    /// Shared immutable view; unaffected by later edits
    pub fn snapshot(&self) -> Arc<FormDefinition> {
        Arc::clone(&self.form)
    }

    pub fn into_definition(self) -> FormDefinition {
        Arc::try_unwrap(self.form).unwrap_or_else(|shared| (*shared).clone())
    }

    pub fn field_count(&self) -> usize {
        self.form.fields.len()
    }

    /// Fields that can still be added, `None` when uncapped
    pub fn remaining_capacity(&self) -> Option<usize> {
        self.config
            .field_cap
            .map(|cap| cap.saturating_sub(self.field_count()))
    }

    fn edit(&mut self) -> &mut FormDefinition {
        Arc::make_mut(&mut self.form)
    }

    fn ensure_capacity(&self) -> Result<()> {
        match self.config.field_cap {
            Some(cap) if self.field_count() >= cap => {
                tracing::debug!(form = %self.form.id, cap, "field cap reached");
                Err(FormError::FieldCapReached { cap })
            }
            _ => Ok(()),
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.edit().title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.edit().description = description.into();
    }

    pub fn set_target(&mut self, target: FormTarget) {
        self.edit().target = target;
    }

    pub fn set_settings(&mut self, settings: FormSettings) {
        self.edit().settings = settings;
    }

    /// Append a field from a template or bare type. Rejected at the cap.
    pub fn add_field<'a>(&mut self, seed: impl Into<FieldSeed<'a>>) -> Result<FieldDefinition> {
        self.ensure_capacity()?;

        let order = self.field_count() as u32 + 1;
        let field = seed.into().instantiate().with_order(order);
        tracing::debug!(form = %self.form.id, field = %field.id, kind = %field.field_type, order, "field added");

        self.edit().fields.push(field.clone());
        Ok(field)
    }

    /// Merge a partial update. Returns false (and changes nothing) for an unknown id.
    pub fn update_field(&mut self, field_id: &str, patch: FieldPatch) -> bool {
        if self.form.field(field_id).is_none() {
            tracing::debug!(form = %self.form.id, field = field_id, "update of unknown field ignored");
            return false;
        }
        if let Some(field) = self.edit().field_mut(field_id) {
            patch.apply_to(field);
        }
        tracing::debug!(form = %self.form.id, field = field_id, "field updated");
        true
    }

    /// Remove a field and renumber the rest
    pub fn remove_field(&mut self, field_id: &str) -> Option<FieldDefinition> {
        let position = self.form.position(field_id)?;
        let form = self.edit();
        let removed = form.fields.remove(position);
        form.renumber();
        tracing::debug!(form = %form.id, field = field_id, remaining = form.fields.len(), "field removed");
        Some(removed)
    }

    /// Swap with the neighbour. False at the boundaries or for an unknown id.
    pub fn move_field(&mut self, field_id: &str, direction: Direction) -> bool {
        let Some(position) = self.form.position(field_id) else {
            return false;
        };
        let neighbour = match direction {
            Direction::Up if position > 0 => position - 1,
            Direction::Down if position + 1 < self.field_count() => position + 1,
            _ => return false,
        };

        let form = self.edit();
        form.fields.swap(position, neighbour);
        form.renumber();
        tracing::debug!(form = %form.id, field = field_id, ?direction, "field moved");
        true
    }

    /// Deep copy with a new id and `" (Copy)"` label, appended at the end.
    /// `Ok(None)` for an unknown id; rejected at the cap.
    pub fn duplicate_field(&mut self, field_id: &str) -> Result<Option<FieldDefinition>> {
        let Some(original) = self.form.field(field_id) else {
            return Ok(None);
        };
        let mut copy = original.clone();
        self.ensure_capacity()?;

        copy.id = uuid::Uuid::new_v4().to_string();
        copy.label = format!("{} (Copy)", copy.label);
        copy.order = self.field_count() as u32 + 1;
        tracing::debug!(form = %self.form.id, from = field_id, field = %copy.id, "field duplicated");

        self.edit().fields.push(copy.clone());
        Ok(Some(copy))
    }

    pub fn validate_form_complete(&self) -> Completeness {
        check_complete(&self.form)
    }

    /// Promote to a publishable form if complete
    pub fn ready(&self) -> Result<ReadyForm> {
        let completeness = self.validate_form_complete();
        if !completeness.ok {
            let reason = completeness.reason.unwrap_or_default();
            return Err(FormError::Incomplete(reason));
        }
        Ok(ReadyForm {
            form: self.snapshot(),
            config: self.config.clone(),
        })
    }
}

/// A definition that passed the completeness check
#[derive(Debug, Clone, PartialEq)]
pub struct ReadyForm {
    form: Arc<FormDefinition>,
    config: FormdefConfig,
}

impl ReadyForm {
    pub fn definition(&self) -> &FormDefinition {
        &self.form
    }

    pub fn shared(&self) -> Arc<FormDefinition> {
        Arc::clone(&self.form)
    }

    pub fn config(&self) -> &FormdefConfig {
        &self.config
    }

    /// Back to editing
    pub fn into_builder(self) -> FormBuilder {
        FormBuilder {
            form: self.form,
            config: self.config,
        }
    }
}
