//! Outbound ports
//!
//! Interfaces the host application implements against its backend.

use async_trait::async_trait;
use formdef_core::{FormError, FormTarget};
use formdef_wire::{PersistedForm, SubmissionPayload};
use thiserror::Error;

use crate::progress::ProgressSnapshot;

/// Failure reported by a port
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    #[error("PORT/UNAVAILABLE: {0}")]
    Unavailable(String),

    #[error("PORT/REJECTED: {0}")]
    Rejected(String),

    #[error("PORT/NOT_FOUND: {0}")]
    NotFound(String),
}

impl From<GatewayError> for FormError {
    fn from(err: GatewayError) -> Self {
        let detail = match err {
            GatewayError::Unavailable(m) => format!("UNAVAILABLE: {}", m),
            GatewayError::Rejected(m) => format!("REJECTED: {}", m),
            GatewayError::NotFound(m) => format!("NOT_FOUND: {}", m),
        };
        FormError::Port(detail)
    }
}

/// Form definition storage
#[async_trait]
pub trait FormStore: Send + Sync {
    /// Insert or replace the whole document; returns its id
    async fn save(&self, form: &PersistedForm) -> Result<String, GatewayError>;

    async fn fetch(&self, form_id: &str) -> Result<Option<PersistedForm>, GatewayError>;

    /// Forms bound to a stage or category
    async fn list_for_target(&self, target: &FormTarget) -> Result<Vec<PersistedForm>, GatewayError>;
}

/// Submission endpoint
#[async_trait]
pub trait SubmissionGateway: Send + Sync {
    async fn submit(&self, payload: &SubmissionPayload) -> Result<(), GatewayError>;
}

/// Saved in-progress values, keyed by form id
#[async_trait]
pub trait ProgressStore: Send + Sync {
    async fn save(&self, snapshot: &ProgressSnapshot) -> Result<(), GatewayError>;

    async fn load(&self, form_id: &str) -> Result<Option<ProgressSnapshot>, GatewayError>;

    async fn clear(&self, form_id: &str) -> Result<(), GatewayError>;
}
