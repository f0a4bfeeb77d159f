//! Author context: who is building or filling a form
//!
//! Passed explicitly into persistence and submission calls so that
//! `createdBy` / `submittedBy` never come from ambient session state.

/// Identity stamped onto persisted documents and submissions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorContext {
    pub user_id: String,
    pub role: Option<String>,
    pub tenant: Option<String>,
    /// Correlates log lines of one builder or viewer session
    pub trace_id: String,
}

impl AuthorContext {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            role: None,
            tenant: None,
            trace_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant = Some(tenant.into());
        self
    }
}
