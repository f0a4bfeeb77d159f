//! Formdef Session: from draft to submitted values
//!
//! Authoring moves through [`FormLifecycle`]:
//!
//! ```text
//! Empty → Drafting → Ready → Persisted
//! ```
//!
//! Filling a persisted form happens in a [`FillSession`]:
//!
//! ```text
//! Filling → Validating → Submitted | SubmissionFailed
//!    ↑                       │
//!    └──────── reset ────────┘
//! ```
//!
//! The backend is reached only through the [`ports`] traits; in-memory
//! implementations live in [`memory`].

pub mod fill;
pub mod lifecycle;
pub mod memory;
pub mod ports;
pub mod progress;

pub use fill::{FillPhase, FillSession, SubmitOutcome};
pub use lifecycle::{FormLifecycle, PublishedForm};
pub use memory::{InMemoryFormStore, InMemoryProgressStore, InMemorySubmissionGateway};
pub use ports::{FormStore, GatewayError, ProgressStore, SubmissionGateway};
pub use progress::ProgressSnapshot;
