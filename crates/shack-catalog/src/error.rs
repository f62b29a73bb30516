//! Error types for catalog probes

use std::time::Duration;

use thiserror::Error;

use crate::kind::DaemonKind;

/// Errors from capability probes.
///
/// These degrade to an empty model list plus a notification at the caller;
/// they are never fatal to anything else the system is doing.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The daemon executable is not installed
    #[error("{0} daemon executable not found")]
    ExecutableNotFound(DaemonKind),

    /// The probe exceeded its time budget
    #[error("{kind} capability probe timed out after {budget:?}")]
    ProbeTimeout { kind: DaemonKind, budget: Duration },

    /// The probe process could not be run
    #[error("{kind} capability probe failed: {reason}")]
    ProbeFailed { kind: DaemonKind, reason: String },
}
