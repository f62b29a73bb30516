//! Error types for the supervisor

use shack_catalog::DaemonKind;
use thiserror::Error;

/// Errors from daemon start requests.
///
/// A rejected start leaves the daemon exactly as it was; none of these
/// indicate an ambiguous state.
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// A process for this kind is already running
    #[error("{0} daemon is already running")]
    AlreadyRunning(DaemonKind),

    /// No installed executable for this kind
    #[error("{0} daemon executable not found")]
    ExecutableNotFound(DaemonKind),

    /// The process could not be spawned
    #[error("failed to start {kind} daemon: {source}")]
    Spawn {
        kind: DaemonKind,
        #[source]
        source: std::io::Error,
    },
}
