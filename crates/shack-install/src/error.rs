//! Error types for release installation

use thiserror::Error;

/// Errors that can occur while installing a release
///
/// Each maps to one step of the install sequence and is terminal for that
/// attempt; the caller decides whether to retry.
#[derive(Debug, Error)]
pub enum InstallError {
    /// The release feed could not be queried
    #[error("release feed unavailable: {0}")]
    FeedUnavailable(String),

    /// The release descriptor carries no downloadable archive
    #[error("release has no downloadable archive asset")]
    NoAsset,

    /// The asset download failed or was cut short
    #[error("download failed: {0}")]
    Download(String),

    /// The archive could not be extracted over the installation root
    #[error("extract failed: {0}")]
    Extract(String),

    /// Extraction reported success but no daemon executable turned up
    #[error("no daemon executable found after extraction")]
    VerificationFailed,

    /// Another install on this installer is still in flight
    #[error("an install is already in progress")]
    InstallInProgress,

    /// Filesystem error outside the download/extract steps
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
