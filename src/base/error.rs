use thiserror::Error;

/// Errors surfaced by cleanup passes and settings persistence.
///
/// External failures are not retried internally; they propagate to the
/// caller of `clean`, which logs and continues so one failing category
/// never blocks the others.
#[derive(Debug, Error)]
pub enum CleanupError {
    /// The platform rejected a browsing-data removal call.
    #[error("storage removal failed: {0}")]
    RemovalFailed(String),

    /// A history search or deletion was rejected by the platform.
    #[error("history operation failed: {0}")]
    HistoryFailed(String),

    /// Enumerating cookie stores or frames failed.
    #[error("platform query failed: {0}")]
    PlatformQueryFailed(String),

    /// Settings could not be written to durable storage.
    #[error("settings persistence failed: {0}")]
    SettingsIo(#[from] std::io::Error),

    /// Settings could not be encoded or decoded.
    #[error("settings serialization failed: {0}")]
    SettingsEncode(#[from] serde_json::Error),
}
