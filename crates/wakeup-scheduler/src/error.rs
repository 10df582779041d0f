use thiserror::Error;

/// Errors that can occur within the wakeup scheduling engine.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Underlying SQLite / rusqlite error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A recognized alarm spec is missing required fields.
    #[error("Invalid alarm: {0}")]
    InvalidAlarm(String),

    /// Exact-wakeup scheduling capability not granted while a non-empty
    /// alarm list was requested.
    #[error("alarm schedule permission required")]
    PermissionDenied,

    /// The external alarm-firing primitive rejected a call.
    #[error("Alarm driver error: {0}")]
    Driver(String),

    /// Persisted or supplied JSON could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
