//! Error types for syncstore
//!
//! All modules use `SyncStoreResult<T>` as their return type. The store
//! itself never hands these to callers of its data operations: failures there
//! are logged and degrade to absence.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for syncstore operations
pub type SyncStoreResult<T> = Result<T, SyncStoreError>;

/// All errors that can occur in syncstore
#[derive(Error, Debug)]
pub enum SyncStoreError {
    // Identity errors
    #[error("No user id configured for the sync response cache")]
    MissingUserId,

    #[error("Invalid user id {user_id:?}: {reason}")]
    InvalidUserId { user_id: String, reason: String },

    // Runtime errors
    #[error("Sync response storage requires a running Tokio runtime")]
    NoRuntime,

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Lookup errors (surfaced by the CLI only)
    #[error("Event {event_id} not found in room {room_id}")]
    EventNotFound { event_id: String, room_id: String },

    #[error("No summary available for room {0}")]
    SummaryNotFound(String),

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid UTF-8 in {0}")]
    InvalidUtf8(PathBuf),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("{0}")]
    User(String),
}

impl SyncStoreError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create an invalid user id error
    pub fn invalid_user(user_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUserId {
            user_id: user_id.into(),
            reason: reason.into(),
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::MissingUserId => {
                Some("Pass --user, set SYNCSTORE_USER, or run: syncstore config set identity.user_id <id>")
            }
            Self::EventNotFound { .. } => Some("Run: syncstore rooms to see what is cached"),
            Self::SummaryNotFound(_) => {
                Some("Summaries are only derived for invited rooms with a name or alias")
            }
            _ => None,
        }
    }
}
