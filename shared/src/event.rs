//! Sync progress and error events
//!
//! One `ThemeEvent` is produced per notable action and consumed
//! exactly once by the reporting sink. The sink needs no
//! variant-specific knowledge beyond the shared contract here.

use serde::Serialize;

/// A unit of progress/error notification flowing to reporting
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ThemeEvent {
    /// A plain notification
    Basic {
        title: String,
        event_type: String,
        message: String,
    },
    /// A successful write of one asset to disk
    FsWrite { target: String },
    /// A per-item failure, reported without aborting the batch
    Error { message: String },
}

impl ThemeEvent {
    /// A plain notice message.
    pub fn notice(message: impl Into<String>) -> ThemeEvent {
        ThemeEvent::Basic {
            title: "Notice".to_string(),
            event_type: "message".to_string(),
            message: message.into(),
        }
    }

    /// A filesystem write event for `target`.
    pub fn fs_write(target: impl Into<String>) -> ThemeEvent {
        ThemeEvent::FsWrite {
            target: target.into(),
        }
    }

    /// A failure event wrapping any displayable error.
    pub fn error(err: impl std::fmt::Display) -> ThemeEvent {
        ThemeEvent::Error {
            message: err.to_string(),
        }
    }

    /// Human-readable form for the reporting sink.
    pub fn message(&self) -> String {
        match self {
            ThemeEvent::Basic { message, .. } => message.clone(),
            ThemeEvent::FsWrite { target } => {
                format!("Successfully wrote {target} to disk")
            }
            ThemeEvent::Error { message } => message.clone(),
        }
    }

    /// Success/failure classification.
    pub fn successful(&self) -> bool {
        !matches!(self, ThemeEvent::Error { .. })
    }

    /// The underlying error message, when this event reports one.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            ThemeEvent::Error { message } => Some(message),
            _ => None,
        }
    }

    /// Structured (serializable) form.
    pub fn as_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
