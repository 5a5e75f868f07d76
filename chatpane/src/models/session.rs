//! Session model representing one persisted conversation thread.

use serde::{Deserialize, Serialize};

use super::Message;

/// Session descriptor as listed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    /// Server-assigned opaque identifier.
    pub session_id: String,
    /// Human-readable title.
    pub title: String,
}

/// A chat session with its locally cached messages.
///
/// The backend owns the persisted history; `messages` is refreshed from it
/// whenever the session becomes active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub session_id: String,
    pub title: String,
    pub messages: Vec<Message>,
}

impl Session {
    /// Create a session with no messages.
    pub fn new(session_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            title: title.into(),
            messages: Vec::new(),
        }
    }

    pub fn from_summary(summary: SessionSummary) -> Self {
        Self::new(summary.session_id, summary.title)
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            session_id: self.session_id.clone(),
            title: self.title.clone(),
        }
    }
}

/// A model the backend can answer with. Informational only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}
