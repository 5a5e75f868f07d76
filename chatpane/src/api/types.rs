//! Wire shapes of the backend's JSON bodies.

use serde::{Deserialize, Serialize};

use crate::models::{Message, ModelInfo, Role};

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendRequest {
    pub message: String,
    pub session_id: String,
    pub model: String,
    pub hinglish_mode: bool,
}

#[derive(Debug, Deserialize)]
pub(super) struct SendResponse {
    pub response: String,
}

/// One persisted message as returned by the history endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub content: String,
    pub role: Role,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl From<HistoryEntry> for Message {
    fn from(entry: HistoryEntry) -> Self {
        Self::from_history(entry.content, entry.role, entry.timestamp.as_deref())
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct HistoryResponse {
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Serialize)]
pub(super) struct CreateSessionRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(super) struct RenameRequest<'a> {
    pub title: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct ModelsResponse {
    #[serde(default)]
    pub models: Vec<ModelInfo>,
}

/// Error body the backend sends alongside failure statuses.
#[derive(Debug, Deserialize)]
pub(super) struct ErrorBody {
    pub error: String,
}
