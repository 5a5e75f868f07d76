//! Backend collaborator.
//!
//! The chat pane never talks to language models or storage itself. Every
//! mutating operation goes through [`ChatBackend`], which mirrors the
//! backend's REST surface one call per endpoint.

mod client;
mod error;
mod types;

use async_trait::async_trait;

use crate::models::{Message, ModelInfo, SessionSummary};

pub use client::HttpBackend;
pub use error::ApiError;
pub use types::{HistoryEntry, SendRequest};

/// REST contract consumed by the chat controller.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// `GET /api/chats`
    async fn list_sessions(&self) -> Result<Vec<SessionSummary>, ApiError>;

    /// `GET /api/chat/history/{session_id}`
    async fn session_history(&self, session_id: &str) -> Result<Vec<Message>, ApiError>;

    /// `POST /api/chat`, returns the assistant reply.
    async fn send_message(&self, request: &SendRequest) -> Result<String, ApiError>;

    /// `DELETE /api/chat/clear/{session_id}`
    async fn clear_history(&self, session_id: &str) -> Result<(), ApiError>;

    /// `POST /api/chats`
    async fn create_session(&self, title: Option<&str>) -> Result<SessionSummary, ApiError>;

    /// `PATCH /api/chats/{session_id}`
    async fn rename_session(&self, session_id: &str, title: &str) -> Result<(), ApiError>;

    /// `DELETE /api/chats/{session_id}`
    async fn delete_session(&self, session_id: &str) -> Result<(), ApiError>;

    /// `GET /api/models`
    async fn list_models(&self) -> Result<Vec<ModelInfo>, ApiError>;
}
