//! In-memory backend and recording sink shared by the unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::api::{ApiError, ChatBackend, SendRequest};
use crate::models::{Message, ModelInfo, SessionSummary};
use crate::view::{MessagePane, Notification, RenderSink, SessionItem};

/// In-memory backend recording every call it receives.
#[derive(Default)]
pub(crate) struct FakeBackend {
    pub(crate) sessions: Mutex<Vec<SessionSummary>>,
    histories: Mutex<HashMap<String, Vec<Message>>>,
    failing: Mutex<HashSet<&'static str>>,
    calls: Mutex<Vec<String>>,
    pub(crate) sent: Mutex<Vec<SendRequest>>,
    next_id: AtomicUsize,
}

impl FakeBackend {
    pub(crate) fn with_sessions(titles: &[&str]) -> Self {
        let backend = Self::default();
        for title in titles {
            let id = backend.new_id();
            backend.sessions.lock().unwrap().push(SessionSummary {
                session_id: id,
                title: (*title).to_string(),
            });
        }
        backend
    }

    fn new_id(&self) -> String {
        format!("sess-{}", self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    pub(crate) fn fail(&self, op: &'static str) {
        self.failing.lock().unwrap().insert(op);
    }

    pub(crate) fn set_history(&self, session_id: &str, messages: Vec<Message>) {
        self.histories
            .lock()
            .unwrap()
            .insert(session_id.to_string(), messages);
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn check(&self, op: &'static str, call: String) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(call);
        if self.failing.lock().unwrap().contains(op) {
            return Err(ApiError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: format!("{op} unavailable"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ChatBackend for FakeBackend {
    async fn list_sessions(&self) -> Result<Vec<SessionSummary>, ApiError> {
        self.check("list", "list".to_string())?;
        Ok(self.sessions.lock().unwrap().clone())
    }

    async fn session_history(&self, session_id: &str) -> Result<Vec<Message>, ApiError> {
        self.check("history", format!("history:{session_id}"))?;
        Ok(self
            .histories
            .lock()
            .unwrap()
            .get(session_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn send_message(&self, request: &SendRequest) -> Result<String, ApiError> {
        self.check("send", format!("send:{}", request.session_id))?;
        self.sent.lock().unwrap().push(request.clone());
        let reply = format!("echo: {}", request.message);
        let mut histories = self.histories.lock().unwrap();
        let history = histories.entry(request.session_id.clone()).or_default();
        history.push(Message::user(request.message.clone()));
        history.push(Message::bot(reply.clone()));
        Ok(reply)
    }

    async fn clear_history(&self, session_id: &str) -> Result<(), ApiError> {
        self.check("clear", format!("clear:{session_id}"))?;
        self.histories.lock().unwrap().remove(session_id);
        Ok(())
    }

    async fn create_session(&self, title: Option<&str>) -> Result<SessionSummary, ApiError> {
        self.check("create", "create".to_string())?;
        let summary = SessionSummary {
            session_id: self.new_id(),
            title: title.unwrap_or("Chat 2024-05-01 10:00").to_string(),
        };
        self.sessions.lock().unwrap().push(summary.clone());
        Ok(summary)
    }

    async fn rename_session(&self, session_id: &str, title: &str) -> Result<(), ApiError> {
        self.check("rename", format!("rename:{session_id}"))?;
        for s in self.sessions.lock().unwrap().iter_mut() {
            if s.session_id == session_id {
                s.title = title.to_string();
            }
        }
        Ok(())
    }

    async fn delete_session(&self, session_id: &str) -> Result<(), ApiError> {
        self.check("delete", format!("delete:{session_id}"))?;
        self.sessions
            .lock()
            .unwrap()
            .retain(|s| s.session_id != session_id);
        Ok(())
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, ApiError> {
        self.check("models", "models".to_string())?;
        Ok(vec![
            ModelInfo {
                id: "gemini".to_string(),
                name: "Google Gemini".to_string(),
                description: None,
            },
            ModelInfo {
                id: "groq".to_string(),
                name: "Groq LLM".to_string(),
                description: None,
            },
        ])
    }
}

/// Sink that records everything it is asked to show.
#[derive(Default)]
pub(crate) struct RecordingSink {
    pub(crate) session_renders: Vec<Vec<SessionItem>>,
    pub(crate) message_renders: Vec<MessagePane>,
    pub(crate) notifications: Vec<Notification>,
    pub(crate) prompts: Vec<String>,
    /// Free text printed outside the message pane.
    pub(crate) texts: Vec<String>,
    pub(crate) confirm_answer: bool,
}

impl RenderSink for RecordingSink {
    fn show_sessions(&mut self, sessions: &[SessionItem]) {
        self.session_renders.push(sessions.to_vec());
    }

    fn show_messages(&mut self, pane: &MessagePane) {
        self.message_renders.push(pane.clone());
    }

    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        self.prompts.push(prompt.to_string());
        self.confirm_answer
    }
}

