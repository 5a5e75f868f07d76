//! Chat session controller.
//!
//! Owns the list of sessions, the active session and the send gate, and
//! keeps them in step with the backend. The local message lists are a
//! cache: user messages are appended optimistically before the backend
//! confirms anything, and a session's history is replaced with the
//! backend's copy every time that session becomes active.
//!
//! Every backend failure is handled here. Operations log it, tell the
//! user through the [`RenderSink`], and leave the controller usable.

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::api::{ApiError, ChatBackend, SendRequest};
use crate::format::Markup;
use crate::models::{Message, ModelInfo, Session, SessionSummary};
use crate::view::{self, InputBox, Notification, RenderSink};

/// Bot message substituted for a reply that never arrived.
pub const SEND_FAILURE_REPLY: &str = "Sorry, I encountered an error. Please try again.";

/// Model used when nothing else is configured.
pub const DEFAULT_MODEL: &str = "gemini";

const CLEAR_PROMPT: &str = "Clear all messages in this chat? This cannot be undone.";

/// Title given to a session at `index` when the user supplies none.
pub fn default_title(index: usize) -> String {
    format!("Chat {}", index + 1)
}

/// Per-controller options carried by every send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendOptions {
    pub model: String,
    pub hinglish: bool,
}

impl Default for SendOptions {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            hinglish: false,
        }
    }
}

/// Everything the controller knows about the conversation list.
///
/// After [`ChatSessionController::initialize`] there is always at least one
/// session and `active_index` points at one of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControllerState {
    pub sessions: Vec<Session>,
    pub active_index: usize,
    /// A send is in flight. At most one at a time.
    pub is_typing: bool,
}

impl ControllerState {
    pub fn active_session(&self) -> Option<&Session> {
        self.sessions.get(self.active_index)
    }

    fn active_session_mut(&mut self) -> Option<&mut Session> {
        self.sessions.get_mut(self.active_index)
    }
}

/// A send whose user message is already shown but whose reply is pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSend {
    request: SendRequest,
}

impl PendingSend {
    pub const fn request(&self) -> &SendRequest {
        &self.request
    }
}

pub struct ChatSessionController<B, R> {
    backend: B,
    sink: R,
    markup: Markup,
    state: ControllerState,
    input: InputBox,
    options: SendOptions,
    models: Vec<ModelInfo>,
}

impl<B: ChatBackend, R: RenderSink> ChatSessionController<B, R> {
    /// Create a controller with no sessions. Call [`Self::initialize`] next.
    pub fn new(backend: B, sink: R, options: SendOptions) -> Self {
        Self {
            backend,
            sink,
            markup: Markup::HTML,
            state: ControllerState::default(),
            input: InputBox::new(),
            options,
            models: Vec::new(),
        }
    }

    /// Use a different markup table when rendering message bodies.
    #[must_use]
    pub fn with_markup(mut self, markup: Markup) -> Self {
        self.markup = markup;
        self
    }

    pub const fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn sessions(&self) -> &[Session] {
        &self.state.sessions
    }

    pub const fn active_index(&self) -> usize {
        self.state.active_index
    }

    pub fn active_session(&self) -> Option<&Session> {
        self.state.active_session()
    }

    pub const fn is_typing(&self) -> bool {
        self.state.is_typing
    }

    pub const fn options(&self) -> &SendOptions {
        &self.options
    }

    pub fn models(&self) -> &[ModelInfo] {
        &self.models
    }

    pub const fn backend(&self) -> &B {
        &self.backend
    }

    pub const fn sink(&self) -> &R {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut R {
        &mut self.sink
    }

    pub const fn input(&self) -> &InputBox {
        &self.input
    }

    /// Update the draft in the input box.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input.set_text(text);
    }

    /// Whether the send control is currently enabled.
    pub fn can_send(&self) -> bool {
        self.input.can_send(self.state.is_typing)
    }

    // === Lifecycle ===

    /// Load sessions and their histories from the backend.
    ///
    /// An unreachable backend is treated as having no sessions, and one
    /// default session is created so the list is never empty.
    pub async fn initialize(&mut self) {
        let summaries = match self.backend.list_sessions().await {
            Ok(summaries) => summaries,
            Err(e) => {
                warn!(error = %e, "failed to list sessions, starting with none");
                Vec::new()
            }
        };

        self.state.sessions = summaries.into_iter().map(Session::from_summary).collect();

        if self.state.sessions.is_empty() {
            self.create_new_chat(true).await;
        }

        for index in 0..self.state.sessions.len() {
            let session_id = self.state.sessions[index].session_id.clone();
            self.state.sessions[index].messages = self.fetch_history(&session_id).await;
        }

        self.state.active_index = 0;
        info!(sessions = self.state.sessions.len(), "chat sessions loaded");
        self.render_all();
    }

    /// Fetch the model catalogue. Failures leave an empty list.
    pub async fn load_models(&mut self) -> &[ModelInfo] {
        self.models = match self.backend.list_models().await {
            Ok(models) => models,
            Err(e) => {
                warn!(error = %e, "failed to list models");
                Vec::new()
            }
        };
        &self.models
    }

    /// Select the model used for subsequent sends.
    ///
    /// Once the catalogue is loaded, ids it does not list are refused.
    pub fn set_model(&mut self, model: &str) -> bool {
        let model = model.trim();
        if model.is_empty() {
            return false;
        }

        if !self.models.is_empty() && !self.models.iter().any(|m| m.id == model) {
            self.sink
                .notify(Notification::warning(format!("Unknown model '{model}'")));
            return false;
        }

        self.options.model = model.to_string();
        true
    }

    pub fn set_hinglish(&mut self, enabled: bool) {
        self.options.hinglish = enabled;
    }

    // === Sending ===

    /// Send `text` in the active session and wait for the reply.
    ///
    /// Blank text, or a send already in flight, makes this a no-op.
    pub async fn send_message(&mut self, text: &str) {
        let Some(pending) = self.begin_send(text) else {
            return;
        };

        let result = self.backend.send_message(pending.request()).await;
        self.finish_send(pending, result);
    }

    /// First half of a send: append the user message and raise the gate.
    ///
    /// Returns `None` without touching state when the text is blank or a
    /// send is already in flight.
    pub fn begin_send(&mut self, text: &str) -> Option<PendingSend> {
        let text = text.trim();
        if text.is_empty() || self.state.is_typing {
            return None;
        }

        let session = self.state.active_session_mut()?;
        session.messages.push(Message::user(text));
        let session_id = session.session_id.clone();

        self.input.clear();
        self.state.is_typing = true;
        self.render_messages();

        Some(PendingSend {
            request: SendRequest {
                message: text.to_string(),
                session_id,
                model: self.options.model.clone(),
                hinglish_mode: self.options.hinglish,
            },
        })
    }

    /// Second half of a send: append the reply, or the fallback on failure.
    ///
    /// The optimistic user message stays as it is either way.
    pub fn finish_send(&mut self, pending: PendingSend, result: Result<String, ApiError>) {
        let session_id = pending.request.session_id;
        let reply = match result {
            Ok(response) => Message::bot(response),
            Err(e) => {
                error!(session_id = %session_id, error = %e, "send failed");
                Message::bot(SEND_FAILURE_REPLY)
            }
        };

        match self
            .state
            .sessions
            .iter_mut()
            .find(|s| s.session_id == session_id)
        {
            Some(session) => session.messages.push(reply),
            None => warn!(session_id = %session_id, "session removed before reply arrived"),
        }

        self.state.is_typing = false;
        self.render_messages();
    }

    // === Session management ===

    /// Create a session on the backend and make it active.
    ///
    /// The first session of a fresh controller is titled `Chat 1`; later
    /// ones take the backend's default title.
    pub async fn create_new_chat(&mut self, is_first: bool) -> Option<SessionSummary> {
        let title = is_first.then(|| default_title(0));

        let summary = match self.backend.create_session(title.as_deref()).await {
            Ok(summary) => summary,
            Err(e) if self.state.sessions.is_empty() => {
                error!(error = %e, "failed to create session, using a local one");
                self.sink.notify(Notification::error(
                    "Could not reach the server. This chat will not be saved.",
                ));
                SessionSummary {
                    session_id: Uuid::now_v7().to_string(),
                    title: title.unwrap_or_else(|| default_title(0)),
                }
            }
            Err(e) => {
                error!(error = %e, "failed to create session");
                self.sink
                    .notify(Notification::error("Failed to create a new chat."));
                return None;
            }
        };

        self.state
            .sessions
            .push(Session::from_summary(summary.clone()));
        self.state.active_index = self.state.sessions.len() - 1;
        self.render_all();
        Some(summary)
    }

    /// Make the session at `index` active, reloading its history.
    pub async fn switch_chat(&mut self, index: usize) {
        if index == self.state.active_index {
            return;
        }
        if index >= self.state.sessions.len() {
            warn!(index, "switch to unknown session ignored");
            return;
        }

        self.state.active_index = index;
        self.rehydrate_active().await;
        self.render_all();
    }

    /// Delete the session at `index`. The last remaining session cannot go.
    pub async fn delete_chat(&mut self, index: usize) {
        let count = self.state.sessions.len();
        if index >= count {
            warn!(index, "delete of unknown session ignored");
            return;
        }
        if count == 1 {
            self.sink
                .notify(Notification::warning("You need at least one chat."));
            return;
        }

        let session_id = self.state.sessions[index].session_id.clone();
        if let Err(e) = self.backend.delete_session(&session_id).await {
            error!(session_id = %session_id, error = %e, "failed to delete session");
            self.sink
                .notify(Notification::error("Failed to delete chat."));
            return;
        }

        self.state.sessions.remove(index);

        let active = self.state.active_index;
        if index < active {
            self.state.active_index = active - 1;
        } else if index == active {
            self.state.active_index = active.min(self.state.sessions.len() - 1);
            self.rehydrate_active().await;
        }

        self.render_all();
    }

    /// Rename the session at `index`. A blank title becomes `Chat <n>`.
    pub async fn rename_chat(&mut self, index: usize, new_title: &str) {
        let Some(session) = self.state.sessions.get(index) else {
            warn!(index, "rename of unknown session ignored");
            return;
        };

        let trimmed = new_title.trim();
        let title = if trimmed.is_empty() {
            default_title(index)
        } else {
            trimmed.to_string()
        };

        let session_id = session.session_id.clone();
        if let Err(e) = self.backend.rename_session(&session_id, &title).await {
            error!(session_id = %session_id, error = %e, "failed to rename session");
            self.sink
                .notify(Notification::error("Failed to rename chat."));
            return;
        }

        self.state.sessions[index].title = title;
        self.render_sessions();
    }

    /// Wipe the active session's history after the user confirms.
    pub async fn clear_chat(&mut self) {
        if !self.sink.confirm(CLEAR_PROMPT) {
            return;
        }

        let Some(session_id) = self.state.active_session().map(|s| s.session_id.clone()) else {
            return;
        };

        match self.backend.clear_history(&session_id).await {
            Ok(()) => {
                if let Some(session) = self.state.active_session_mut() {
                    session.messages.clear();
                }
                self.render_messages();
                self.sink.notify(Notification::info("Chat history cleared."));
            }
            Err(e) => {
                error!(session_id = %session_id, error = %e, "failed to clear history");
                self.sink
                    .notify(Notification::error("Failed to clear chat history."));
            }
        }
    }

    // === Internals ===

    /// Backend history for a session; empty when it cannot be fetched.
    async fn fetch_history(&self, session_id: &str) -> Vec<Message> {
        match self.backend.session_history(session_id).await {
            Ok(messages) => messages,
            Err(e) => {
                warn!(session_id, error = %e, "failed to load history");
                Vec::new()
            }
        }
    }

    /// Replace the active session's cached messages with the backend copy.
    async fn rehydrate_active(&mut self) {
        let Some(session_id) = self.state.active_session().map(|s| s.session_id.clone()) else {
            return;
        };

        let messages = self.fetch_history(&session_id).await;
        if let Some(session) = self.state.active_session_mut() {
            session.messages = messages;
        }
    }

    fn render_messages(&mut self) {
        let pane = view::render_messages(&self.state, &self.markup);
        self.sink.show_messages(&pane);
    }

    fn render_sessions(&mut self) {
        let items = view::render_sessions(&self.state);
        self.sink.show_sessions(&items);
    }

    fn render_all(&mut self) {
        self.render_sessions();
        self.render_messages();
    }
}
