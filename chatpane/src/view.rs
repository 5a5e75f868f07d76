//! Pure rendering of controller state and the presentation seam.
//!
//! The controller never draws anything itself. It renders its state into
//! plain view models and hands them to a [`RenderSink`], which may be a
//! terminal, a browser bridge or a test recorder.

use crate::controller::ControllerState;
use crate::format::{format_message, Markup};
use crate::models::Sender;

/// Greeting shown above every conversation. Never persisted.
pub const WELCOME_MESSAGE: &str = "Hello! I'm your AI assistant. How can I help you today?";

/// Maximum height, in rows, the input box grows to.
pub const MAX_INPUT_ROWS: usize = 6;

/// One rendered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageView {
    pub sender: Sender,
    /// Formatted body.
    pub body: String,
    /// Display time; `None` for the welcome message.
    pub time: Option<String>,
}

/// Full contents of the message pane. Replaces whatever was shown before.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagePane {
    pub messages: Vec<MessageView>,
    pub typing: bool,
}

/// One row of the session list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionItem {
    pub index: usize,
    pub title: String,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

/// Transient user-visible notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

/// Presentation layer driven by the controller.
pub trait RenderSink {
    /// Replace the session list.
    fn show_sessions(&mut self, sessions: &[SessionItem]);

    /// Replace the message pane.
    fn show_messages(&mut self, pane: &MessagePane);

    fn notify(&mut self, notification: Notification);

    /// Ask the user to confirm a destructive action.
    fn confirm(&mut self, prompt: &str) -> bool;
}

/// Render the active session's messages, welcome message first.
pub fn render_messages(state: &ControllerState, markup: &Markup) -> MessagePane {
    let welcome = MessageView {
        sender: Sender::Bot,
        body: format_message(WELCOME_MESSAGE, markup),
        time: None,
    };

    let history = state
        .active_session()
        .map(|s| s.messages.as_slice())
        .unwrap_or_default()
        .iter()
        .map(|m| MessageView {
            sender: m.sender,
            body: format_message(&m.content, markup),
            time: Some(m.time.clone()),
        });

    MessagePane {
        messages: std::iter::once(welcome).chain(history).collect(),
        typing: state.is_typing,
    }
}

/// Render the session list in display order.
pub fn render_sessions(state: &ControllerState) -> Vec<SessionItem> {
    state
        .sessions
        .iter()
        .enumerate()
        .map(|(index, s)| SessionItem {
            index,
            title: s.title.clone(),
            active: index == state.active_index,
        })
        .collect()
}

/// Draft text in the message input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBox {
    text: String,
}

impl InputBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Whether the send control is enabled.
    pub fn can_send(&self, is_typing: bool) -> bool {
        !is_typing && !self.text.trim().is_empty()
    }

    /// Height the input grows to for the current draft.
    pub fn rows(&self) -> usize {
        self.text.split('\n').count().clamp(1, MAX_INPUT_ROWS)
    }
}
