//! Message model and the two sender vocabularies.
//!
//! The backend speaks in roles (`user` / `assistant`), the chat pane in
//! senders (`user` / `bot`). Conversions happen only through the mapping
//! table below.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Display format for message times.
const TIME_FORMAT: &str = "%H:%M";

/// Who a displayed message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// Message typed by the user.
    User,
    /// Reply from the assistant, or a local substitute for one.
    Bot,
}

impl Sender {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
        }
    }
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Role of a persisted history entry, as the backend names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Role/sender mapping table. Both directions read from here.
const ROLE_SENDER: [(Role, Sender); 2] = [(Role::User, Sender::User), (Role::Assistant, Sender::Bot)];

impl From<Role> for Sender {
    fn from(role: Role) -> Self {
        ROLE_SENDER
            .iter()
            .find(|(r, _)| *r == role)
            .map_or(Self::Bot, |(_, s)| *s)
    }
}

impl From<Sender> for Role {
    fn from(sender: Sender) -> Self {
        ROLE_SENDER
            .iter()
            .find(|(_, s)| *s == sender)
            .map_or(Self::Assistant, |(r, _)| *r)
    }
}

/// A single displayed chat message. Never edited once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Raw message text (markdown-ish, formatted at render time).
    pub content: String,
    /// Who sent it.
    pub sender: Sender,
    /// Display time, `HH:MM`.
    pub time: String,
}

impl Message {
    /// Create a message stamped with the current local time.
    pub fn new(content: impl Into<String>, sender: Sender) -> Self {
        Self {
            content: content.into(),
            sender,
            time: Local::now().format(TIME_FORMAT).to_string(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(content, Sender::User)
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Self::new(content, Sender::Bot)
    }

    /// Build a message from a persisted history entry.
    ///
    /// RFC 3339 timestamps are shown in local time. Anything else (the
    /// backend has been seen sending opaque ids here) gets the current time.
    pub fn from_history(content: String, role: Role, timestamp: Option<&str>) -> Self {
        let time = timestamp
            .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
            .map_or_else(
                || Local::now().format(TIME_FORMAT).to_string(),
                |dt| dt.with_timezone(&Local).format(TIME_FORMAT).to_string(),
            );

        Self {
            content,
            sender: role.into(),
            time,
        }
    }
}
