//! Data models for chat sessions and messages.

mod message;
mod session;

pub use message::{Message, Role, Sender};
pub use session::{ModelInfo, Session, SessionSummary};
