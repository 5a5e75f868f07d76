//! Chatpane - a terminal client for a conversational chat backend.
//!
//! Architecture:
//! - The backend owns sessions, persisted history and model inference
//! - [`controller::ChatSessionController`] keeps a local cache of sessions
//!   and drives every change through a [`api::ChatBackend`]
//! - Presentation goes through [`view::RenderSink`]; the CLI ships a
//!   terminal implementation

pub mod api;
pub mod cli;
pub mod controller;
pub mod format;
pub mod models;
pub mod view;

#[cfg(test)]
mod testing;

pub use controller::{ChatSessionController, ControllerState, SendOptions};
