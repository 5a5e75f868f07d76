//! Terminal presentation of the chat.
//!
//! Owns both stdin and stdout so that confirmation prompts and chat input
//! read from the same place.

use std::io::{self, BufRead, Write};

use tracing::debug;

use super::commands::Console;
use crate::format::strip_controls;
use crate::models::{ModelInfo, Sender};
use crate::view::{MessagePane, MessageView, Notification, NotificationLevel, RenderSink, SessionItem};

const ANSI_DIM: &str = "\x1b[2m";
const ANSI_CYAN: &str = "\x1b[36m";
const ANSI_GREEN: &str = "\x1b[32m";
const ANSI_YELLOW: &str = "\x1b[33m";
const ANSI_RED: &str = "\x1b[31m";
const ANSI_RESET: &str = "\x1b[0m";

/// [`RenderSink`] that prints to a terminal.
///
/// Each pane replaces the previous one. When the new pane only extends
/// what is already on screen, just the new messages are printed;
/// otherwise the whole pane is printed again under a separator.
pub struct TerminalSink<I, W> {
    input: I,
    out: W,
    styled: bool,
    shown: Vec<MessageView>,
    typing: bool,
}

impl<I: BufRead, W: Write> TerminalSink<I, W> {
    pub const fn new(input: I, out: W, styled: bool) -> Self {
        Self {
            input,
            out,
            styled,
            shown: Vec::new(),
            typing: false,
        }
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.styled {
            format!("{color}{text}{ANSI_RESET}")
        } else {
            text.to_string()
        }
    }

    fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}") {
            debug!(error = %e, "terminal write failed");
        }
    }

    fn print_message(&mut self, message: &MessageView) {
        let (label, color) = match message.sender {
            Sender::User => ("you", ANSI_GREEN),
            Sender::Bot => ("bot", ANSI_CYAN),
        };
        let time = message
            .time
            .as_deref()
            .map(|t| self.paint(ANSI_DIM, &format!("[{t}] ")))
            .unwrap_or_default();
        let label = self.paint(color, label);
        self.line(&format!("{time}{label}: {}", message.body));
    }
}

impl<I: BufRead, W: Write> Console for TerminalSink<I, W> {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.out, "{}", self.paint(ANSI_DIM, prompt))?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn show_text(&mut self, text: &str) {
        self.line(text);
    }

    fn show_models(&mut self, models: &[ModelInfo], current: &str) {
        if models.is_empty() {
            self.line(&format!("No model list available. Using '{current}'."));
            return;
        }

        self.line("Models:");
        for model in models {
            let marker = if model.id == current { "*" } else { " " };
            let description = model
                .description
                .as_deref()
                .map(|d| format!(" - {}", strip_controls(d)))
                .unwrap_or_default();
            self.line(&format!(
                "  {marker} {:<10} {}{description}",
                strip_controls(&model.id),
                strip_controls(&model.name)
            ));
        }
    }
}

impl<I: BufRead, W: Write> RenderSink for TerminalSink<I, W> {
    fn show_sessions(&mut self, sessions: &[SessionItem]) {
        self.line("Chats:");
        for item in sessions {
            let marker = if item.active { "*" } else { " " };
            let title = strip_controls(&item.title);
            self.line(&format!("  {marker} {}. {title}", item.index + 1));
        }
    }

    fn show_messages(&mut self, pane: &MessagePane) {
        let extends = pane.messages.len() >= self.shown.len()
            && pane.messages[..self.shown.len()] == self.shown[..];

        let start = if extends {
            self.shown.len()
        } else {
            self.line(&self.paint(ANSI_DIM, &"-".repeat(40)));
            0
        };

        for message in &pane.messages[start..] {
            self.print_message(message);
        }

        if pane.typing && !self.typing {
            self.line(&self.paint(ANSI_DIM, "bot is typing..."));
        }

        self.shown.clone_from(&pane.messages);
        self.typing = pane.typing;
    }

    fn notify(&mut self, notification: Notification) {
        let (label, color) = match notification.level {
            NotificationLevel::Info => ("info", ANSI_DIM),
            NotificationLevel::Warning => ("warning", ANSI_YELLOW),
            NotificationLevel::Error => ("error", ANSI_RED),
        };
        let label = self.paint(color, label);
        self.line(&format!("{label}: {}", notification.message));
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        if let Err(e) = write!(self.out, "{prompt} [y/N] ").and_then(|()| self.out.flush()) {
            debug!(error = %e, "terminal write failed");
        }

        let mut answer = String::new();
        if self.input.read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}
