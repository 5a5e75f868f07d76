//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::controller::{SendOptions, DEFAULT_MODEL};
use crate::format::Markup;

/// Default backend address.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5001";

/// Chatpane - chat with an LLM backend from the terminal
#[derive(Parser, Debug)]
#[command(name = "chatpane")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the chat backend
    #[arg(long, env = "CHATPANE_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    pub base_url: String,

    /// Model to answer with (e.g., gemini, groq)
    #[arg(short, long, env = "CHATPANE_MODEL", default_value = DEFAULT_MODEL, global = true)]
    pub model: String,

    /// Ask for replies in Hinglish
    #[arg(long, env = "CHATPANE_HINGLISH", global = true)]
    pub hinglish: bool,

    /// Print without colors or text styling
    #[arg(long, global = true)]
    pub plain: bool,

    /// Subcommand to execute (defaults to `chat`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start an interactive chat
    Chat,

    /// List chat sessions
    Sessions,

    /// Print the message history of a session
    History {
        /// Session ID to show
        session_id: String,
    },

    /// List models the backend offers
    Models,
}

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub send: SendOptions,
    pub styled: bool,
}

impl Config {
    pub const fn markup(&self) -> Markup {
        if self.styled {
            Markup::ANSI
        } else {
            Markup::PLAIN
        }
    }
}

impl From<&Cli> for Config {
    fn from(cli: &Cli) -> Self {
        Self {
            base_url: cli.base_url.clone(),
            send: SendOptions {
                model: cli.model.clone(),
                hinglish: cli.hinglish,
            },
            styled: !cli.plain,
        }
    }
}
