//! Command-line front end.

mod args;
mod commands;
mod slash;
mod terminal;

pub use args::{Cli, Commands, Config};
pub use commands::{execute, Console};
pub use slash::{parse_command, ChatCommand};
pub use terminal::TerminalSink;
