//! Slash commands accepted by the interactive chat.
//!
//! Session numbers are 1-based, as shown in the session list.

/// A parsed chat command. Never sent to the backend as a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// Start a new session.
    New,

    /// Make session `n` active.
    Switch(usize),

    /// Rename session `n`. An empty title falls back to `Chat <n>`.
    Rename(usize, String),

    /// Delete session `n`.
    Delete(usize),

    /// Clear the active session's history.
    Clear,

    /// Change the model used for replies.
    Model(String),

    /// Turn Hinglish replies on or off.
    Hinglish(bool),

    /// Show the model catalogue.
    Models,

    /// Show the session list.
    Sessions,

    Help,

    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parse a line of input.
///
/// Returns `None` when the line is an ordinary message. A leading `/`
/// followed by a word that is not a command, such as a path, is a message.
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();
    let rest = input.strip_prefix('/')?;

    let mut parts = rest.splitn(2, char::is_whitespace);
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(str::trim).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "new" => ChatCommand::New,
        "switch" | "s" => parse_index(argument, "/switch").map_or_else(|e| e, ChatCommand::Switch),
        "delete" | "rm" => parse_index(argument, "/delete").map_or_else(|e| e, ChatCommand::Delete),
        "rename" => {
            let mut args = argument.unwrap_or_default().splitn(2, char::is_whitespace);
            match parse_index(args.next().filter(|s| !s.is_empty()), "/rename") {
                Ok(n) => ChatCommand::Rename(n, args.next().unwrap_or_default().trim().to_string()),
                Err(e) => e,
            }
        }
        "clear" => ChatCommand::Clear,
        "model" => match argument {
            Some(model) => ChatCommand::Model(model.to_string()),
            None => ChatCommand::Invalid("/model requires a model id".to_string()),
        },
        "hinglish" => match argument.map(parse_on_off) {
            Some(Some(on)) => ChatCommand::Hinglish(on),
            _ => ChatCommand::Invalid("/hinglish expects on or off".to_string()),
        },
        "models" => ChatCommand::Models,
        "sessions" | "chats" | "ls" => ChatCommand::Sessions,
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        _ => return None,
    };

    Some(result)
}

fn parse_index(argument: Option<&str>, name: &str) -> Result<usize, ChatCommand> {
    let Some(arg) = argument else {
        return Err(ChatCommand::Invalid(format!("{name} requires a chat number")));
    };
    match arg.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(ChatCommand::Invalid(format!(
            "{name} expects a chat number starting at 1, got '{arg}'"
        ))),
    }
}

fn parse_on_off(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

pub const fn help_text() -> &'static str {
    "Commands:
  /new                 Start a new chat
  /switch <n>          Switch to chat n
  /rename <n> [title]  Rename chat n (blank resets to \"Chat n\")
  /delete <n>          Delete chat n
  /clear               Clear the current chat's history
  /model <id>          Answer with a different model
  /hinglish on|off     Toggle Hinglish replies
  /models              List available models
  /sessions            List chats
  /help                Show this help
  /quit                Leave

Anything else is sent as a message."
}
