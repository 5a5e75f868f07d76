//! CLI command execution.
//!
//! This is a thin client - sessions and messages live on the backend.

use std::io;

use anyhow::{Context, Result};
use tracing::debug;

use crate::api::{ChatBackend, HttpBackend};
use crate::controller::ChatSessionController;
use crate::format::{format_message, Markup};
use crate::models::ModelInfo;
use crate::view::{self, InputBox, Notification, RenderSink, MAX_INPUT_ROWS};

use super::args::{Cli, Commands, Config};
use super::slash::{help_text, parse_command, ChatCommand};
use super::terminal::TerminalSink;

pub async fn execute(cli: Cli) -> Result<()> {
    let config = Config::from(&cli);
    let backend = HttpBackend::new(&config.base_url)
        .with_context(|| format!("Invalid backend URL: {}", config.base_url))?;
    debug!(base_url = backend.base_url(), "using backend");

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => run_chat(backend, config).await,
        Commands::Sessions => list_sessions(&backend).await,
        Commands::History { session_id } => {
            show_history(&backend, &session_id, &config.markup()).await
        }
        Commands::Models => list_models(&backend).await,
    }
}

// === Interactive chat ===

/// What the interactive chat needs from a presentation layer beyond the
/// controller's [`RenderSink`].
pub trait Console: RenderSink {
    /// Prompt for and read one line. `None` at end of input.
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;

    fn show_text(&mut self, text: &str);

    /// Print the model catalogue, marking the one in use.
    fn show_models(&mut self, models: &[ModelInfo], current: &str);
}

async fn run_chat(backend: HttpBackend, config: Config) -> Result<()> {
    let markup = config.markup();
    let sink = TerminalSink::new(io::stdin().lock(), io::stdout(), config.styled);
    let mut controller = ChatSessionController::new(backend, sink, config.send).with_markup(markup);

    controller.initialize().await;
    controller.load_models().await;
    chat_loop(&mut controller).await
}

async fn chat_loop<B: ChatBackend, C: Console>(
    controller: &mut ChatSessionController<B, C>,
) -> Result<()> {
    controller
        .sink_mut()
        .show_text("Type a message, or /help for commands. End a line with \\ to continue it.");

    while let Some(draft) = read_draft(controller).context("Failed to read input")? {
        if let Some(command) = parse_command(&draft) {
            controller.set_input("");
            if command == ChatCommand::Quit {
                break;
            }
            run_command(controller, command).await;
            continue;
        }

        if controller.can_send() {
            controller.send_message(&draft).await;
        }
    }

    Ok(())
}

/// Read one draft into the input box. A line ending in `\` continues on
/// the next line. `None` once input ends with nothing typed.
fn read_draft<B: ChatBackend, C: Console>(
    controller: &mut ChatSessionController<B, C>,
) -> io::Result<Option<String>> {
    controller.set_input("");

    loop {
        let prompt = draft_prompt(controller.input());
        let line = controller.sink_mut().read_line(prompt)?;
        let mut draft = controller.input().text().to_string();

        let Some(line) = line else {
            return Ok((!draft.is_empty()).then_some(draft));
        };

        if let Some(head) = line.strip_suffix('\\') {
            draft.push_str(head);
            draft.push('\n');
            controller.set_input(draft);
        } else {
            draft.push_str(&line);
            controller.set_input(draft.clone());
            return Ok(Some(draft));
        }
    }
}

/// Continuation lines switch to `+` once the draft fills the input box.
fn draft_prompt(input: &InputBox) -> &'static str {
    if input.text().is_empty() {
        "> "
    } else if input.rows() < MAX_INPUT_ROWS {
        ". "
    } else {
        "+ "
    }
}

async fn run_command<B: ChatBackend, C: Console>(
    controller: &mut ChatSessionController<B, C>,
    command: ChatCommand,
) {
    match command {
        ChatCommand::New => {
            controller.create_new_chat(false).await;
        }
        ChatCommand::Switch(n) => {
            if check_index(controller, n) {
                controller.switch_chat(n - 1).await;
            }
        }
        ChatCommand::Rename(n, title) => {
            if check_index(controller, n) {
                controller.rename_chat(n - 1, &title).await;
            }
        }
        ChatCommand::Delete(n) => {
            if check_index(controller, n) {
                controller.delete_chat(n - 1).await;
            }
        }
        ChatCommand::Clear => controller.clear_chat().await,
        ChatCommand::Model(model) => {
            if controller.set_model(&model) {
                controller
                    .sink_mut()
                    .notify(Notification::info(format!("Now answering with '{model}'.")));
            }
        }
        ChatCommand::Hinglish(on) => {
            controller.set_hinglish(on);
            let state = if on { "on" } else { "off" };
            controller
                .sink_mut()
                .notify(Notification::info(format!("Hinglish replies {state}.")));
        }
        ChatCommand::Models => {
            let current = controller.options().model.clone();
            let models = controller.models().to_vec();
            controller.sink_mut().show_models(&models, &current);
        }
        ChatCommand::Sessions => {
            let items = view::render_sessions(controller.state());
            controller.sink_mut().show_sessions(&items);
        }
        ChatCommand::Help => controller.sink_mut().show_text(help_text()),
        ChatCommand::Quit => {}
        ChatCommand::Invalid(reason) => controller
            .sink_mut()
            .notify(Notification::warning(reason)),
    }
}

/// Whether 1-based chat number `n` names an existing session.
fn check_index<B: ChatBackend, C: Console>(
    controller: &mut ChatSessionController<B, C>,
    n: usize,
) -> bool {
    let count = controller.sessions().len();
    if (1..=count).contains(&n) {
        return true;
    }
    controller
        .sink_mut()
        .notify(Notification::warning(format!("No chat {n}; there are {count}.")));
    false
}

// === One-shot commands ===

async fn list_sessions(backend: &impl ChatBackend) -> Result<()> {
    let sessions = backend
        .list_sessions()
        .await
        .context("Failed to list sessions")?;

    if sessions.is_empty() {
        println!("No chats found.");
        return Ok(());
    }

    println!("{:<4} {:<38} {}", "#", "SESSION ID", "TITLE");
    println!("{}", "-".repeat(60));
    for (i, session) in sessions.iter().enumerate() {
        println!("{:<4} {:<38} {}", i + 1, session.session_id, session.title);
    }
    Ok(())
}

async fn show_history(backend: &impl ChatBackend, session_id: &str, markup: &Markup) -> Result<()> {
    let messages = backend
        .session_history(session_id)
        .await
        .with_context(|| format!("Failed to load history for {session_id}"))?;

    if messages.is_empty() {
        println!("No messages in chat {session_id}.");
        return Ok(());
    }

    for message in messages {
        let label = message.sender.as_str().to_uppercase();
        println!("[{label} {}]:", message.time);
        println!("{}", format_message(&message.content, markup));
        println!();
    }
    Ok(())
}

async fn list_models(backend: &impl ChatBackend) -> Result<()> {
    let models = backend
        .list_models()
        .await
        .context("Failed to list models")?;

    if models.is_empty() {
        println!("The backend did not list any models.");
        return Ok(());
    }

    println!("{:<10} {:<20} {}", "ID", "NAME", "DESCRIPTION");
    println!("{}", "-".repeat(60));
    for model in models {
        println!(
            "{:<10} {:<20} {}",
            model.id,
            model.name,
            model.description.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}
