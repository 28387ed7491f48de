//! Interactive REPL.
//!
//! Uses `rustyline` for readline-style editing with persistent history. The
//! whole conversation is sent on every turn.

use anyhow::Result;
use colored::Colorize;
use rustyline::config::Configurer;
use rustyline::history::DefaultHistory;
use rustyline::{DefaultEditor, Editor};
use tracing::debug;

use agrobot_core::types::Message;
use agrobot_providers::{AiService, RuntimeConfigUpdate};

use crate::helpers;

/// Exit commands (case-insensitive match).
const EXIT_COMMANDS: &[&str] = &["exit", "quit", "/exit", "/quit", ":q"];

/// Drops the conversation so far.
const CLEAR_COMMAND: &str = "/clear";

/// Run the interactive REPL loop.
pub async fn run(service: &AiService, overrides: &RuntimeConfigUpdate, stream: bool) -> Result<()> {
    let selection = service.get_runtime_config().merged(overrides);
    helpers::print_banner(&selection.provider, &selection.model);

    let mut editor = create_editor()?;
    let mut conversation: Vec<Message> = Vec::new();

    loop {
        let input = match editor.readline("You: ") {
            Ok(line) => line,
            Err(rustyline::error::ReadlineError::Interrupted) => break,
            Err(rustyline::error::ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Input error: {e}");
                break;
            }
        };

        let trimmed = input.trim();
        if trimmed.is_empty() {
            continue;
        }

        if is_exit_command(trimmed) {
            println!("\nGoodbye! 👋");
            break;
        }

        let _ = editor.add_history_entry(&input);

        if trimmed.eq_ignore_ascii_case(CLEAR_COMMAND) {
            conversation.clear();
            println!("{}", "(conversation cleared)".dimmed());
            continue;
        }

        conversation.push(Message::user(trimmed).stamped());
        debug!(turns = conversation.len(), "sending conversation");

        helpers::print_thinking();
        let reply = service.chat_send(&conversation, overrides).await;
        helpers::clear_thinking();

        if stream {
            helpers::print_streamed(service, &reply.content).await?;
        } else {
            helpers::print_response(&reply.content);
        }

        conversation.push(Message::from(reply).stamped());
    }

    save_history(&mut editor);

    Ok(())
}

/// Create a rustyline editor with history.
fn create_editor() -> Result<Editor<(), DefaultHistory>> {
    let mut editor = DefaultEditor::new()?;
    editor.set_max_history_size(1000)?;

    let history_path = history_path();
    if history_path.exists() {
        let _ = editor.load_history(&history_path);
        debug!("loaded REPL history from {}", history_path.display());
    }

    Ok(editor)
}

fn save_history(editor: &mut Editor<(), DefaultHistory>) {
    let path = history_path();
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    if let Err(e) = editor.save_history(&path) {
        debug!("failed to save history: {e}");
    }
}

/// `~/.agrobot/history/cli_history`
fn history_path() -> std::path::PathBuf {
    agrobot_core::utils::get_data_path()
        .join("history")
        .join("cli_history")
}

fn is_exit_command(input: &str) -> bool {
    let lower = input.to_lowercase();
    EXIT_COMMANDS.contains(&lower.as_str())
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_commands() {
        assert!(is_exit_command("exit"));
        assert!(is_exit_command("QUIT"));
        assert!(is_exit_command("/exit"));
        assert!(is_exit_command(":q"));
        assert!(!is_exit_command("/clear"));
        assert!(!is_exit_command("when should I sow wheat?"));
    }

    #[test]
    fn history_path_under_data_dir() {
        let path = history_path();
        assert!(path.to_string_lossy().contains(".agrobot"));
        assert!(path.ends_with("history/cli_history"));
    }
}
