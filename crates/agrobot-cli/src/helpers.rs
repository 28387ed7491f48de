//! Shared CLI helpers — response printing, streaming, banner.

use std::io::Write;

use anyhow::Result;
use colored::Colorize;

use agrobot_providers::AiService;

/// Print a reply to stdout.
pub fn print_response(response: &str) {
    println!();
    println!("{}", "🌱 Agrobot".green().bold());
    if response.is_empty() {
        println!("{}", "(no response)".dimmed());
    } else {
        println!("{response}");
    }
    println!();
}

/// Print a reply word by word using the simulator's streaming.
pub async fn print_streamed(service: &AiService, response: &str) -> Result<()> {
    println!();
    println!("{}", "🌱 Agrobot".green().bold());

    let mut stdout = std::io::stdout();
    let mut shown = 0;
    let mut result = Ok(());
    service
        .stream_mock_response(response, |chunk| {
            if result.is_ok() {
                result = write!(stdout, "{}", &chunk[shown..]).and_then(|_| stdout.flush());
            }
            shown = chunk.len();
        })
        .await;
    result?;

    println!();
    println!();
    Ok(())
}

/// Print the banner shown at REPL start.
pub fn print_banner(provider: &str, model: &str) {
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!("{}  v{}", "🌱 Agrobot".green().bold(), version.dimmed());
    println!("{}", format!("provider: {provider} · model: {model}").dimmed());
    println!(
        "{}",
        "Type a message, \"/clear\" to start over, or \"exit\" to quit.".dimmed()
    );
    println!();
}

/// Print a "thinking" placeholder.
pub fn print_thinking() {
    eprint!("{}", "⠿ thinking...".dimmed());
}

/// Clear the "thinking" placeholder.
pub fn clear_thinking() {
    eprint!("\r{}\r", " ".repeat(40));
}
