//! Agrobot CLI — entry point.
//!
//! # Commands
//!
//! - `agrobot chat [-m MESSAGE]` — chat (single-shot or REPL)
//! - `agrobot providers` — providers usable right now
//! - `agrobot models <PROVIDER>` — models offered by a provider
//! - `agrobot config show|set` — inspect or change the persisted selection
//! - `agrobot status` — configuration and credential status
//! - `agrobot init` — write a default config and create data directories

mod config_cmd;
mod helpers;
mod init;
mod repl;
mod status;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use agrobot_core::config::{load_config, Config};
use agrobot_core::store::FileStore;
use agrobot_core::types::Message;
use agrobot_providers::{AiService, RuntimeConfigUpdate};

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// 🌱 Agrobot — farm assistant chat with provider fallback
#[derive(Parser)]
#[command(name = "agrobot", version, about, long_about = None)]
struct Cli {
    /// Path to config.json (defaults to ~/.agrobot/config.json)
    #[arg(long = "config-file", global = true)]
    config_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the assistant (single-shot or interactive REPL)
    Chat {
        /// Single message (non-interactive). Omit for REPL mode.
        #[arg(short, long)]
        message: Option<String>,

        #[command(flatten)]
        overrides: OverrideArgs,

        /// Reveal replies word by word
        #[arg(long, default_value_t = false)]
        stream: bool,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// List providers that can be used right now
    Providers {
        /// Print JSON instead of a table
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// List the models of a provider
    Models {
        /// Provider key (e.g. "groq")
        provider: String,

        /// Print JSON instead of a table
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Show or change the persisted provider/model selection
    Config {
        #[command(subcommand)]
        action: config_cmd::ConfigCommands,
    },

    /// Show configuration and provider status
    Status,

    /// Write a default config.json and create data directories
    Init,
}

/// Per-call overrides of the persisted selection.
#[derive(clap::Args, Debug, Default)]
struct OverrideArgs {
    /// Provider key for this call only
    #[arg(short, long)]
    provider: Option<String>,

    /// Model for this call only
    #[arg(long)]
    model: Option<String>,

    /// Temperature for this call only
    #[arg(short, long)]
    temperature: Option<f64>,
}

impl From<OverrideArgs> for RuntimeConfigUpdate {
    fn from(args: OverrideArgs) -> Self {
        RuntimeConfigUpdate {
            provider: args.provider,
            model: args.model,
            temperature: args.temperature,
        }
    }
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config_file.as_deref();

    match cli.command {
        Commands::Chat {
            message,
            overrides,
            stream,
            logs,
        } => {
            init_logging(logs);
            run_chat(config_path, message, overrides.into(), stream).await
        }
        Commands::Providers { json } => {
            init_logging(false);
            run_providers(config_path, json)
        }
        Commands::Models { provider, json } => {
            init_logging(false);
            run_models(config_path, &provider, json)
        }
        Commands::Config { action } => {
            init_logging(false);
            let service = build_service(&load_config(config_path));
            config_cmd::dispatch(&service, action)
        }
        Commands::Status => status::run(config_path),
        Commands::Init => init::run(config_path),
    }
}

// ─────────────────────────────────────────────
// Commands
// ─────────────────────────────────────────────

async fn run_chat(
    config_path: Option<&Path>,
    message: Option<String>,
    overrides: RuntimeConfigUpdate,
    stream: bool,
) -> Result<()> {
    let service = build_service(&load_config(config_path));

    match message {
        Some(msg) => {
            let selection = service.get_runtime_config().merged(&overrides);
            info!(provider = %selection.provider, model = %selection.model, "sending single message");

            let messages = [Message::user(msg).stamped()];
            helpers::print_thinking();
            let reply = service.chat_send(&messages, &overrides).await;
            helpers::clear_thinking();

            if stream {
                helpers::print_streamed(&service, &reply.content).await?;
            } else {
                helpers::print_response(&reply.content);
            }
        }
        None => repl::run(&service, &overrides, stream).await?,
    }

    Ok(())
}

fn run_providers(config_path: Option<&Path>, json: bool) -> Result<()> {
    let service = build_service(&load_config(config_path));
    let providers = service.list_providers();

    if json {
        println!("{}", serde_json::to_string_pretty(&providers)?);
        return Ok(());
    }

    let active = service.get_runtime_config().provider;
    println!();
    for entry in providers {
        let marker = if entry.key == active {
            "●".green().to_string()
        } else {
            " ".to_string()
        };
        println!("  {} {:<10} {}", marker, entry.key.bold(), entry.label.dimmed());
    }
    println!();
    Ok(())
}

fn run_models(config_path: Option<&Path>, provider: &str, json: bool) -> Result<()> {
    let service = build_service(&load_config(config_path));
    let models = service.list_models(provider);

    if json {
        println!("{}", serde_json::to_string_pretty(&models)?);
        return Ok(());
    }

    if models.is_empty() {
        anyhow::bail!("unknown provider '{provider}'");
    }

    let default_model = service
        .registry()
        .resolve(provider)
        .map(|p| p.default_model().to_string())
        .unwrap_or_default();

    println!();
    for entry in models {
        let suffix = if entry.key == default_model {
            "(default)".dimmed().to_string()
        } else {
            String::new()
        };
        println!("  {} {}", entry.label, suffix);
    }
    println!();
    Ok(())
}

// ─────────────────────────────────────────────
// Wiring
// ─────────────────────────────────────────────

/// Build the service with a file-backed store for the runtime selection.
fn build_service(config: &Config) -> AiService {
    let store = FileStore::new(store_dir(config));
    AiService::new(config, Arc::new(store))
}

/// Store directory from config, `~` expanded; `None` means the default.
fn store_dir(config: &Config) -> Option<PathBuf> {
    config
        .store
        .path
        .as_deref()
        .map(agrobot_core::utils::expand_home)
}

/// Initialize tracing/logging.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("agrobot=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_chat_with_overrides() {
        let cli = Cli::try_parse_from([
            "agrobot", "chat", "-m", "hello", "--provider", "groq", "--model",
            "mixtral-8x7b-32768", "-t", "0.3", "--stream",
        ])
        .unwrap();

        match cli.command {
            Commands::Chat {
                message,
                overrides,
                stream,
                logs,
            } => {
                assert_eq!(message.as_deref(), Some("hello"));
                assert!(stream);
                assert!(!logs);
                let update: RuntimeConfigUpdate = overrides.into();
                assert_eq!(
                    update,
                    RuntimeConfigUpdate::default()
                        .provider("groq")
                        .model("mixtral-8x7b-32768")
                        .temperature(0.3)
                );
            }
            _ => panic!("expected chat command"),
        }
    }

    #[test]
    fn parse_models() {
        let cli = Cli::try_parse_from(["agrobot", "models", "openai", "--json"]).unwrap();
        assert!(matches!(cli.command, Commands::Models { ref provider, json: true } if provider == "openai"));
    }

    #[test]
    fn store_dir_expands_tilde() {
        let mut config = Config::default();
        assert!(store_dir(&config).is_none());

        config.store.path = Some("~/farm-store".into());
        let dir = store_dir(&config).unwrap();
        assert!(dir.ends_with("farm-store"));
        assert!(!dir.starts_with("~"));
    }
}
