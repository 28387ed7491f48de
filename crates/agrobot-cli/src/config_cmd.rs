//! `agrobot config` — inspect or change the persisted runtime selection.

use anyhow::{bail, Result};
use clap::Subcommand;
use colored::Colorize;

use agrobot_providers::{AiService, RuntimeConfig, RuntimeConfigUpdate};

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the active provider, model, and temperature
    Show {
        /// Print JSON instead of a table
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Change the selection; unset fields keep their value
    Set {
        /// Provider key (e.g. "groq")
        #[arg(short, long)]
        provider: Option<String>,

        /// Model name; reset to the provider default when not offered
        #[arg(short, long)]
        model: Option<String>,

        /// Sampling temperature
        #[arg(short, long)]
        temperature: Option<f64>,
    },
}

/// Dispatch a config subcommand.
pub fn dispatch(service: &AiService, action: ConfigCommands) -> Result<()> {
    match action {
        ConfigCommands::Show { json } => {
            let current = service.get_runtime_config();
            if json {
                println!("{}", serde_json::to_string_pretty(&current)?);
            } else {
                print_selection(&current);
            }
        }
        ConfigCommands::Set {
            provider,
            model,
            temperature,
        } => {
            let update = RuntimeConfigUpdate {
                provider,
                model,
                temperature,
            };
            if update.is_empty() {
                bail!("nothing to change: pass --provider, --model or --temperature");
            }

            let requested_model = update.model.clone();
            service.set_runtime_config(update);
            let current = service.get_runtime_config();

            if let Some(requested) = requested_model {
                if requested != current.model {
                    println!(
                        "{}",
                        format!("'{requested}' is not offered, using '{}'", current.model).yellow()
                    );
                }
            }
            if !is_listed(service, &current.provider) {
                println!(
                    "{}",
                    format!(
                        "'{}' is not usable right now; replies will be simulated",
                        current.provider
                    )
                    .yellow()
                );
            }

            print_selection(&current);
        }
    }
    Ok(())
}

fn is_listed(service: &AiService, provider: &str) -> bool {
    service.list_providers().iter().any(|p| p.key == provider)
}

fn print_selection(current: &RuntimeConfig) {
    println!();
    println!("  {:<14} {}", "Provider:".bold(), current.provider);
    println!("  {:<14} {}", "Model:".bold(), current.model);
    println!("  {:<14} {}", "Temperature:".bold(), current.temperature);
    println!();
}
