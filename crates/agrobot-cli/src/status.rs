//! `agrobot status` — show configuration, credential status, and the active
//! provider selection.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use agrobot_core::config::{get_config_path, load_config};
use agrobot_core::store::FileStore;
use agrobot_providers::registry::find_by_name;
use agrobot_providers::ChatProvider;

/// Run the status command.
pub fn run(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path);
    let config_path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(get_config_path);
    let service = crate::build_service(&config);

    println!();
    println!("{}", "🌱 Agrobot Status".green().bold());
    println!();

    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        config_path.display(),
        found_marker(config_path.exists())
    );

    let store_dir = FileStore::new(crate::store_dir(&config)).dir().to_path_buf();
    println!(
        "  {:<18} {} {}",
        "Store:".bold(),
        store_dir.display(),
        found_marker(store_dir.exists())
    );

    let selection = service.get_runtime_config();
    println!("  {:<18} {}", "Provider:".bold(), selection.provider);
    println!("  {:<18} {}", "Model:".bold(), selection.model);
    println!(
        "  {:<18} {}",
        "Parameters:".bold(),
        format!("temp: {}", selection.temperature).dimmed()
    );

    println!();
    println!("  {}", "Providers:".bold());
    for provider in service.registry().iter() {
        println!("    {:<20} {}", provider.label(), credential_status(provider));
    }
    println!();

    Ok(())
}

fn found_marker(exists: bool) -> String {
    if exists {
        "✓".green().to_string()
    } else {
        "(not found)".red().to_string()
    }
}

fn credential_status(provider: &dyn ChatProvider) -> String {
    let spec = find_by_name(provider.key());
    if spec.is_some_and(|s| s.is_local) {
        return format!("{} (always available)", "✓".green());
    }
    if provider.is_available() {
        return format!("{} (key set)", "✓".green());
    }
    match spec.and_then(|s| s.env_key) {
        Some(var) => format!("{}", format!("· not configured (set {var})").dimmed()),
        None => format!("{}", "· not configured".dimmed()),
    }
}
