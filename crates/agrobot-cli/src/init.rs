//! `agrobot init` — write a default `config.json` and create the data
//! directories.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use agrobot_core::config::{get_config_path, load_config, save_config, Config};
use agrobot_core::store::FileStore;
use agrobot_core::utils::get_data_path;

/// Run the init command.
pub fn run(config_path: Option<&Path>) -> Result<()> {
    println!();
    println!("{}", "🌱 Agrobot — Setup".green().bold());
    println!();

    let config_path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(get_config_path);

    if write_default_config(&config_path)? {
        println!(
            "  {} created config at {}",
            "✓".green(),
            config_path.display()
        );
    } else {
        println!(
            "  {} config already exists at {}",
            "✓".green(),
            config_path.display()
        );
    }

    let config = load_config(Some(&config_path));
    let store_dir = FileStore::new(crate::store_dir(&config)).dir().to_path_buf();
    let history_dir = get_data_path().join("history");
    for dir in [&store_dir, &history_dir] {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        println!("  {} {}", "✓".green(), dir.display());
    }

    println!();
    println!(
        "{}",
        "Set GROQ_API_KEY or OPENAI_API_KEY to use a real provider; otherwise replies are simulated."
            .dimmed()
    );
    println!();

    Ok(())
}

/// Write `Config::default()` to `path` unless a file is already there.
/// Returns whether a file was written.
fn write_default_config(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    save_config(&Config::default(), Some(path))
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(true)
}
