//! Config loader — reads `~/.agrobot/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.agrobot/config.json`
//! 3. Environment variables `AGROBOT_<SECTION>__<FIELD>` (override JSON)
//! 4. Plain provider variables (`GROQ_API_KEY`, `OPENAI_API_KEY`), only when
//!    no key was configured by the steps above

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::schema::Config;

/// Providers whose credentials can come from the environment:
/// `(registry key, AGROBOT_ segment, plain env var)`.
const PROVIDER_ENV: &[(&str, &str, &str)] = &[
    ("groq", "GROQ", "GROQ_API_KEY"),
    ("openai", "OPENAI", "OPENAI_API_KEY"),
];

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the given (or default) path + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);
    let config = read_config_file(&config_path);
    apply_env_overrides(config, |name| std::env::var(name).ok())
}

/// Read a config file without applying env overrides.
fn read_config_file(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return Config::default();
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return Config::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            Config::default()
        }
    }
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config).map_err(std::io::Error::other)?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply environment overrides on top of a loaded config.
///
/// Supported variables:
/// - `AGROBOT_PROVIDERS__<NAME>__API_KEY` → `providers.<name>.api_key`
/// - `AGROBOT_PROVIDERS__<NAME>__API_BASE` → `providers.<name>.api_base`
/// - `AGROBOT_PROVIDERS__<NAME>__TIMEOUT_SECS` → `providers.<name>.timeout_secs`
/// - `AGROBOT_SIMULATOR__MIN_DELAY_MS` / `__MAX_DELAY_MS` / `__STREAM_INTERVAL_MS`
/// - `AGROBOT_STORE__PATH` → `store.path`
/// - `GROQ_API_KEY`, `OPENAI_API_KEY` when the key is still empty
fn apply_env_overrides<F>(mut config: Config, env: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    for (name, segment, plain) in PROVIDER_ENV {
        let Some(provider) = config.providers.get_by_name_mut(name) else {
            continue;
        };

        if let Some(val) = env(&format!("AGROBOT_PROVIDERS__{segment}__API_KEY")) {
            provider.api_key = val;
        }
        if let Some(val) = env(&format!("AGROBOT_PROVIDERS__{segment}__API_BASE")) {
            provider.api_base = Some(val);
        }
        if let Some(val) = env(&format!("AGROBOT_PROVIDERS__{segment}__TIMEOUT_SECS")) {
            match val.parse::<u64>() {
                Ok(secs) => provider.timeout_secs = Some(secs),
                Err(_) => warn!(provider = name, value = %val, "ignoring invalid timeout"),
            }
        }
        if !provider.is_configured() {
            if let Some(val) = env(plain) {
                debug!(provider = name, var = plain, "using API key from environment");
                provider.api_key = val;
            }
        }
    }

    let sim = &mut config.simulator;
    for (var, slot) in [
        ("AGROBOT_SIMULATOR__MIN_DELAY_MS", &mut sim.min_delay_ms),
        ("AGROBOT_SIMULATOR__MAX_DELAY_MS", &mut sim.max_delay_ms),
        ("AGROBOT_SIMULATOR__STREAM_INTERVAL_MS", &mut sim.stream_interval_ms),
    ] {
        if let Some(val) = env(var) {
            if let Ok(ms) = val.parse::<u64>() {
                *slot = ms;
            }
        }
    }

    if let Some(val) = env("AGROBOT_STORE__PATH") {
        config.store.path = Some(val);
    }

    config
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp_json(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_load_missing_file() {
        let config = read_config_file(Path::new("/nonexistent/path/config.json"));
        assert_eq!(config.simulator.min_delay_ms, 350);
        assert!(!config.providers.groq.is_configured());
    }

    #[test]
    fn test_load_valid_json() {
        let file = write_temp_json(
            r#"{
            "providers": {
                "openai": { "apiKey": "sk-file" }
            },
            "store": { "path": "/tmp/agrobot-store" }
        }"#,
        );

        let config = read_config_file(file.path());
        assert_eq!(config.providers.openai.api_key, "sk-file");
        assert_eq!(config.store.path.as_deref(), Some("/tmp/agrobot-store"));
        assert!(!config.providers.groq.is_configured());
    }

    #[test]
    fn test_load_invalid_json_returns_defaults() {
        let file = write_temp_json("not valid json {{{");
        let config = read_config_file(file.path());
        assert_eq!(config.simulator.max_delay_ms, 800);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.json");

        let mut config = Config::default();
        config.providers.groq.api_key = "gsk-test".to_string();
        config.simulator.stream_interval_ms = 5;

        save_config(&config, Some(&path)).unwrap();

        let reloaded = read_config_file(&path);
        assert_eq!(reloaded.providers.groq.api_key, "gsk-test");
        assert_eq!(reloaded.simulator.stream_interval_ms, 5);
    }

    #[test]
    fn test_saved_json_uses_camel_case() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        save_config(&Config::default(), Some(&path)).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let raw: serde_json::Value = serde_json::from_str(&content).unwrap();

        assert!(raw["simulator"].get("streamIntervalMs").is_some());
        assert!(raw["simulator"].get("stream_interval_ms").is_none());
        assert!(raw["providers"]["groq"].get("apiKey").is_some());
    }

    #[test]
    fn test_env_override_provider_key() {
        let env = env_from(&[("AGROBOT_PROVIDERS__GROQ__API_KEY", "gsk-env")]);
        let config = apply_env_overrides(Config::default(), env);
        assert_eq!(config.providers.groq.api_key, "gsk-env");
        assert!(!config.providers.openai.is_configured());
    }

    #[test]
    fn test_plain_env_key_fills_empty_slot() {
        let env = env_from(&[("OPENAI_API_KEY", "sk-plain")]);
        let config = apply_env_overrides(Config::default(), env);
        assert_eq!(config.providers.openai.api_key, "sk-plain");
    }

    #[test]
    fn test_plain_env_key_does_not_override_configured() {
        let mut config = Config::default();
        config.providers.openai.api_key = "sk-file".into();

        let env = env_from(&[("OPENAI_API_KEY", "sk-plain")]);
        let config = apply_env_overrides(config, env);
        assert_eq!(config.providers.openai.api_key, "sk-file");
    }

    #[test]
    fn test_env_override_api_base_and_timeout() {
        let env = env_from(&[
            ("AGROBOT_PROVIDERS__OPENAI__API_BASE", "http://proxy/v1"),
            ("AGROBOT_PROVIDERS__OPENAI__TIMEOUT_SECS", "15"),
            ("AGROBOT_PROVIDERS__GROQ__TIMEOUT_SECS", "soon"),
        ]);
        let config = apply_env_overrides(Config::default(), env);
        assert_eq!(config.providers.openai.api_base.as_deref(), Some("http://proxy/v1"));
        assert_eq!(config.providers.openai.timeout_secs, Some(15));
        assert_eq!(config.providers.groq.timeout_secs, None);
    }

    #[test]
    fn test_env_override_simulator_and_store() {
        let env = env_from(&[
            ("AGROBOT_SIMULATOR__MIN_DELAY_MS", "0"),
            ("AGROBOT_SIMULATOR__MAX_DELAY_MS", "1"),
            ("AGROBOT_SIMULATOR__STREAM_INTERVAL_MS", "bad"),
            ("AGROBOT_STORE__PATH", "~/elsewhere"),
        ]);
        let config = apply_env_overrides(Config::default(), env);
        assert_eq!(config.simulator.min_delay_ms, 0);
        assert_eq!(config.simulator.max_delay_ms, 1);
        assert_eq!(config.simulator.stream_interval_ms, 70);
        assert_eq!(config.store.path.as_deref(), Some("~/elsewhere"));
    }
}
