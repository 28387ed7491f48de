//! Configuration schema.
//!
//! Hierarchy: `Config` → `ProvidersConfig`, `SimulatorConfig`, `StoreConfig`.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.

use std::time::Duration;

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration — loaded from `~/.agrobot/config.json` + env vars.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub providers: ProvidersConfig,
    pub simulator: SimulatorConfig,
    pub store: StoreConfig,
}

// ─────────────────────────────────────────────
// Providers
// ─────────────────────────────────────────────

/// Configuration for a single external provider.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderConfig {
    /// Bearer credential.
    pub api_key: String,
    /// Custom API base URL (overrides the provider default).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    /// Request timeout in seconds. Unset means the HTTP client default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl ProviderConfig {
    /// Whether this provider has a configured API key.
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Credentials for the external providers.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProvidersConfig {
    pub groq: ProviderConfig,
    pub openai: ProviderConfig,
}

impl ProvidersConfig {
    /// Look up a provider config by registry key.
    pub fn get_by_name(&self, name: &str) -> Option<&ProviderConfig> {
        match name {
            "groq" => Some(&self.groq),
            "openai" => Some(&self.openai),
            _ => None,
        }
    }

    /// Mutable lookup by registry key.
    pub fn get_by_name_mut(&mut self, name: &str) -> Option<&mut ProviderConfig> {
        match name {
            "groq" => Some(&mut self.groq),
            "openai" => Some(&mut self.openai),
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────
// Simulator
// ─────────────────────────────────────────────

/// Timings of the local simulator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimulatorConfig {
    /// Lower bound of the simulated latency (inclusive).
    pub min_delay_ms: u64,
    /// Upper bound of the simulated latency (exclusive).
    pub max_delay_ms: u64,
    /// Delay between two streamed words.
    pub stream_interval_ms: u64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: 350,
            max_delay_ms: 800,
            stream_interval_ms: 70,
        }
    }
}

impl SimulatorConfig {
    /// No latency at all.
    pub fn instant() -> Self {
        Self {
            min_delay_ms: 0,
            max_delay_ms: 0,
            stream_interval_ms: 0,
        }
    }
}

// ─────────────────────────────────────────────
// Store
// ─────────────────────────────────────────────

/// Where the runtime selection is persisted.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreConfig {
    /// Store directory; `~` is expanded. Defaults to `~/.agrobot/store`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.providers.groq.is_configured());
        assert!(!config.providers.openai.is_configured());
        assert_eq!(config.simulator.min_delay_ms, 350);
        assert_eq!(config.simulator.max_delay_ms, 800);
        assert_eq!(config.simulator.stream_interval_ms, 70);
        assert!(config.store.path.is_none());
    }

    #[test]
    fn test_whitespace_key_is_not_configured() {
        let cfg = ProviderConfig {
            api_key: "   ".into(),
            ..Default::default()
        };
        assert!(!cfg.is_configured());
    }

    #[test]
    fn test_camel_case_deserialize() {
        let config: Config = serde_json::from_str(
            r#"{
                "providers": {
                    "groq": { "apiKey": "gsk-1", "timeoutSecs": 30 },
                    "openai": { "apiKey": "sk-2", "apiBase": "http://localhost:9000/v1" }
                },
                "simulator": { "streamIntervalMs": 10 }
            }"#,
        )
        .unwrap();

        assert!(config.providers.groq.is_configured());
        assert_eq!(config.providers.groq.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(
            config.providers.openai.api_base.as_deref(),
            Some("http://localhost:9000/v1")
        );
        assert_eq!(config.simulator.stream_interval_ms, 10);
        // Unspecified fields keep their defaults
        assert_eq!(config.simulator.min_delay_ms, 350);
    }

    #[test]
    fn test_get_by_name() {
        let mut config = ProvidersConfig::default();
        config.get_by_name_mut("openai").unwrap().api_key = "sk".into();
        assert!(config.get_by_name("openai").unwrap().is_configured());
        assert!(config.get_by_name("mock").is_none());
    }
}
