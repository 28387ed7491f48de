//! Provider registry — static specs for the supported backends and the
//! runtime lookup table built from them.
//!
//! Declaration order matters: it is the order of [`Registry::list_available`]
//! (simulator first, then external providers).

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use agrobot_core::config::Config;

use crate::http_provider::HttpProvider;
use crate::simulator::Simulator;
use crate::traits::ChatProvider;

// ─────────────────────────────────────────────
// ProviderSpec — static metadata for one provider
// ─────────────────────────────────────────────

/// Static specification describing one provider.
#[derive(Clone, Debug)]
pub struct ProviderSpec {
    /// Registry key (e.g. `"groq"`).
    pub name: &'static str,
    /// Human-readable name (e.g. `"Groq"`).
    pub display_name: &'static str,
    /// Plain environment variable that can carry the API key.
    pub env_key: Option<&'static str>,
    /// Base URL of the OpenAI-compatible API.
    pub default_api_base: Option<&'static str>,
    pub default_model: &'static str,
    /// Supported models, in declaration order.
    pub models: &'static [&'static str],
    /// Answered locally, never over the network.
    pub is_local: bool,
}

/// Key of the simulator, also the fallback for unknown provider keys.
pub const SIMULATOR_KEY: &str = "mock";

/// Order in which providers are probed to pick the initial selection.
pub const DEFAULT_PRIORITY: &[&str] = &["groq", "openai", SIMULATOR_KEY];

/// All supported providers, in declaration order.
pub static PROVIDERS: &[ProviderSpec] = &[
    ProviderSpec {
        name: SIMULATOR_KEY,
        display_name: "Simulation",
        env_key: None,
        default_api_base: None,
        default_model: "mock-sim",
        models: &["mock-sim"],
        is_local: true,
    },
    ProviderSpec {
        name: "groq",
        display_name: "Groq",
        env_key: Some("GROQ_API_KEY"),
        default_api_base: Some("https://api.groq.com/openai/v1"),
        default_model: "llama-3.1-8b-instant",
        models: &[
            "llama-3.1-8b-instant",
            "llama-3.1-70b-versatile",
            "mixtral-8x7b-32768",
        ],
        is_local: false,
    },
    ProviderSpec {
        name: "openai",
        display_name: "OpenAI",
        env_key: Some("OPENAI_API_KEY"),
        default_api_base: Some("https://api.openai.com/v1"),
        default_model: "gpt-4o-mini",
        models: &["gpt-4o-mini", "gpt-4o", "gpt-4o-mini-translate"],
        is_local: false,
    },
];

/// Find a provider spec by exact name.
pub fn find_by_name(name: &str) -> Option<&'static ProviderSpec> {
    PROVIDERS.iter().find(|spec| spec.name == name)
}

/// The simulator's spec.
pub fn simulator_spec() -> &'static ProviderSpec {
    &PROVIDERS[0]
}

// ─────────────────────────────────────────────
// Listing entries
// ─────────────────────────────────────────────

/// A provider as shown in selection lists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProviderEntry {
    pub key: String,
    pub label: String,
}

/// A model as shown in selection lists; the label is the model id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ModelEntry {
    pub key: String,
    pub label: String,
}

// ─────────────────────────────────────────────
// Registry
// ─────────────────────────────────────────────

/// Process-wide, read-only table of providers.
pub struct Registry {
    providers: Vec<Arc<dyn ChatProvider>>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.providers.iter().map(|p| p.key()))
            .finish()
    }
}

impl Registry {
    /// Build the registry for every spec in [`PROVIDERS`].
    ///
    /// Local specs are served by `simulator`; the others get an
    /// [`HttpProvider`] configured from `config.providers`.
    pub fn from_config(config: &Config, simulator: Arc<Simulator>) -> Self {
        let providers = PROVIDERS
            .iter()
            .map(|spec| -> Arc<dyn ChatProvider> {
                if spec.is_local {
                    Arc::clone(&simulator) as Arc<dyn ChatProvider>
                } else {
                    let provider_config = config
                        .providers
                        .get_by_name(spec.name)
                        .cloned()
                        .unwrap_or_default();
                    debug!(
                        provider = spec.display_name,
                        configured = provider_config.is_configured(),
                        "registering provider"
                    );
                    Arc::new(HttpProvider::new(&provider_config, spec)) as Arc<dyn ChatProvider>
                }
            })
            .collect();

        Self { providers }
    }

    /// Build a registry from explicit providers, kept in the given order.
    pub fn with_providers(providers: Vec<Arc<dyn ChatProvider>>) -> Self {
        Self { providers }
    }

    /// Look up a provider by key.
    pub fn resolve(&self, key: &str) -> Option<&dyn ChatProvider> {
        self.providers
            .iter()
            .find(|p| p.key() == key)
            .map(|p| p.as_ref())
    }

    /// Providers whose availability check currently passes, in declaration order.
    pub fn list_available(&self) -> Vec<ProviderEntry> {
        self.providers
            .iter()
            .filter(|p| p.is_available())
            .map(|p| ProviderEntry {
                key: p.key().to_string(),
                label: p.label().to_string(),
            })
            .collect()
    }

    /// Models of a provider, empty if the key is unknown.
    pub fn list_models(&self, key: &str) -> Vec<ModelEntry> {
        self.resolve(key)
            .map(|p| {
                p.models()
                    .iter()
                    .map(|m| ModelEntry {
                        key: m.to_string(),
                        label: m.to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every registered provider, available or not, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn ChatProvider> {
        self.providers.iter().map(|p| p.as_ref())
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
