//! Runtime selection — which provider, model, and temperature to use.
//!
//! Loaded once from the key-value store (or computed from provider
//! availability), mutated only through [`RuntimeStore::set`], and persisted
//! after every mutation. Store failures are logged and ignored: the in-memory
//! value stays authoritative.

use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use agrobot_core::store::{KeyValueStore, StoreError};

use crate::registry::{simulator_spec, Registry, DEFAULT_PRIORITY, SIMULATOR_KEY};

/// Store key of the persisted selection.
pub const RUNTIME_STORAGE_KEY: &str = "ai_runtime_v1";

/// Temperature of a freshly computed selection.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

// ─────────────────────────────────────────────
// RuntimeConfig
// ─────────────────────────────────────────────

/// The active selection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Registry key. May be unknown to the registry, see [`RuntimeStore::set`].
    pub provider: String,
    pub model: String,
    pub temperature: f64,
}

impl RuntimeConfig {
    /// Field-wise merge: fields set in `update` win.
    pub fn merged(&self, update: &RuntimeConfigUpdate) -> RuntimeConfig {
        RuntimeConfig {
            provider: update
                .provider
                .clone()
                .unwrap_or_else(|| self.provider.clone()),
            model: update.model.clone().unwrap_or_else(|| self.model.clone()),
            temperature: update.temperature.unwrap_or(self.temperature),
        }
    }
}

/// Partial [`RuntimeConfig`]; also used as per-call overrides.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RuntimeConfigUpdate {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f64>,
}

impl RuntimeConfigUpdate {
    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.provider.is_none() && self.model.is_none() && self.temperature.is_none()
    }
}

// ─────────────────────────────────────────────
// RuntimeStore
// ─────────────────────────────────────────────

/// Owner of the active selection and its persistence.
pub struct RuntimeStore {
    registry: Arc<Registry>,
    store: Arc<dyn KeyValueStore>,
    current: RwLock<RuntimeConfig>,
}

impl RuntimeStore {
    /// Load the persisted selection, or compute a default one.
    ///
    /// A missing, unreadable, or corrupt entry yields the first available
    /// provider in [`DEFAULT_PRIORITY`] order with its default model.
    pub fn load(registry: Arc<Registry>, store: Arc<dyn KeyValueStore>) -> Self {
        let current = match read_persisted(store.as_ref()) {
            Some(config) => {
                info!(provider = %config.provider, model = %config.model, "runtime selection restored");
                config
            }
            None => {
                let config = default_selection(&registry);
                info!(provider = %config.provider, model = %config.model, "using default runtime selection");
                config
            }
        };

        Self {
            registry,
            store,
            current: RwLock::new(current),
        }
    }

    /// Snapshot of the current selection.
    pub fn get(&self) -> RuntimeConfig {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Merge `update` into the selection, fix up the model, and persist.
    ///
    /// An unknown provider key is stored as given; the simulator's model list
    /// is then used to validate the model. A model outside the provider's list
    /// is replaced by the provider's default model.
    pub fn set(&self, update: RuntimeConfigUpdate) {
        let mut current = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        let mut next = current.merged(&update);

        let (models, default_model) = match self.registry.resolve(&next.provider) {
            Some(provider) => (provider.models(), provider.default_model().to_string()),
            None => {
                warn!(provider = %next.provider, "unknown provider key, validating model against the simulator");
                self.simulator_models()
            }
        };

        if !models.iter().any(|m| *m == next.model) {
            debug!(model = %next.model, fallback = %default_model, "model not offered by provider, resetting");
            next.model = default_model;
        }

        *current = next;

        if let Err(e) = persist(self.store.as_ref(), &current) {
            warn!(error = %e, "failed to persist runtime selection, keeping it in memory");
        }
    }

    fn simulator_models(&self) -> (&[&'static str], String) {
        match self.registry.resolve(SIMULATOR_KEY) {
            Some(sim) => (sim.models(), sim.default_model().to_string()),
            None => {
                let spec = simulator_spec();
                (spec.models, spec.default_model.to_string())
            }
        }
    }
}

/// Compute the initial selection: groq → openai → mock.
fn default_selection(registry: &Registry) -> RuntimeConfig {
    DEFAULT_PRIORITY
        .iter()
        .filter_map(|key| registry.resolve(key))
        .find(|provider| provider.is_available())
        .map(|provider| RuntimeConfig {
            provider: provider.key().to_string(),
            model: provider.default_model().to_string(),
            temperature: DEFAULT_TEMPERATURE,
        })
        .unwrap_or_else(|| {
            let spec = simulator_spec();
            RuntimeConfig {
                provider: spec.name.to_string(),
                model: spec.default_model.to_string(),
                temperature: DEFAULT_TEMPERATURE,
            }
        })
}

fn read_persisted(store: &dyn KeyValueStore) -> Option<RuntimeConfig> {
    let raw = match store.get(RUNTIME_STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!(error = %e, "failed to read runtime selection");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!(error = %e, "ignoring corrupt runtime selection");
            None
        }
    }
}

fn persist(store: &dyn KeyValueStore, config: &RuntimeConfig) -> Result<(), StoreError> {
    let json = serde_json::to_string(config).map_err(|source| StoreError::Serialize {
        key: RUNTIME_STORAGE_KEY.to_string(),
        source,
    })?;
    store.set(RUNTIME_STORAGE_KEY, &json)
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulator::Simulator;
    use agrobot_core::config::{Config, SimulatorConfig};
    use agrobot_core::store::MemoryStore;

    /// A store whose reads and writes always fail.
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Unavailable("read rejected".into()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("write rejected".into()))
        }
    }

    fn registry(groq: bool, openai: bool) -> Arc<Registry> {
        let mut config = Config::default();
        if groq {
            config.providers.groq.api_key = "gsk-test".into();
        }
        if openai {
            config.providers.openai.api_key = "sk-test".into();
        }
        let simulator = Arc::new(Simulator::new(SimulatorConfig::instant()));
        Arc::new(Registry::from_config(&config, simulator))
    }

    fn memory() -> Arc<MemoryStore> {
        Arc::new(MemoryStore::new())
    }

    #[test]
    fn test_default_prefers_groq() {
        let runtime = RuntimeStore::load(registry(true, true), memory());
        let cfg = runtime.get();
        assert_eq!(cfg.provider, "groq");
        assert_eq!(cfg.model, "llama-3.1-8b-instant");
        assert_eq!(cfg.temperature, 0.7);
    }

    #[test]
    fn test_default_then_openai() {
        let cfg = RuntimeStore::load(registry(false, true), memory()).get();
        assert_eq!(cfg.provider, "openai");
        assert_eq!(cfg.model, "gpt-4o-mini");
    }

    #[test]
    fn test_default_falls_back_to_mock() {
        let cfg = RuntimeStore::load(registry(false, false), memory()).get();
        assert_eq!(cfg.provider, "mock");
        assert_eq!(cfg.model, "mock-sim");
    }

    #[test]
    fn test_default_with_empty_registry() {
        let empty = Arc::new(Registry::with_providers(Vec::new()));
        let cfg = RuntimeStore::load(empty, memory()).get();
        assert_eq!(cfg.provider, "mock");
        assert_eq!(cfg.model, "mock-sim");
    }

    #[test]
    fn test_loads_persisted_selection() {
        let store = memory();
        store
            .set(
                RUNTIME_STORAGE_KEY,
                r#"{"provider":"openai","model":"gpt-4o","temperature":0.2}"#,
            )
            .unwrap();

        let cfg = RuntimeStore::load(registry(true, true), store).get();
        assert_eq!(
            cfg,
            RuntimeConfig {
                provider: "openai".into(),
                model: "gpt-4o".into(),
                temperature: 0.2,
            }
        );
    }

    #[test]
    fn test_corrupt_entry_uses_default() {
        let store = memory();
        store.set(RUNTIME_STORAGE_KEY, "{not json").unwrap();
        let cfg = RuntimeStore::load(registry(false, true), store).get();
        assert_eq!(cfg.provider, "openai");
    }

    #[test]
    fn test_invalid_model_resets_to_default() {
        let runtime = RuntimeStore::load(registry(true, false), memory());
        runtime.set(RuntimeConfigUpdate::default().model("not-in-list"));
        assert_eq!(runtime.get().model, "llama-3.1-8b-instant");
    }

    #[test]
    fn test_valid_model_is_kept() {
        let runtime = RuntimeStore::load(registry(true, false), memory());
        runtime.set(RuntimeConfigUpdate::default().model("mixtral-8x7b-32768"));
        assert_eq!(runtime.get().model, "mixtral-8x7b-32768");
    }

    #[test]
    fn test_switching_provider_resets_foreign_model() {
        let runtime = RuntimeStore::load(registry(true, true), memory());
        runtime.set(RuntimeConfigUpdate::default().provider("openai"));
        let cfg = runtime.get();
        assert_eq!(cfg.provider, "openai");
        assert_eq!(cfg.model, "gpt-4o-mini");
    }

    #[test]
    fn test_switching_to_unavailable_provider_is_stored() {
        let runtime = RuntimeStore::load(registry(false, false), memory());
        runtime.set(RuntimeConfigUpdate::default().provider("openai").model("gpt-4o"));
        let cfg = runtime.get();
        assert_eq!(cfg.provider, "openai");
        assert_eq!(cfg.model, "gpt-4o");
    }

    #[test]
    fn test_unknown_provider_kept_and_model_checked_against_simulator() {
        let runtime = RuntimeStore::load(registry(false, false), memory());
        runtime.set(RuntimeConfigUpdate::default().provider("anthropic").model("claude"));
        let cfg = runtime.get();
        assert_eq!(cfg.provider, "anthropic");
        assert_eq!(cfg.model, "mock-sim");
    }

    #[test]
    fn test_temperature_update_only() {
        let runtime = RuntimeStore::load(registry(false, false), memory());
        runtime.set(RuntimeConfigUpdate::default().temperature(0.1));
        let cfg = runtime.get();
        assert_eq!(cfg.temperature, 0.1);
        assert_eq!(cfg.provider, "mock");
        assert_eq!(cfg.model, "mock-sim");
    }

    #[test]
    fn test_get_returns_a_copy() {
        let runtime = RuntimeStore::load(registry(false, false), memory());
        let mut snapshot = runtime.get();
        snapshot.provider = "groq".into();
        assert_eq!(runtime.get().provider, "mock");
    }

    #[test]
    fn test_set_persists_and_reload_matches() {
        let store = memory();
        let reg = registry(true, true);

        let runtime = RuntimeStore::load(reg.clone(), store.clone());
        runtime.set(
            RuntimeConfigUpdate::default()
                .provider("openai")
                .model("gpt-4o")
                .temperature(0.35),
        );
        let before = runtime.get();

        let raw = store.get(RUNTIME_STORAGE_KEY).unwrap().unwrap();
        let stored: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            stored,
            serde_json::json!({"provider": "openai", "model": "gpt-4o", "temperature": 0.35})
        );

        let reloaded = RuntimeStore::load(reg, store).get();
        assert_eq!(reloaded, before);
    }

    #[test]
    fn test_broken_store_is_not_fatal() {
        let runtime = RuntimeStore::load(registry(false, true), Arc::new(BrokenStore));
        assert_eq!(runtime.get().provider, "openai");

        runtime.set(RuntimeConfigUpdate::default().model("gpt-4o"));
        assert_eq!(runtime.get().model, "gpt-4o");
    }

    #[test]
    fn test_update_builder() {
        let update = RuntimeConfigUpdate::default();
        assert!(update.is_empty());
        let update = update.temperature(0.5);
        assert!(!update.is_empty());
        assert_eq!(update.temperature, Some(0.5));
    }

    #[test]
    fn test_merged_prefers_update() {
        let base = RuntimeConfig {
            provider: "groq".into(),
            model: "llama-3.1-8b-instant".into(),
            temperature: 0.7,
        };
        let merged = base.merged(&RuntimeConfigUpdate::default().model("mixtral-8x7b-32768"));
        assert_eq!(merged.provider, "groq");
        assert_eq!(merged.model, "mixtral-8x7b-32768");
        assert_eq!(merged.temperature, 0.7);
    }
}
