//! `AiService` — the public surface used by the rest of the application.
//!
//! Wires the registry, runtime store, simulator, and dispatcher together and
//! exposes the six operations callers rely on: `chat_send`, `list_providers`,
//! `list_models`, `get_runtime_config`, `set_runtime_config`, and
//! `stream_mock_response`.

use std::sync::Arc;

use agrobot_core::config::Config;
use agrobot_core::store::KeyValueStore;
use agrobot_core::types::{Message, Reply};

use crate::dispatcher::Dispatcher;
use crate::registry::{ModelEntry, ProviderEntry, Registry};
use crate::runtime::{RuntimeConfig, RuntimeConfigUpdate, RuntimeStore};
use crate::simulator::Simulator;

pub struct AiService {
    registry: Arc<Registry>,
    runtime: Arc<RuntimeStore>,
    simulator: Arc<Simulator>,
    dispatcher: Dispatcher,
}

impl AiService {
    /// Build the service from configuration; the runtime selection is loaded
    /// from `store` right away.
    pub fn new(config: &Config, store: Arc<dyn KeyValueStore>) -> Self {
        let simulator = Arc::new(Simulator::new(config.simulator.clone()));
        let registry = Arc::new(Registry::from_config(config, simulator.clone()));
        Self::from_parts(registry, simulator, store)
    }

    /// Build the service around an existing registry.
    pub fn from_parts(
        registry: Arc<Registry>,
        simulator: Arc<Simulator>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        let runtime = Arc::new(RuntimeStore::load(registry.clone(), store));
        let dispatcher = Dispatcher::new(registry.clone(), runtime.clone(), simulator.clone());
        Self {
            registry,
            runtime,
            simulator,
            dispatcher,
        }
    }

    /// Send a conversation to the selected provider. Never fails: problems
    /// are answered by the simulator.
    pub async fn chat_send(&self, messages: &[Message], overrides: &RuntimeConfigUpdate) -> Reply {
        self.dispatcher.chat_send(messages, overrides).await
    }

    /// Providers that can be selected right now.
    pub fn list_providers(&self) -> Vec<ProviderEntry> {
        self.registry.list_available()
    }

    pub fn list_models(&self, provider: &str) -> Vec<ModelEntry> {
        self.registry.list_models(provider)
    }

    pub fn get_runtime_config(&self) -> RuntimeConfig {
        self.runtime.get()
    }

    pub fn set_runtime_config(&self, update: RuntimeConfigUpdate) {
        self.runtime.set(update)
    }

    /// Reveal `text` word by word through `on_chunk`.
    pub async fn stream_mock_response<F>(&self, text: &str, on_chunk: F)
    where
        F: FnMut(&str),
    {
        self.simulator.stream_mock_response(text, on_chunk).await
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
