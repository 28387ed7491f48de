//! Chat dispatcher — routes a conversation to the selected provider and
//! degrades to the simulator when that provider is missing, unavailable, or
//! fails.
//!
//! [`Dispatcher::try_send`] keeps failures typed; [`Dispatcher::chat_send`]
//! turns every failure into a simulated reply and never errors.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use agrobot_core::types::{Message, Reply};

use crate::error::ProviderError;
use crate::registry::Registry;
use crate::runtime::{RuntimeConfigUpdate, RuntimeStore};
use crate::simulator::Simulator;
use crate::traits::CallParams;

/// Prefix of replies produced because the provider could not be used.
pub const UNAVAILABLE_MARKER: &str = "[Provider unavailable - simulation]";

/// Prefix of replies produced because the provider call failed.
pub const ERROR_MARKER: &str = "[Provider error - simulation]";

/// Why a dispatch did not produce a provider reply.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("provider '{0}' is not registered")]
    UnknownProvider(String),

    #[error("provider '{0}' is not available")]
    Unavailable(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

pub struct Dispatcher {
    registry: Arc<Registry>,
    runtime: Arc<RuntimeStore>,
    simulator: Arc<Simulator>,
}

impl Dispatcher {
    pub fn new(registry: Arc<Registry>, runtime: Arc<RuntimeStore>, simulator: Arc<Simulator>) -> Self {
        Self {
            registry,
            runtime,
            simulator,
        }
    }

    /// One attempt against the effective provider, without fallback.
    ///
    /// Effective parameters are the runtime selection at call time with
    /// `overrides` applied field by field.
    pub async fn try_send(
        &self,
        messages: &[Message],
        overrides: &RuntimeConfigUpdate,
    ) -> Result<Reply, DispatchError> {
        let effective = self.runtime.get().merged(overrides);

        let provider = self
            .registry
            .resolve(&effective.provider)
            .ok_or_else(|| DispatchError::UnknownProvider(effective.provider.clone()))?;

        if !provider.is_available() {
            return Err(DispatchError::Unavailable(effective.provider));
        }

        debug!(
            provider = provider.key(),
            model = %effective.model,
            temperature = effective.temperature,
            "dispatching chat"
        );

        let params = CallParams {
            model: effective.model,
            temperature: effective.temperature,
        };
        Ok(provider.invoke(messages, &params).await?)
    }

    /// Send a conversation; always resolves to a reply.
    pub async fn chat_send(&self, messages: &[Message], overrides: &RuntimeConfigUpdate) -> Reply {
        match self.try_send(messages, overrides).await {
            Ok(reply) => reply,
            Err(e @ (DispatchError::UnknownProvider(_) | DispatchError::Unavailable(_))) => {
                debug!(reason = %e, "provider unusable, answering with simulation");
                self.simulator
                    .mock_reply(messages, Some(UNAVAILABLE_MARKER))
                    .await
            }
            Err(DispatchError::Provider(e)) => {
                warn!(provider = e.provider(), error = %e, "provider call failed, answering with simulation");
                self.simulator.mock_reply(messages, Some(ERROR_MARKER)).await
            }
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
