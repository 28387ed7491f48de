//! Provider layer for Agrobot.
//!
//! # Architecture
//!
//! - [`traits::ChatProvider`] — trait every backend implements
//! - [`registry`] — static specs (simulator, Groq, OpenAI) + the runtime lookup table
//! - [`http_provider::HttpProvider`] — OpenAI-compatible HTTP client
//! - [`simulator::Simulator`] — canned replies and word-by-word streaming
//! - [`runtime`] — persisted provider/model/temperature selection
//! - [`dispatcher`] — send with fallback to the simulator
//! - [`service::AiService`] — the public facade

pub mod dispatcher;
pub mod error;
pub mod http_provider;
pub mod registry;
pub mod runtime;
pub mod service;
pub mod simulator;
pub mod traits;

#[cfg(test)]
mod test_support;

// Re-export main types for convenience
pub use dispatcher::{DispatchError, Dispatcher, ERROR_MARKER, UNAVAILABLE_MARKER};
pub use error::ProviderError;
pub use http_provider::HttpProvider;
pub use registry::{ModelEntry, ProviderEntry, ProviderSpec, Registry, PROVIDERS};
pub use runtime::{RuntimeConfig, RuntimeConfigUpdate, RuntimeStore};
pub use service::AiService;
pub use simulator::Simulator;
pub use traits::{CallParams, ChatProvider};
