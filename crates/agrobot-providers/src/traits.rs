//! Chat provider trait — the seam between the dispatcher and each backend.
//!
//! The simulator and the OpenAI-compatible `HttpProvider` both implement it;
//! tests plug in their own stubs.

use async_trait::async_trait;

use agrobot_core::types::{Message, Reply};

use crate::error::ProviderError;

/// Parameters of a single call.
#[derive(Clone, Debug, PartialEq)]
pub struct CallParams {
    /// Model identifier (e.g. `"llama-3.1-8b-instant"`).
    pub model: String,
    /// Sampling temperature, intended range 0.0 – 1.0.
    pub temperature: f64,
}

/// A named backend able to answer a conversation.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Registry key (e.g. `"groq"`).
    fn key(&self) -> &str;

    /// Human-readable name for lists and logs.
    fn label(&self) -> &str;

    /// Whether the provider can be invoked right now.
    ///
    /// Must be cheap and side-effect free: no network, no caching.
    fn is_available(&self) -> bool;

    fn default_model(&self) -> &str;

    /// Supported models, in declaration order. Never empty.
    fn models(&self) -> &[&'static str];

    /// Answer the conversation. A single attempt, no retry.
    async fn invoke(&self, messages: &[Message], params: &CallParams)
        -> Result<Reply, ProviderError>;
}
