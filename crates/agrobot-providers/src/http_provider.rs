//! HTTP provider for OpenAI-compatible `/chat/completions` APIs.
//!
//! Serves both Groq and OpenAI: same wire format, different base URL and key.
//! One POST per call, no retry, no streaming.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use agrobot_core::config::ProviderConfig;
use agrobot_core::types::{Message, Reply, Role};

use crate::error::ProviderError;
use crate::registry::ProviderSpec;
use crate::traits::{CallParams, ChatProvider};

/// Returned when the API answers without usable content.
pub const EMPTY_REPLY_PLACEHOLDER: &str = "[Empty response]";

// ─────────────────────────────────────────────
// Wire format
// ─────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    temperature: f64,
    messages: Vec<WireMessage<'a>>,
}

/// A message reduced to the fields the API accepts.
#[derive(Debug, PartialEq, Serialize)]
struct WireMessage<'a> {
    role: Role,
    content: &'a str,
}

impl<'a> From<&'a Message> for WireMessage<'a> {
    fn from(msg: &'a Message) -> Self {
        WireMessage {
            role: msg.role,
            content: &msg.content,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ChatCompletionResponse {
    choices: Option<Vec<Choice>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ChoiceMessage {
    content: Option<String>,
}

impl ChatCompletionResponse {
    /// Trimmed content of the first choice, if any.
    fn first_content(self) -> Option<String> {
        self.choices?
            .into_iter()
            .next()?
            .message?
            .content
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
    }
}

// ─────────────────────────────────────────────
// HttpProvider
// ─────────────────────────────────────────────

/// A provider that talks to an OpenAI-compatible HTTP API.
pub struct HttpProvider {
    /// HTTP client (shared, connection-pooled).
    client: reqwest::Client,
    /// API base URL (e.g. `"https://api.groq.com/openai/v1"`).
    api_base: String,
    /// API key for Bearer authentication; empty when not configured.
    api_key: String,
    /// Static spec: key, label, models.
    spec: &'static ProviderSpec,
}

impl std::fmt::Debug for HttpProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpProvider")
            .field("api_base", &self.api_base)
            .field("provider", &self.spec.display_name)
            .field("configured", &self.is_available())
            .finish()
    }
}

impl HttpProvider {
    /// Create a provider from the user's config and the static spec.
    ///
    /// API base: config > spec default > standard OpenAI path.
    pub fn new(config: &ProviderConfig, spec: &'static ProviderSpec) -> Self {
        let api_base = config
            .api_base
            .clone()
            .or_else(|| spec.default_api_base.map(String::from))
            .unwrap_or_else(|| "https://api.openai.com/v1".to_string());

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().unwrap_or_else(|e| {
            warn!(provider = spec.display_name, error = %e, "falling back to default HTTP client");
            reqwest::Client::new()
        });

        HttpProvider {
            client,
            api_base,
            api_key: config.api_key.trim().to_string(),
            spec,
        }
    }

    /// Build the full chat completions URL.
    fn completions_url(&self) -> String {
        let base = self.api_base.trim_end_matches('/');
        format!("{}/chat/completions", base)
    }
}

#[async_trait]
impl ChatProvider for HttpProvider {
    fn key(&self) -> &str {
        self.spec.name
    }

    fn label(&self) -> &str {
        self.spec.display_name
    }

    fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    fn default_model(&self) -> &str {
        self.spec.default_model
    }

    fn models(&self) -> &[&'static str] {
        self.spec.models
    }

    async fn invoke(
        &self,
        messages: &[Message],
        params: &CallParams,
    ) -> Result<Reply, ProviderError> {
        let provider = self.spec.display_name;
        if !self.is_available() {
            return Err(ProviderError::MissingCredential { provider });
        }

        debug!(
            provider,
            model = %params.model,
            temperature = params.temperature,
            messages = messages.len(),
            "Calling provider"
        );

        let request_body = ChatCompletionRequest {
            model: &params.model,
            temperature: params.temperature,
            messages: messages.iter().map(WireMessage::from).collect(),
        };

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|source| {
                debug!(provider, error = %source, "HTTP request failed");
                ProviderError::Transport { provider, source }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            debug!(provider, status = %status, body = %body, "API error");
            return Err(ProviderError::Api {
                provider,
                status,
                body,
            });
        }

        let parsed = response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|source| ProviderError::Decode { provider, source })?;

        let content = parsed.first_content().unwrap_or_else(|| {
            debug!(provider, "empty completion, using placeholder");
            EMPTY_REPLY_PLACEHOLDER.to_string()
        });

        Ok(Reply::assistant(content))
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
