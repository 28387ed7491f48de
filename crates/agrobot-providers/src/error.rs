//! Errors raised by provider calls.
//!
//! These never reach callers of `chat_send`: the dispatcher logs them and
//! answers with a simulated reply instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    /// No credential configured; raised before any network I/O.
    #[error("missing {provider} API key")]
    MissingCredential { provider: &'static str },

    /// The API answered with a non-2xx status.
    #[error("{provider} API error: {status} — {body}")]
    Api {
        provider: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },

    /// The request never completed (DNS, connect, TLS, timeout, ...).
    #[error("{provider} request failed: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The response body was not valid JSON.
    #[error("{provider} returned an unreadable response: {source}")]
    Decode {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

impl ProviderError {
    /// Display name of the provider that failed.
    pub fn provider(&self) -> &'static str {
        match self {
            ProviderError::MissingCredential { provider }
            | ProviderError::Api { provider, .. }
            | ProviderError::Transport { provider, .. }
            | ProviderError::Decode { provider, .. } => provider,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_message() {
        let err = ProviderError::MissingCredential { provider: "Groq" };
        assert_eq!(err.to_string(), "missing Groq API key");
        assert_eq!(err.provider(), "Groq");
    }

    #[test]
    fn test_api_error_carries_provider_and_status() {
        let err = ProviderError::Api {
            provider: "OpenAI",
            status: reqwest::StatusCode::TOO_MANY_REQUESTS,
            body: "slow down".into(),
        };
        let text = err.to_string();
        assert!(text.contains("OpenAI API error"));
        assert!(text.contains("429"));
        assert!(text.contains("slow down"));
    }
}
