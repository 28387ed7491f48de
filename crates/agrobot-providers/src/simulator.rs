//! Local simulator — canned replies with simulated latency.
//!
//! Serves as the `mock` provider and as the dispatcher's fallback path. It is
//! also the only component that streams: [`Simulator::stream_mock_response`]
//! reveals a text one word at a time.

use std::time::Duration;

use async_trait::async_trait;
use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::debug;

use agrobot_core::config::SimulatorConfig;
use agrobot_core::types::{last_user_message, Message, Reply};
use agrobot_core::utils::truncate_chars;

use crate::error::ProviderError;
use crate::registry::{simulator_spec, ProviderSpec};
use crate::traits::{CallParams, ChatProvider};

/// Maximum number of characters of the user message echoed back.
const ECHO_MAX_CHARS: usize = 80;

/// Echoed when the conversation has no user message.
const NO_USER_MESSAGE: &str = "...";

/// Tips appended to every simulated reply.
pub const FARM_TIPS: &[&str] = &[
    "Keep an eye on the 7-day trend.",
    "Rain above 10 mm can postpone irrigation.",
    "Combine local sensor data with forecasts to optimize.",
    "Sandy soils drain faster: adjust the water supply.",
];

/// Canned-reply generator.
#[derive(Clone, Debug)]
pub struct Simulator {
    min_delay: Duration,
    max_delay: Duration,
    stream_interval: Duration,
    spec: &'static ProviderSpec,
}

impl Simulator {
    pub fn new(config: SimulatorConfig) -> Self {
        Self {
            min_delay: Duration::from_millis(config.min_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
            stream_interval: Duration::from_millis(config.stream_interval_ms),
            spec: simulator_spec(),
        }
    }

    /// Produce a simulated assistant reply.
    ///
    /// Waits a random delay in `[min_delay, max_delay)`, echoes the latest user
    /// message (first 80 characters) and appends a random tip. A non-empty
    /// `prefix` is put in front, separated by a space.
    pub async fn mock_reply(&self, messages: &[Message], prefix: Option<&str>) -> Reply {
        let delay = self.pick_delay();
        tokio::time::sleep(delay).await;

        let base = last_user_message(messages)
            .map(|m| m.content.as_str())
            .filter(|c| !c.is_empty())
            .unwrap_or(NO_USER_MESSAGE);

        let body = format!(
            "Simulated AI: \"{}\" - {}",
            truncate_chars(base, ECHO_MAX_CHARS),
            pick_tip()
        );

        debug!(delay_ms = delay.as_millis() as u64, prefixed = prefix.is_some(), "simulated reply");

        match prefix {
            Some(p) if !p.is_empty() => Reply::assistant(format!("{p} {body}")),
            _ => Reply::assistant(body),
        }
    }

    /// Reveal `text` word by word.
    ///
    /// Every `stream_interval`, `on_chunk` receives the words emitted so far
    /// joined by single spaces. Returns once the full text was emitted; text
    /// without any word emits nothing.
    pub async fn stream_mock_response<F>(&self, text: &str, mut on_chunk: F)
    where
        F: FnMut(&str),
    {
        let mut emitted = String::with_capacity(text.len());
        for (i, word) in text.split_whitespace().enumerate() {
            tokio::time::sleep(self.stream_interval).await;
            if i > 0 {
                emitted.push(' ');
            }
            emitted.push_str(word);
            on_chunk(&emitted);
        }
    }

    fn pick_delay(&self) -> Duration {
        if self.max_delay <= self.min_delay {
            return self.min_delay;
        }
        rand::rng().random_range(self.min_delay..self.max_delay)
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new(SimulatorConfig::default())
    }
}

fn pick_tip() -> &'static str {
    FARM_TIPS
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(FARM_TIPS[0])
}

#[async_trait]
impl ChatProvider for Simulator {
    fn key(&self) -> &str {
        self.spec.name
    }

    fn label(&self) -> &str {
        self.spec.display_name
    }

    fn is_available(&self) -> bool {
        true
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
        _params: &CallParams,
    ) -> Result<Reply, ProviderError> {
        Ok(self.mock_reply(messages, None).await)
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
