//! Test helpers shared across modules.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::subscriber::DefaultGuard;
use tracing::Level;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

/// WARN and ERROR events seen on the current thread, from every target.
#[derive(Clone, Default)]
pub struct LevelCounts {
    warn: Arc<AtomicUsize>,
    error: Arc<AtomicUsize>,
}

impl LevelCounts {
    /// Install a thread-local subscriber that records into the returned counts
    /// until the guard is dropped.
    pub fn install() -> (Self, DefaultGuard) {
        let counts = Self::default();
        let subscriber = tracing_subscriber::registry().with(counts.clone());
        let guard = tracing::subscriber::set_default(subscriber);
        (counts, guard)
    }

    pub fn warn(&self) -> usize {
        self.warn.load(Ordering::SeqCst)
    }

    pub fn error(&self) -> usize {
        self.error.load(Ordering::SeqCst)
    }
}

impl<S: tracing::Subscriber> Layer<S> for LevelCounts {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        match *event.metadata().level() {
            Level::WARN => self.warn.fetch_add(1, Ordering::SeqCst),
            Level::ERROR => self.error.fetch_add(1, Ordering::SeqCst),
            _ => 0,
        };
    }
}
