//! Configuration system — schema, loading, and env var overrides.
//!
//! # Usage
//! ```no_run
//! use agrobot_core::config;
//!
//! let cfg = config::load_config(None);
//! println!("Groq configured: {}", cfg.providers.groq.is_configured());
//! ```

pub mod loader;
pub mod schema;

pub use loader::{get_config_path, load_config, save_config};
pub use schema::{Config, ProviderConfig, ProvidersConfig, SimulatorConfig, StoreConfig};
