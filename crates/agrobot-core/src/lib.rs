//! Core building blocks shared by the Agrobot crates.
//!
//! - [`types`] — chat messages and replies
//! - [`config`] — configuration schema, loading, and env var overrides
//! - [`store`] — key-value persistence used for the runtime selection
//! - [`utils`] — path and string helpers

pub mod config;
pub mod store;
pub mod types;
pub mod utils;

pub use types::{Message, Reply, Role};
