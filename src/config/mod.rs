//! Runtime configuration.
//!
//! Settings are plain serde structs with per-field defaults, loadable from
//! TOML and validated before a store is built.

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::RuntimeConfig;
