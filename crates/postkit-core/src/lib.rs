//! # postkit-core
//!
//! Configuration shared by every postkit crate: the [`AppConfigTrait`]
//! contract and the top-level [`AppConfig`] loaded from the environment.

pub mod app_config;

pub use app_config::{
    AppConfig, AppConfigTrait, ConfigError, ConfigSource, Environment, LoggingConfig,
    ServerConfig,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get the crate version
pub fn version() -> &'static str {
    VERSION
}
