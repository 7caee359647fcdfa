//! Structured logging setup
//!
//! One `tracing` subscriber per process, filtered by `RUST_LOG` when set and
//! by the configured level otherwise. Output is compact text, pretty text or
//! JSON lines.

use postkit_core::Environment;
use std::io;
use tracing_subscriber::{fmt::Layer, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Output format of log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Compact,
        }
    }
}

/// Logging configuration for the service
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default log level (e.g., "info", "debug", "warn")
    pub level: String,
    pub format: LogFormat,
    /// Include file and line number information
    pub include_location: bool,
    /// Per-target directives appended to the level (e.g. "sqlx=warn")
    pub targets: Vec<String>,
    pub service_name: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
            include_location: false,
            targets: Vec::new(),
            service_name: None,
        }
    }
}

impl LoggingConfig {
    pub fn production() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Json,
            include_location: false,
            targets: vec!["tower_http=warn".to_string(), "sqlx=warn".to_string()],
            service_name: None,
        }
    }

    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            format: LogFormat::Pretty,
            include_location: true,
            targets: vec!["tower_http=debug".to_string(), "sqlx=info".to_string()],
            service_name: None,
        }
    }

    /// Minimal output for test runs
    pub fn test() -> Self {
        Self {
            level: "error".to_string(),
            format: LogFormat::Compact,
            include_location: false,
            targets: Vec::new(),
            service_name: None,
        }
    }

    /// Preset matching the deployment environment
    pub fn for_environment(environment: &Environment) -> Self {
        match environment {
            Environment::Production => Self::production(),
            Environment::Development => Self::development(),
            Environment::Testing => Self::test(),
        }
    }

    /// Apply `LOG_LEVEL` / `LOG_FORMAT` when they are set
    pub fn with_app_settings(mut self, settings: &postkit_core::LoggingConfig) -> Self {
        if let Some(level) = &settings.level {
            self.level = level.to_lowercase();
        }
        if let Some(format) = &settings.format {
            self.format = LogFormat::parse(format);
        }
        self
    }

    pub fn with_service(mut self, name: &str) -> Self {
        self.service_name = Some(name.to_string());
        self
    }

    fn filter_directive(&self) -> String {
        std::iter::once(self.level.as_str())
            .chain(self.targets.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.filter_directive()))?;

    let registry = tracing_subscriber::registry().with(filter);
    let layer = Layer::new()
        .with_writer(io::stdout)
        .with_file(config.include_location)
        .with_line_number(config.include_location);

    match config.format {
        LogFormat::Json => registry.with(layer.json()).try_init()?,
        LogFormat::Pretty => registry.with(layer.pretty()).try_init()?,
        LogFormat::Compact => registry.with(layer.compact()).try_init()?,
    }

    tracing::info!(
        target: "postkit::logging",
        service = config.service_name.as_deref().unwrap_or("postkit"),
        level = %config.level,
        format = ?config.format,
        "Structured logging initialized"
    );

    Ok(())
}
