use std::collections::HashMap;
use std::env;
use std::str::FromStr;
use thiserror::Error;

/// Configuration trait for application configuration
pub trait AppConfigTrait: Sized {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self, ConfigError>;

    /// Validate the configuration
    fn validate(&self) -> Result<(), ConfigError>;

    /// Get configuration source information for debugging
    fn config_sources(&self) -> HashMap<String, ConfigSource>;
}

/// Where a configuration value came from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    EnvVar(String),
    Default(String),
    Nested,
}

/// Environment enumeration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Testing,
    Production,
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "testing" | "test" => Ok(Environment::Testing),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(ConfigError::InvalidValue {
                field: "environment".to_string(),
                value: s.to_string(),
                expected: "development, testing, or production".to_string(),
            }),
        }
    }
}

/// Application configuration structure
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub name: String,
    pub environment: Environment,
    /// PostgreSQL connection string; the in-memory store is used when absent
    pub database_url: Option<String>,
    /// Create a demo user with one post when storage holds no users
    pub seed_demo_data: bool,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

/// Server bind configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Logging overrides; unset values fall back to the environment preset
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub format: Option<String>,
}

impl AppConfig {
    /// Socket address string the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl AppConfigTrait for AppConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let name = get_env_or_default("APP_NAME", "postkit");
        let environment = get_env_or_default("APP_ENV", "development");
        let environment = Environment::from_str(&environment)?;

        let database_url = get_env_optional("DATABASE_URL");

        let seed_demo_data = get_env_or_default("SEED_DEMO_DATA", "false");
        let seed_demo_data = seed_demo_data
            .parse::<bool>()
            .map_err(|_| ConfigError::InvalidValue {
                field: "seed_demo_data".to_string(),
                value: seed_demo_data,
                expected: "true or false".to_string(),
            })?;

        let server = ServerConfig::from_env()?;
        let logging = LoggingConfig::from_env()?;

        Ok(AppConfig {
            name,
            environment,
            database_url,
            seed_demo_data,
            server,
            logging,
        })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::ValidationFailed {
                field: "name".to_string(),
                reason: "App name cannot be empty".to_string(),
            });
        }

        if let Some(url) = &self.database_url {
            if url.is_empty() {
                return Err(ConfigError::ValidationFailed {
                    field: "database_url".to_string(),
                    reason: "Database URL cannot be empty when set".to_string(),
                });
            }
        }

        // Production data must survive restarts.
        if self.environment == Environment::Production && self.database_url.is_none() {
            return Err(ConfigError::ValidationFailed {
                field: "database_url".to_string(),
                reason: "DATABASE_URL is required in production".to_string(),
            });
        }

        self.server.validate()?;
        self.logging.validate()?;

        Ok(())
    }

    fn config_sources(&self) -> HashMap<String, ConfigSource> {
        let mut sources = HashMap::new();
        sources.insert("name".to_string(), ConfigSource::EnvVar("APP_NAME".to_string()));
        sources.insert(
            "environment".to_string(),
            ConfigSource::EnvVar("APP_ENV".to_string()),
        );
        sources.insert(
            "database_url".to_string(),
            match self.database_url {
                Some(_) => ConfigSource::EnvVar("DATABASE_URL".to_string()),
                None => ConfigSource::Default("in-memory".to_string()),
            },
        );
        sources.insert(
            "seed_demo_data".to_string(),
            ConfigSource::EnvVar("SEED_DEMO_DATA".to_string()),
        );
        sources.insert("server".to_string(), ConfigSource::Nested);
        sources.insert("logging".to_string(), ConfigSource::Nested);
        sources
    }
}

impl AppConfigTrait for ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let host = get_env_or_default("SERVER_HOST", "0.0.0.0");
        let port = get_env_or_default("SERVER_PORT", "3000");
        let port = port.parse::<u16>().map_err(|_| ConfigError::InvalidValue {
            field: "port".to_string(),
            value: port,
            expected: "valid port number (0-65535)".to_string(),
        })?;

        Ok(ServerConfig { host, port })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.host.is_empty() {
            return Err(ConfigError::ValidationFailed {
                field: "host".to_string(),
                reason: "Host cannot be empty".to_string(),
            });
        }

        if self.port == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "port".to_string(),
                reason: "Port cannot be 0".to_string(),
            });
        }

        Ok(())
    }

    fn config_sources(&self) -> HashMap<String, ConfigSource> {
        let mut sources = HashMap::new();
        sources.insert("host".to_string(), ConfigSource::EnvVar("SERVER_HOST".to_string()));
        sources.insert("port".to_string(), ConfigSource::EnvVar("SERVER_PORT".to_string()));
        sources
    }
}

impl AppConfigTrait for LoggingConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let level = get_env_optional("LOG_LEVEL");
        let format = get_env_optional("LOG_FORMAT");

        Ok(LoggingConfig { level, format })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if let Some(level) = &self.level {
            if !valid_levels.contains(&level.to_lowercase().as_str()) {
                return Err(ConfigError::InvalidValue {
                    field: "level".to_string(),
                    value: level.clone(),
                    expected: "trace, debug, info, warn, or error".to_string(),
                });
            }
        }

        let valid_formats = ["compact", "pretty", "json"];
        if let Some(format) = &self.format {
            if !valid_formats.contains(&format.to_lowercase().as_str()) {
                return Err(ConfigError::InvalidValue {
                    field: "format".to_string(),
                    value: format.clone(),
                    expected: "compact, pretty, or json".to_string(),
                });
            }
        }

        Ok(())
    }

    fn config_sources(&self) -> HashMap<String, ConfigSource> {
        let mut sources = HashMap::new();
        sources.insert("level".to_string(), ConfigSource::EnvVar("LOG_LEVEL".to_string()));
        sources.insert("format".to_string(), ConfigSource::EnvVar("LOG_FORMAT".to_string()));
        sources
    }
}

fn get_env_optional(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}")]
    MissingEnvVar { var: String },

    #[error("Invalid value for {field}: '{value}', expected {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },

    #[error("Validation failed for {field}: {reason}")]
    ValidationFailed { field: String, reason: String },
}
