//! HTTP server configuration
//!
//! Read from `HTTP_*` environment variables through the shared
//! [`AppConfigTrait`] contract.

use postkit_core::{AppConfigTrait, ConfigError, ConfigSource};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::routes::USERS_PREFIX;

/// HTTP server specific configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
    /// Maximum request body size in bytes
    pub max_request_size: usize,
    /// Enable request tracing
    pub enable_tracing: bool,
    /// Health check endpoint path
    pub health_check_path: String,
    /// Grace period for in-flight requests on shutdown, in seconds
    pub shutdown_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            max_request_size: 16 * 1024 * 1024,
            enable_tracing: true,
            health_check_path: "/health".to_string(),
            shutdown_timeout_secs: 10,
        }
    }
}

impl HttpConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

impl AppConfigTrait for HttpConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = HttpConfig::default();

        Ok(HttpConfig {
            request_timeout_secs: parse_env(
                "HTTP_REQUEST_TIMEOUT",
                "request_timeout_secs",
                defaults.request_timeout_secs,
                "valid number of seconds",
            )?,
            max_request_size: parse_env(
                "HTTP_MAX_REQUEST_SIZE",
                "max_request_size",
                defaults.max_request_size,
                "valid number of bytes",
            )?,
            enable_tracing: parse_env(
                "HTTP_ENABLE_TRACING",
                "enable_tracing",
                defaults.enable_tracing,
                "true or false",
            )?,
            health_check_path: env::var("HTTP_HEALTH_CHECK_PATH")
                .unwrap_or(defaults.health_check_path),
            shutdown_timeout_secs: parse_env(
                "HTTP_SHUTDOWN_TIMEOUT",
                "shutdown_timeout_secs",
                defaults.shutdown_timeout_secs,
                "valid number of seconds",
            )?,
        })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("request_timeout_secs", self.request_timeout_secs == 0, "Request timeout"),
            ("shutdown_timeout_secs", self.shutdown_timeout_secs == 0, "Shutdown timeout"),
            ("max_request_size", self.max_request_size == 0, "Maximum request size"),
        ];
        for (field, is_zero, label) in positive {
            if is_zero {
                return Err(ConfigError::ValidationFailed {
                    field: field.to_string(),
                    reason: format!("{} must be greater than 0", label),
                });
            }
        }

        if !self.health_check_path.starts_with('/') {
            return Err(ConfigError::ValidationFailed {
                field: "health_check_path".to_string(),
                reason: "Health check path must be non-empty and start with '/'".to_string(),
            });
        }

        // must not collide with the posts resource routes
        let path = self.health_check_path.trim_end_matches('/');
        if path == USERS_PREFIX
            || path.starts_with(&format!("{}/", USERS_PREFIX))
            || self.health_check_path.contains([':', '*'])
        {
            return Err(ConfigError::ValidationFailed {
                field: "health_check_path".to_string(),
                reason: format!(
                    "Health check path must be a literal path outside {}",
                    USERS_PREFIX
                ),
            });
        }

        Ok(())
    }

    fn config_sources(&self) -> HashMap<String, ConfigSource> {
        [
            ("request_timeout_secs", "HTTP_REQUEST_TIMEOUT"),
            ("max_request_size", "HTTP_MAX_REQUEST_SIZE"),
            ("enable_tracing", "HTTP_ENABLE_TRACING"),
            ("health_check_path", "HTTP_HEALTH_CHECK_PATH"),
            ("shutdown_timeout_secs", "HTTP_SHUTDOWN_TIMEOUT"),
        ]
        .into_iter()
        .map(|(field, var)| {
            let source = if env::var(var).is_ok() {
                ConfigSource::EnvVar(var.to_string())
            } else {
                ConfigSource::Default(var.to_string())
            };
            (field.to_string(), source)
        })
        .collect()
    }
}

fn parse_env<T: FromStr>(
    key: &str,
    field: &str,
    default: T,
    expected: &str,
) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().map_err(|_| ConfigError::InvalidValue {
            field: field.to_string(),
            value: raw,
            expected: expected.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 5] = [
        "HTTP_REQUEST_TIMEOUT",
        "HTTP_MAX_REQUEST_SIZE",
        "HTTP_ENABLE_TRACING",
        "HTTP_HEALTH_CHECK_PATH",
        "HTTP_SHUTDOWN_TIMEOUT",
    ];

    fn clean_test_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_http_config_defaults() {
        clean_test_env();

        let config = HttpConfig::from_env().unwrap();
        assert_eq!(config, HttpConfig::default());
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.shutdown_timeout(), Duration::from_secs(10));
        assert!(config.validate().is_ok());
        assert_eq!(
            config.config_sources().get("enable_tracing"),
            Some(&ConfigSource::Default("HTTP_ENABLE_TRACING".to_string()))
        );
    }

    #[test]
    #[serial]
    fn test_http_config_from_env() {
        clean_test_env();
        env::set_var("HTTP_REQUEST_TIMEOUT", "60");
        env::set_var("HTTP_MAX_REQUEST_SIZE", "1024");
        env::set_var("HTTP_ENABLE_TRACING", "false");
        env::set_var("HTTP_HEALTH_CHECK_PATH", "/api/health");
        env::set_var("HTTP_SHUTDOWN_TIMEOUT", "15");

        let config = HttpConfig::from_env().unwrap();
        assert_eq!(config.request_timeout_secs, 60);
        assert_eq!(config.max_request_size, 1024);
        assert!(!config.enable_tracing);
        assert_eq!(config.health_check_path, "/api/health");
        assert_eq!(config.shutdown_timeout_secs, 15);
        assert_eq!(
            config.config_sources().get("request_timeout_secs"),
            Some(&ConfigSource::EnvVar("HTTP_REQUEST_TIMEOUT".to_string()))
        );

        clean_test_env();
    }

    #[test]
    #[serial]
    fn test_invalid_timeout_value() {
        clean_test_env();
        env::set_var("HTTP_REQUEST_TIMEOUT", "soon");

        let err = HttpConfig::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "request_timeout_secs"));

        clean_test_env();
    }

    #[test]
    fn test_validation_rejects_zero_and_bad_path() {
        let config = HttpConfig {
            request_timeout_secs: 0,
            ..HttpConfig::default()
        };
        assert!(config.validate().is_err());

        let config = HttpConfig {
            max_request_size: 0,
            ..HttpConfig::default()
        };
        assert!(config.validate().is_err());

        let config = HttpConfig {
            health_check_path: "health".to_string(),
            ..HttpConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_health_path_inside_resource() {
        for path in [
            "/api/v1/users",
            "/api/v1/users/",
            "/api/v1/users/1/posts",
            "/api/v1/users/:user_id/posts",
            "/status/*rest",
        ] {
            let config = HttpConfig {
                health_check_path: path.to_string(),
                ..HttpConfig::default()
            };
            match config.validate() {
                Err(ConfigError::ValidationFailed { field, .. }) => {
                    assert_eq!(field, "health_check_path", "path {}", path)
                }
                other => panic!("Expected {} to be rejected, got {:?}", path, other),
            }
        }

        let config = HttpConfig {
            health_check_path: "/api/v1/usersz".to_string(),
            ..HttpConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}
