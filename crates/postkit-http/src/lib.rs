//! # postkit-http
//!
//! HTTP surface of the posts service:
//! - `/api/v1/users/:user_id/posts` resource routes
//! - JSON error bodies with stable error codes
//! - health check, request tracing, timeouts and body limits
//! - graceful shutdown on Ctrl+C / SIGTERM

pub mod config;
pub mod controllers;
pub mod error;
pub mod logging;
pub mod request;
pub mod routes;
pub mod server;

pub use config::HttpConfig;
pub use error::{HttpError, HttpResult};
pub use logging::{init_logging, LoggingConfig};
pub use request::PostParams;
pub use routes::AppState;
pub use server::{app, HttpServer};
