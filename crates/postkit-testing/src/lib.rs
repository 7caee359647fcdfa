//! # postkit-testing
//!
//! Helpers for exercising a postkit application in tests:
//!
//! - [`TestClient`] drives an axum `Router` in-process, no socket needed
//! - [`TestResponse`] carries fluent status / body / JSON assertions
//! - [`UserFactory`] and [`PostFactory`] persist random records through a
//!   [`PostStore`](postkit_orm::PostStore)
//!
//! ```rust
//! use postkit_testing::utils;
//!
//! let name = utils::random_string(Some("user"));
//! assert!(name.starts_with("user_"));
//! ```

pub mod client;
pub mod factories;

pub use client::{RequestBuilder, TestClient, TestResponse};
pub use factories::{Factory, PostFactory, UserFactory};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        client::{TestClient, TestResponse},
        factories::{Factory, PostFactory, UserFactory},
        utils, TestError, TestResult,
    };

    pub use serde_json::{json, Value as JsonValue};
}

#[derive(thiserror::Error, Debug)]
pub enum TestError {
    #[error("Storage error: {0}")]
    Storage(#[from] postkit_orm::ModelError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Form encoding error: {0}")]
    FormEncoding(#[from] serde_urlencoded::ser::Error),

    #[error("Factory error: {message}")]
    Factory { message: String },

    #[error("Assertion failed: {message}")]
    Assertion { message: String },

    #[error("Request error: {0}")]
    Request(String),
}

pub type TestResult<T> = Result<T, TestError>;

/// Test utilities and helper functions
pub mod utils {
    use rand::Rng;

    /// Random alphanumeric string of 8 chars, with optional `prefix_`
    pub fn random_string(prefix: Option<&str>) -> String {
        let suffix: String = rand::thread_rng()
            .sample_iter(&rand::distributions::Alphanumeric)
            .take(8)
            .map(char::from)
            .collect();

        match prefix {
            Some(p) => format!("{}_{}", p, suffix),
            None => suffix,
        }
    }

    /// Random sentence of `words` lowercase words
    pub fn random_sentence(words: usize) -> String {
        (0..words.max(1))
            .map(|_| random_string(None).to_lowercase())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
