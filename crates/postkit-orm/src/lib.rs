//! # postkit-orm
//!
//! Models (`User`, `Post`), the [`PostStore`] storage interface and its
//! backends: an in-memory store and a PostgreSQL store built on sqlx.

pub mod backends;
pub mod error;
pub mod model;
pub mod seed;
pub mod store;

pub use backends::{MemoryStore, PgStore};
pub use error::{ModelError, ModelResult};
pub use model::{Model, Post, PostAttributes, User, ValidPost};
pub use seed::seed_demo_data;
pub use store::PostStore;
