//! Factories for test records
//!
//! Each factory persists through a shared [`PostStore`], so records made here
//! are visible to the router under test when both share the same store.

use crate::{utils, TestError, TestResult};
use async_trait::async_trait;
use postkit_orm::{Post, PostAttributes, PostStore, User};
use rand::Rng;
use std::sync::Arc;

/// Factory trait for creating test data
#[async_trait]
pub trait Factory<T: Send>: Send + Sync {
    /// Create and persist a single instance
    async fn create(&self) -> TestResult<T>;

    async fn create_many(&self, count: usize) -> TestResult<Vec<T>> {
        let mut results = Vec::with_capacity(count);
        for _ in 0..count {
            results.push(self.create().await?);
        }
        Ok(results)
    }
}

/// Creates users with random names
#[derive(Clone)]
pub struct UserFactory {
    store: Arc<dyn PostStore>,
    name: Option<String>,
}

impl UserFactory {
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        Self { store, name: None }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[async_trait]
impl Factory<User> for UserFactory {
    async fn create(&self) -> TestResult<User> {
        let name = self
            .name
            .clone()
            .unwrap_or_else(|| utils::random_string(Some("user")));
        Ok(self.store.create_user(&name).await?)
    }
}

/// Creates valid posts owned by one user
#[derive(Clone)]
pub struct PostFactory {
    store: Arc<dyn PostStore>,
    user_id: i64,
    title: Option<String>,
    description: Option<String>,
}

impl PostFactory {
    pub fn new(store: Arc<dyn PostStore>, user: &User) -> Self {
        Self {
            store,
            user_id: user.id,
            title: None,
            description: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attributes the next `create` would persist
    pub fn attributes(&self) -> PostAttributes {
        let words = rand::thread_rng().gen_range(2..=5);
        PostAttributes::new(
            self.title
                .clone()
                .unwrap_or_else(|| utils::random_string(Some("Post"))),
            self.description
                .clone()
                .unwrap_or_else(|| utils::random_sentence(words)),
        )
    }
}

#[async_trait]
impl Factory<Post> for PostFactory {
    async fn create(&self) -> TestResult<Post> {
        let valid = self
            .attributes()
            .validate()
            .await
            .map_err(|e| TestError::Factory {
                message: format!("invalid post attributes: {}", e),
            })?;
        Ok(self.store.create_post(self.user_id, valid).await?)
    }
}
