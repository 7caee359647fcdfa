#![allow(dead_code)]

use std::sync::Arc;

use postkit_http::{app, AppState, HttpConfig};
use postkit_orm::{MemoryStore, Post, PostStore, User};
use postkit_testing::prelude::*;

/// Router over a fresh in-memory store, with handles to both
pub struct TestApp {
    pub store: Arc<dyn PostStore>,
    pub client: TestClient,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(HttpConfig {
            enable_tracing: false,
            ..HttpConfig::default()
        })
    }

    pub fn with_config(config: HttpConfig) -> Self {
        let store: Arc<dyn PostStore> = Arc::new(MemoryStore::new());
        let router = app(AppState::new(store.clone()), &config);
        Self {
            store,
            client: TestClient::new(router),
        }
    }

    pub async fn user(&self) -> User {
        UserFactory::new(self.store.clone()).create().await.unwrap()
    }

    pub async fn post(&self, user: &User) -> Post {
        PostFactory::new(self.store.clone(), user)
            .title("Testing Post")
            .description("Testing Description")
            .create()
            .await
            .unwrap()
    }

    pub async fn post_count(&self) -> i64 {
        self.store.count_posts().await.unwrap()
    }
}

pub fn posts_path(user_id: i64) -> String {
    format!("/api/v1/users/{}/posts", user_id)
}

pub fn post_path(user_id: i64, post_id: i64) -> String {
    format!("/api/v1/users/{}/posts/{}", user_id, post_id)
}

/// An id no record in a fresh store will ever have
pub const MISSING_ID: i64 = 999_999;
