//! Route table and shared handler state

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use postkit_orm::PostStore;

use crate::controllers::post_controller;

/// State handed to every handler
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn PostStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn PostStore {
        self.store.as_ref()
    }
}

/// Prefix owned by the posts resource
pub const USERS_PREFIX: &str = "/api/v1/users";

/// `/api/v1/users/:user_id/posts` resource routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            &format!("{}/:user_id/posts", USERS_PREFIX),
            get(post_controller::index).post(post_controller::store),
        )
        .route(
            &format!("{}/:user_id/posts/:post_id", USERS_PREFIX),
            get(post_controller::show)
                .put(post_controller::update)
                .delete(post_controller::destroy),
        )
}
