//! Health check, request limits and the real TCP server

mod common;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use common::{post_path, posts_path, TestApp};
use postkit_http::{app, AppState, HttpConfig, HttpServer};
use postkit_orm::{MemoryStore, ModelError, ModelResult, Post, PostStore, User, ValidPost};
use postkit_testing::prelude::*;
use tracing_test::traced_test;

#[tokio::test]
async fn health_check_reports_storage() {
    let app = TestApp::new();
    let user = app.user().await;
    app.post(&user).await;

    let response = app
        .client
        .get("/health")
        .send()
        .await
        .unwrap()
        .assert_status(200)
        .assert_json_contains(json!({"status": "healthy", "storage": "memory", "posts": 1}))
        .unwrap();

    let body = response.json().unwrap();
    assert!(body["timestamp"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn health_check_path_is_configurable() {
    let app = TestApp::with_config(HttpConfig {
        health_check_path: "/api/health".to_string(),
        enable_tracing: false,
        ..HttpConfig::default()
    });

    app.client.get("/api/health").send().await.unwrap().assert_status(200);
    app.client
        .get("/health")
        .send()
        .await
        .unwrap()
        .assert_status(404)
        .assert_json_contains(json!({"error": {"code": "NOT_FOUND"}}))
        .unwrap();
}

#[tokio::test]
async fn framework_errors_answer_with_json() {
    let app = TestApp::new();
    let user = app.user().await;
    let post = app.post(&user).await;

    let response = app
        .client
        .post(post_path(user.id, post.id))
        .json(&json!({"title": "Testing Post"}))
        .send()
        .await
        .unwrap()
        .assert_status(405);
    assert_eq!(response.header("content-type"), Some("application/json"));
    assert!(response.header("allow").is_some_and(|allow| allow.contains("PUT")));
    response
        .assert_json_equals(json!({
            "error": {"code": "METHOD_NOT_ALLOWED", "message": "Method Not Allowed!"}
        }))
        .unwrap();

    let response = app
        .client
        .get("/api/v1/users")
        .send()
        .await
        .unwrap()
        .assert_status(404);
    assert_eq!(response.header("content-type"), Some("application/json"));
    response
        .assert_json_equals(json!({
            "error": {"code": "NOT_FOUND", "message": "Route Not Found!"}
        }))
        .unwrap();
}

/// Store whose every call fails, standing in for an unreachable database.
/// With a delay set, each call stalls first.
#[derive(Default)]
struct BrokenStore {
    delay: Option<Duration>,
}

impl BrokenStore {
    async fn refuse<T>(&self) -> ModelResult<T> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Err(ModelError::Connection("refused".to_string()))
    }
}

#[async_trait]
impl PostStore for BrokenStore {
    fn backend_name(&self) -> &'static str {
        "broken"
    }

    async fn create_user(&self, _name: &str) -> ModelResult<User> {
        self.refuse().await
    }

    async fn find_user(&self, _id: i64) -> ModelResult<Option<User>> {
        self.refuse().await
    }

    async fn count_users(&self) -> ModelResult<i64> {
        self.refuse().await
    }

    async fn list_posts(&self, _user_id: i64) -> ModelResult<Vec<Post>> {
        self.refuse().await
    }

    async fn find_post(&self, _user_id: i64, _post_id: i64) -> ModelResult<Option<Post>> {
        self.refuse().await
    }

    async fn create_post(&self, _user_id: i64, _post: ValidPost) -> ModelResult<Post> {
        self.refuse().await
    }

    async fn update_post(
        &self,
        _user_id: i64,
        _post_id: i64,
        _post: ValidPost,
    ) -> ModelResult<Option<Post>> {
        self.refuse().await
    }

    async fn delete_post(&self, _user_id: i64, _post_id: i64) -> ModelResult<Option<Post>> {
        self.refuse().await
    }

    async fn count_posts(&self) -> ModelResult<i64> {
        self.refuse().await
    }
}

#[tokio::test]
#[traced_test]
async fn storage_failures_surface_as_server_errors() {
    let router = app(
        AppState::new(Arc::new(BrokenStore::default())),
        &HttpConfig::default(),
    );
    let client = TestClient::new(router);

    client
        .get("/health")
        .send()
        .await
        .unwrap()
        .assert_status(503)
        .assert_json_contains(json!({"error": {"code": "HEALTH_CHECK_FAILED"}}))
        .unwrap();

    client
        .get(posts_path(1))
        .send()
        .await
        .unwrap()
        .assert_status(500)
        .assert_json_contains(json!({"error": {"code": "DATABASE_ERROR"}}))
        .unwrap();

    assert!(logs_contain("Connection error: refused"));
}

#[tokio::test]
async fn slow_requests_time_out_with_json() {
    let store = BrokenStore {
        delay: Some(Duration::from_secs(3)),
    };
    let config = HttpConfig {
        request_timeout_secs: 1,
        enable_tracing: false,
        ..HttpConfig::default()
    };
    let client = TestClient::new(app(AppState::new(Arc::new(store)), &config));

    let response = client
        .get(posts_path(1))
        .send()
        .await
        .unwrap()
        .assert_status(408);
    assert_eq!(response.header("content-type"), Some("application/json"));
    response
        .assert_json_contains(json!({"error": {"code": "REQUEST_TIMEOUT"}}))
        .unwrap();
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let app = TestApp::with_config(HttpConfig {
        max_request_size: 64,
        enable_tracing: false,
        ..HttpConfig::default()
    });
    let user = app.user().await;

    app.client
        .post(posts_path(user.id))
        .json(&json!({"title": "Testing Post", "description": "x".repeat(512)}))
        .send()
        .await
        .unwrap()
        .assert_status(413)
        .assert_json_contains(json!({"error": {"code": "REQUEST_TOO_LARGE"}}))
        .unwrap();

    assert_eq!(app.post_count().await, 0);
}

#[tokio::test]
async fn server_serves_over_tcp_and_shuts_down() {
    let store: Arc<dyn PostStore> = Arc::new(MemoryStore::new());
    let user = store.create_user("alice").await.unwrap();

    let config = HttpConfig {
        shutdown_timeout_secs: 1,
        ..HttpConfig::default()
    };
    let server = HttpServer::bind("127.0.0.1:0", AppState::new(store.clone()), config)
        .await
        .unwrap();
    let addr = server.local_addr().unwrap();

    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let handle = tokio::spawn(server.run_until(async move {
        let _ = stop_rx.await;
    }));

    let http = reqwest::Client::new();
    let response = http
        .post(format!("http://{}{}", addr, posts_path(user.id)))
        .json(&json!({"title": "Testing Post", "description": "Testing Description"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);
    let created: Post = response.json().await.unwrap();
    assert_eq!(created.user_id, user.id);

    let health: JsonValue = http
        .get(format!("http://{}/health", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["posts"], 1);

    stop_tx.send(()).unwrap();
    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server stops within the grace period")
        .unwrap();
    assert!(result.is_ok());
}
