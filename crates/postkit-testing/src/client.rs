//! In-process HTTP test client
//!
//! Requests go straight into the router with `tower::ServiceExt::oneshot`,
//! so the full middleware stack and extractors run without a socket.

use crate::{TestError, TestResult};
use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use tower::ServiceExt;

/// HTTP client bound to an application router
#[derive(Clone)]
pub struct TestClient {
    router: Router,
}

impl TestClient {
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    pub fn get(&self, path: impl Into<String>) -> RequestBuilder {
        self.request(Method::GET, path)
    }

    pub fn post(&self, path: impl Into<String>) -> RequestBuilder {
        self.request(Method::POST, path)
    }

    pub fn put(&self, path: impl Into<String>) -> RequestBuilder {
        self.request(Method::PUT, path)
    }

    pub fn delete(&self, path: impl Into<String>) -> RequestBuilder {
        self.request(Method::DELETE, path)
    }

    fn request(&self, method: Method, path: impl Into<String>) -> RequestBuilder {
        RequestBuilder {
            router: self.router.clone(),
            method,
            path: path.into(),
            headers: HashMap::new(),
            body: Vec::new(),
            error: None,
        }
    }
}

/// A single request under construction
pub struct RequestBuilder {
    router: Router,
    method: Method,
    path: String,
    headers: HashMap<String, String>,
    body: Vec<u8>,
    error: Option<TestError>,
}

impl RequestBuilder {
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Send `data` as an `application/json` body
    pub fn json<T: serde::Serialize>(mut self, data: &T) -> Self {
        match serde_json::to_vec(data) {
            Ok(body) => self.body = body,
            Err(e) => self.error = Some(e.into()),
        }
        self.header(header::CONTENT_TYPE.as_str(), "application/json")
    }

    /// Send `data` as an `application/x-www-form-urlencoded` body
    pub fn form<T: serde::Serialize>(mut self, data: &T) -> Self {
        match serde_urlencoded::to_string(data) {
            Ok(body) => self.body = body.into_bytes(),
            Err(e) => self.error = Some(e.into()),
        }
        self.header(
            header::CONTENT_TYPE.as_str(),
            "application/x-www-form-urlencoded",
        )
    }

    /// Raw body; set the content type yourself with [`header`](Self::header)
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub async fn send(self) -> TestResult<TestResponse> {
        if let Some(error) = self.error {
            return Err(error);
        }

        let mut builder = Request::builder().method(self.method).uri(&self.path);
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let request = builder
            .body(Body::from(self.body))
            .map_err(|e| TestError::Request(e.to_string()))?;

        let response = self
            .router
            .oneshot(request)
            .await
            .map_err(|e| TestError::Request(e.to_string()))?;

        let status_code = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let bytes = response
            .into_body()
            .collect()
            .await
            .map_err(|e| TestError::Request(e.to_string()))?
            .to_bytes();

        Ok(TestResponse {
            status_code,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}

/// Test response wrapper with assertion methods
#[derive(Debug, Clone)]
pub struct TestResponse {
    status_code: u16,
    headers: HashMap<String, String>,
    body: String,
}

impl TestResponse {
    pub fn status(&self) -> u16 {
        self.status_code
    }

    /// Header value by lowercase name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn json(&self) -> TestResult<JsonValue> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Deserialize the body into `T`
    pub fn json_as<T: serde::de::DeserializeOwned>(&self) -> TestResult<T> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Panics when the status differs
    pub fn assert_status(self, expected_status: u16) -> Self {
        if self.status_code != expected_status {
            panic!(
                "Expected status {}, got {}: {}",
                expected_status, self.status_code, self.body
            );
        }
        self
    }

    pub fn assert_json_contains(self, expected: JsonValue) -> TestResult<Self> {
        let actual_json = self.json()?;

        if !json_contains(&actual_json, &expected) {
            return Err(TestError::Assertion {
                message: format!("Expected JSON to contain: {}, got: {}", expected, actual_json),
            });
        }

        Ok(self)
    }

    pub fn assert_json_equals(self, expected: JsonValue) -> TestResult<Self> {
        let actual_json = self.json()?;

        if actual_json != expected {
            return Err(TestError::Assertion {
                message: format!("Expected JSON: {}, got: {}", expected, actual_json),
            });
        }

        Ok(self)
    }

    pub fn assert_body_contains(self, expected_text: &str) -> TestResult<Self> {
        if !self.body.contains(expected_text) {
            return Err(TestError::Assertion {
                message: format!(
                    "Expected body to contain '{}', got: {}",
                    expected_text, self.body
                ),
            });
        }

        Ok(self)
    }
}

/// Whether `actual` holds every key/value of `expected`, recursively
pub fn json_contains(actual: &JsonValue, expected: &JsonValue) -> bool {
    match (actual, expected) {
        (JsonValue::Object(actual_map), JsonValue::Object(expected_map)) => {
            expected_map.iter().all(|(key, expected_value)| {
                actual_map
                    .get(key)
                    .is_some_and(|actual_value| json_contains(actual_value, expected_value))
            })
        }
        (JsonValue::Array(actual_arr), JsonValue::Array(expected_arr)) => {
            expected_arr.iter().all(|expected_item| {
                actual_arr
                    .iter()
                    .any(|actual_item| json_contains(actual_item, expected_item))
            })
        }
        _ => actual == expected,
    }
}
