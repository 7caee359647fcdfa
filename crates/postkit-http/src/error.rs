//! HTTP error types
//!
//! Every failure leaving a handler becomes an `HttpError`, rendered as
//! `{"error": {"code": ..., "message": ...}}` with the matching status.
//! Missing users and posts answer 400, not 404. Bodiless error responses
//! produced by routing and the timeout layer are rewritten into the same
//! shape by `server::json_error_bodies`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use postkit_orm::{Model, ModelError, User};
use postkit_validation::ValidationErrors;
use serde_json::json;
use thiserror::Error;

/// Result type for HTTP operations
pub type HttpResult<T> = Result<T, HttpError>;

#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Server startup failed: {message}")]
    StartupFailed { message: String },

    #[error("{message}")]
    BadRequest { message: String },

    #[error("{}", .0.first_message().unwrap_or("Validation failed"))]
    Validation(ValidationErrors),

    #[error("User Not Found!")]
    UserNotFound,

    #[error("Post Not Found!")]
    PostNotFound,

    #[error("Request too large")]
    PayloadTooLarge,

    #[error("Route Not Found!")]
    RouteNotFound,

    #[error("Method Not Allowed!")]
    MethodNotAllowed,

    #[error("Request Timed Out!")]
    RequestTimeout,

    #[error("Database error: {message}")]
    DatabaseError { message: String },

    #[error("Health check failed: {reason}")]
    HealthCheckFailed { reason: String },

    #[error("Internal server error: {message}")]
    InternalError { message: String },
}

impl HttpError {
    pub fn startup<T: Into<String>>(message: T) -> Self {
        HttpError::StartupFailed {
            message: message.into(),
        }
    }

    pub fn bad_request<T: Into<String>>(message: T) -> Self {
        HttpError::BadRequest {
            message: message.into(),
        }
    }

    pub fn health_check<T: Into<String>>(reason: T) -> Self {
        HttpError::HealthCheckFailed {
            reason: reason.into(),
        }
    }

    pub fn internal<T: Into<String>>(message: T) -> Self {
        HttpError::InternalError {
            message: message.into(),
        }
    }

    /// Get the appropriate HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            HttpError::StartupFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            HttpError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            HttpError::Validation(_) => StatusCode::BAD_REQUEST,
            HttpError::UserNotFound => StatusCode::BAD_REQUEST,
            HttpError::PostNotFound => StatusCode::BAD_REQUEST,
            HttpError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            HttpError::RouteNotFound => StatusCode::NOT_FOUND,
            HttpError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            HttpError::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
            HttpError::DatabaseError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            HttpError::HealthCheckFailed { .. } => StatusCode::SERVICE_UNAVAILABLE,
            HttpError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code for consistent API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            HttpError::StartupFailed { .. } => "SERVER_STARTUP_FAILED",
            HttpError::BadRequest { .. } => "BAD_REQUEST",
            HttpError::Validation(_) => "VALIDATION_ERROR",
            HttpError::UserNotFound => "USER_NOT_FOUND",
            HttpError::PostNotFound => "POST_NOT_FOUND",
            HttpError::PayloadTooLarge => "REQUEST_TOO_LARGE",
            HttpError::RouteNotFound => "NOT_FOUND",
            HttpError::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            HttpError::RequestTimeout => "REQUEST_TIMEOUT",
            HttpError::DatabaseError { .. } => "DATABASE_ERROR",
            HttpError::HealthCheckFailed { .. } => "HEALTH_CHECK_FAILED",
            HttpError::InternalError { .. } => "INTERNAL_ERROR",
        }
    }

    /// JSON body sent to the client
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            HttpError::Validation(errors) => json!({
                "error": {
                    "code": self.error_code(),
                    "message": self.to_string(),
                    "messages": errors.messages(),
                }
            }),
            _ => json!({
                "error": {
                    "code": self.error_code(),
                    "message": self.to_string(),
                }
            }),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), "{}", self);
        }
        (status, Json(self.to_json())).into_response()
    }
}

impl From<ValidationErrors> for HttpError {
    fn from(errors: ValidationErrors) -> Self {
        HttpError::Validation(errors)
    }
}

impl From<ModelError> for HttpError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::NotFound(table) if table == User::table_name() => HttpError::UserNotFound,
            ModelError::NotFound(_) => HttpError::PostNotFound,
            ModelError::Validation(message) => HttpError::BadRequest { message },
            ModelError::Database(message) => HttpError::DatabaseError { message },
            ModelError::Connection(msg) => HttpError::DatabaseError {
                message: format!("Connection error: {}", msg),
            },
            ModelError::Migration(msg) => HttpError::InternalError {
                message: format!("Migration error: {}", msg),
            },
        }
    }
}

impl From<std::io::Error> for HttpError {
    fn from(err: std::io::Error) -> Self {
        HttpError::InternalError {
            message: format!("IO error: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_errors_are_bad_requests() {
        assert_eq!(HttpError::UserNotFound.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(HttpError::PostNotFound.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(HttpError::UserNotFound.to_string(), "User Not Found!");
        assert_eq!(HttpError::PostNotFound.to_string(), "Post Not Found!");
    }

    #[test]
    fn test_validation_body_lists_messages() {
        let mut errors = ValidationErrors::new();
        errors.add_error("title", "Title Can't Be Blank!");
        errors.add_error("description", "Description Can't Be Blank!");

        let error = HttpError::from(errors);
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            error.to_json(),
            json!({
                "error": {
                    "code": "VALIDATION_ERROR",
                    "message": "Title Can't Be Blank!",
                    "messages": ["Title Can't Be Blank!", "Description Can't Be Blank!"]
                }
            })
        );
    }

    #[test]
    fn test_model_error_conversions() {
        let error = HttpError::from(ModelError::NotFound("users".to_string()));
        assert!(matches!(error, HttpError::UserNotFound));

        let error = HttpError::from(ModelError::NotFound("posts".to_string()));
        assert!(matches!(error, HttpError::PostNotFound));

        let error = HttpError::from(ModelError::Database("down".to_string()));
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.error_code(), "DATABASE_ERROR");
    }

    #[test]
    fn test_error_response_status() {
        let response = HttpError::bad_request("Invalid ID parameter").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = HttpError::health_check("store unreachable").into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = HttpError::MethodNotAllowed.into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
