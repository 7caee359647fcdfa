//! Request extraction for the posts resource

use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::{header, StatusCode};
use axum::Form;
use postkit_orm::PostAttributes;

use crate::error::{HttpError, HttpResult};

/// Post attributes taken from a JSON or form-encoded body.
///
/// An empty body, or one with a content type other than JSON or form,
/// carries no fields; validation then reports both as blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostParams(pub PostAttributes);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Json,
    Form,
    Other,
}

fn body_kind(req: &Request) -> BodyKind {
    let Some(content_type) = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return BodyKind::Other;
    };

    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if mime == "application/json" || mime.ends_with("+json") {
        BodyKind::Json
    } else if mime == "application/x-www-form-urlencoded" {
        BodyKind::Form
    } else {
        BodyKind::Other
    }
}

fn rejection(status: StatusCode, message: String) -> HttpError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        HttpError::PayloadTooLarge
    } else {
        HttpError::bad_request(message)
    }
}

#[async_trait]
impl<S> FromRequest<S> for PostParams
where
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match body_kind(&req) {
            BodyKind::Json => {
                let bytes = Bytes::from_request(req, state)
                    .await
                    .map_err(|e| rejection(e.status(), e.body_text()))?;

                if bytes.iter().all(u8::is_ascii_whitespace) {
                    return Ok(PostParams::default());
                }

                let attributes = serde_json::from_slice::<PostAttributes>(&bytes)
                    .map_err(|e| HttpError::bad_request(format!("Invalid JSON body: {}", e)))?;
                Ok(PostParams(attributes))
            }
            BodyKind::Form => {
                let Form(attributes) = Form::<PostAttributes>::from_request(req, state)
                    .await
                    .map_err(|e| rejection(e.status(), e.body_text()))?;
                Ok(PostParams(attributes))
            }
            BodyKind::Other => {
                // Drain the body so oversized payloads are still rejected.
                Bytes::from_request(req, state)
                    .await
                    .map_err(|e| rejection(e.status(), e.body_text()))?;
                Ok(PostParams::default())
            }
        }
    }
}

/// Parse a numeric path id
pub fn parse_id(raw: &str) -> HttpResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| HttpError::bad_request("Invalid ID parameter"))
}
