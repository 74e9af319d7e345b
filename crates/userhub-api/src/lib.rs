use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// -------------------------
// Error Body
// -------------------------

/// JSON error body returned for every failed request.
///
/// Shape: `{"statusCode": 404, "message": "...", "error": "Not Found"}`.
/// Clients (the CLI included) parse this to surface the message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status_code: status.as_u16(),
            message: message.into(),
            error: status.canonical_reason().map(String::from),
        }
    }
}

// -------------------------
// API Error
// -------------------------

/// High-level API errors mapped to HTTP responses.
///
/// The taxonomy mirrors how failures surface to callers: validation problems
/// are rejected before business logic (400), credential and token failures
/// collapse into a single unauthorized message (401), uniqueness violations
/// conflict (409), missing records are not found (404), and anything the
/// service cannot explain is internal (500).
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::Internal(msg) => msg,
        }
    }

    pub fn to_error_body(&self) -> ErrorBody {
        // Internal failure details stay in the logs, not in the response.
        let message = match self {
            ApiError::Internal(_) => "Internal server error".to_string(),
            other => other.message().to_string(),
        };
        ErrorBody::new(self.status_code(), message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match serde_json::to_vec(&self.to_error_body()) {
            Ok(b) => b,
            Err(_) => b"{\"statusCode\":500,\"message\":\"Internal server error\"}".to_vec(),
        };

        let mut builder = axum::http::Response::builder().status(status);
        builder = builder.header(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        if status == StatusCode::UNAUTHORIZED {
            builder = builder.header("WWW-Authenticate", HeaderValue::from_static("Bearer"));
        }

        builder
            .body(axum::body::Body::from(body))
            .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
    }
}

// -------------------------
// Tests
// -------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::bad_request("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::unauthorized("x").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::conflict("x").status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::internal("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_body_shape() {
        let body = ApiError::not_found("User with ID abc not found").to_error_body();
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["statusCode"], 404);
        assert_eq!(json["message"], "User with ID abc not found");
        assert_eq!(json["error"], "Not Found");
    }

    #[test]
    fn test_internal_error_message_is_masked() {
        let body = ApiError::internal("connection refused to db:5432").to_error_body();
        assert_eq!(body.message, "Internal server error");
        assert_eq!(body.status_code, 500);
    }

    #[test]
    fn test_error_body_round_trip() {
        let body = ErrorBody::new(StatusCode::CONFLICT, "Email already registered");
        let json = serde_json::to_string(&body).unwrap();
        let parsed: ErrorBody = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, body);
    }
}
