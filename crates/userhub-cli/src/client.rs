//! HTTP client for the userhub API.
//!
//! Attaches the session's bearer token to every request. A 401 from any
//! non-auth endpoint means the session is no longer valid: the stored session
//! is cleared and the user is told to log in again. 401s from `/auth/*`
//! endpoints surface the server's message instead, so a failed login doesn't
//! wipe anything.

use anyhow::{Result, bail};
use reqwest::{Method, StatusCode};
use serde_json::Value;

use userhub_api::ErrorBody;

use crate::session;

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    pub async fn get(&self, path: &str) -> Result<Value> {
        self.request(Method::GET, path, None).await
    }

    pub async fn post(&self, path: &str, body: Value) -> Result<Value> {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn put(&self, path: &str, body: Value) -> Result<Value> {
        self.request(Method::PUT, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value> {
        self.request(Method::DELETE, path, None).await
    }

    async fn request(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.http.request(method, &url);

        if let Some(ref token) = self.token {
            req = req.bearer_auth(token);
        }
        if let Some(body) = body {
            req = req.json(&body);
        }

        let resp = req.send().await?;
        let status = resp.status();

        if status == StatusCode::UNAUTHORIZED && !path.starts_with("/auth/") {
            // Session invalid: clear local state so the next command starts
            // from a clean logged-out slate.
            let _ = session::clear_session();
            bail!("Session expired or invalid. Run `userhub login` to sign in again.");
        }

        if !status.is_success() {
            bail!("{}", error_message(status, resp.text().await.ok()));
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(Value::Null);
        }

        Ok(resp.json().await?)
    }
}

/// Extracts the server's error message from a failed response body.
fn error_message(status: StatusCode, body: Option<String>) -> String {
    if let Some(raw) = body
        && let Ok(parsed) = serde_json::from_str::<ErrorBody>(&raw)
    {
        return parsed.message;
    }
    format!("Request failed with HTTP {status}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_server_body() {
        let raw = r#"{"statusCode":409,"message":"Email already registered","error":"Conflict"}"#;
        assert_eq!(
            error_message(StatusCode::CONFLICT, Some(raw.to_string())),
            "Email already registered"
        );
    }

    #[test]
    fn test_error_message_falls_back_to_status() {
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, Some("<html>".to_string())),
            "Request failed with HTTP 502 Bad Gateway"
        );
        assert_eq!(
            error_message(StatusCode::NOT_FOUND, None),
            "Request failed with HTTP 404 Not Found"
        );
    }
}
