//! HTTP client for the remote auth/notifications API.
//!
//! ERROR HANDLING
//! ==============
//! Nothing reached the server → `Transport`. Non-2xx → `Api` with the body's
//! `message` when present, otherwise a generic status message. Protected
//! calls without a stored token fail with `Unauthenticated` before any
//! network traffic.
//!
//! Cookies set by the server are kept in a per-client jar when
//! `with_credentials` is enabled, alongside the bearer header.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{AuthError, ConfigError};
use crate::store::CredentialStore;

pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
    store: CredentialStore,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, store: CredentialStore) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .cookie_store(config.with_credentials)
            .build()
            .map_err(|e| ConfigError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, config: config.clone(), store })
    }

    /// Unauthenticated JSON `POST`.
    pub async fn post<B>(&self, path: &str, body: &B) -> Result<Value, AuthError>
    where
        B: Serialize + ?Sized,
    {
        tracing::debug!(path, "POST");
        let response = self
            .http
            .post(self.config.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;
        read_response(response).await
    }

    /// `GET` with `Authorization: Bearer <token>` from the credential store.
    pub async fn authenticated_get(&self, path: &str) -> Result<Value, AuthError> {
        let Some(token) = self.store.token() else {
            tracing::debug!(path, "protected GET without a session");
            return Err(AuthError::Unauthenticated);
        };
        tracing::debug!(path, "GET (authenticated)");
        let response = self
            .http
            .get(self.config.url(path))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;
        read_response(response).await
    }
}

async fn read_response(response: reqwest::Response) -> Result<Value, AuthError> {
    let status = response.status().as_u16();
    let text = response
        .text()
        .await
        .map_err(|e| AuthError::Transport(e.to_string()))?;
    interpret_response(status, &text)
}

/// Map a status + raw body onto the success value or a typed failure.
///
/// 2xx bodies that are empty become `Null`; non-JSON 2xx bodies are kept as a
/// string so endpoints that answer with plain text still succeed.
fn interpret_response(status: u16, body: &str) -> Result<Value, AuthError> {
    if (200..300).contains(&status) {
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        return Ok(serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_owned())));
    }
    Err(match error_message(body) {
        Some(message) => AuthError::Api { status_code: status, message, from_server: true },
        None => AuthError::Api { status_code: status, message: fallback_message(status), from_server: false },
    })
}

fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<Value>(body)
        .ok()
        .as_ref()
        .and_then(|value| value.get("message"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(ToOwned::to_owned)
}

fn fallback_message(status: u16) -> String {
    format!("request failed with status {status}")
}
