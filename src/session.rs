//! Session manager: the single writer of the credential store.
//!
//! ARCHITECTURE
//! ============
//! Unauthenticated → `login` → Authenticated → `logout` / store cleared /
//! `401` from a protected call → Unauthenticated. A failed login leaves the
//! store untouched, and `register` never touches it: the user logs in
//! separately afterwards.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use serde_json::Value;

use crate::api::ApiClient;
use crate::config::{ClientConfig, RouteStyle};
use crate::error::{AuthError, ConfigError};
use crate::guard::AuthStatus;
use crate::store::CredentialStore;
use crate::types::{LoginResponse, Session};
use crate::validate::{LoginForm, RegisterForm};

pub const NOTIFICATIONS_PATH: &str = "/notifications";

pub struct SessionManager {
    api: ApiClient,
    store: CredentialStore,
    routes: RouteStyle,
}

impl SessionManager {
    /// Manager with a fresh, empty credential store.
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        Self::with_store(config, CredentialStore::new())
    }

    pub fn with_store(config: &ClientConfig, store: CredentialStore) -> Result<Self, ConfigError> {
        let api = ApiClient::new(config, store.clone())?;
        Ok(Self { api, store, routes: config.route_style })
    }

    /// Read handle on the store (e.g. for a route guard).
    #[must_use]
    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// Authenticate and store the resulting session. Input that fails the
    /// login form's checks is rejected with `Validation` before any request.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let body = LoginForm { email: email.to_owned(), password: password.to_owned() }.validate()?;
        let value = self
            .api
            .post(self.routes.login_path(), &body)
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "login failed"))?;
        let session = parse_login(value)?;
        self.store.set(session.clone());
        tracing::info!(user_id = %session.user_id, "login succeeded");
        Ok(session)
    }

    /// Create an account. Does not log the user in.
    pub async fn register(&self, email: &str, username: &str, password: &str) -> Result<(), AuthError> {
        let body = RegisterForm {
            email: email.to_owned(),
            username: username.to_owned(),
            password: password.to_owned(),
            confirm_password: password.to_owned(),
        }
        .validate()?;
        self.api
            .post(self.routes.register_path(), &body)
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "registration failed"))?;
        tracing::info!(%username, "registration succeeded");
        Ok(())
    }

    pub fn logout(&self) {
        if let Some(session) = self.store.get() {
            tracing::info!(user_id = %session.user_id, "logged out");
        }
        self.store.clear();
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        !self.store.is_empty()
    }

    #[must_use]
    pub fn current(&self) -> Option<Session> {
        self.store.get()
    }

    /// Protected notifications list. A `401` means the stored token is stale,
    /// so the session is dropped before the error is returned.
    pub async fn fetch_notifications(&self) -> Result<Vec<Value>, AuthError> {
        match self.api.authenticated_get(NOTIFICATIONS_PATH).await {
            Ok(value) => parse_notifications(value),
            Err(err @ AuthError::Api { status_code: 401, .. }) => {
                tracing::warn!("notifications rejected the session token; clearing session");
                self.store.clear();
                Err(err)
            }
            Err(err) => Err(err),
        }
    }
}

impl AuthStatus for SessionManager {
    fn is_authenticated(&self) -> bool {
        SessionManager::is_authenticated(self)
    }
}

fn parse_login(value: Value) -> Result<Session, AuthError> {
    let resp: LoginResponse = serde_json::from_value(value).map_err(|e| AuthError::InvalidResponse(e.to_string()))?;
    if resp.token.trim().is_empty() {
        return Err(AuthError::InvalidResponse("login response carried an empty token".to_owned()));
    }
    Ok(Session::from(resp))
}

fn parse_notifications(value: Value) -> Result<Vec<Value>, AuthError> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Null => Ok(Vec::new()),
        other => Err(AuthError::InvalidResponse(format!("expected a notification list, got {other}"))),
    }
}
