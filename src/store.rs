//! Credential store holding at most one session per browsing context.
//!
//! SYSTEM CONTEXT
//! ==============
//! Handles are cheap clones over shared state: the session manager writes,
//! the API client and route guard read. A process is one browsing context,
//! so nothing is persisted past its lifetime.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::sync::{Arc, PoisonError, RwLock};

use crate::types::Session;

#[derive(Clone, Debug, Default)]
pub struct CredentialStore {
    inner: Arc<RwLock<Option<Session>>>,
}

impl CredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any stored session. Only the session manager calls this.
    pub(crate) fn set(&self, session: Session) {
        let mut slot = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(session);
    }

    #[must_use]
    pub fn get(&self) -> Option<Session> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Current bearer token, if any.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|session| session.token.clone())
    }

    /// Drop the stored session. Safe to call when empty.
    pub fn clear(&self) {
        let mut slot = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *slot = None;
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).is_none()
    }
}
