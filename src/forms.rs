//! Login and registration form controllers.
//!
//! SYSTEM CONTEXT
//! ==============
//! A controller validates raw input, calls the session manager, and turns the
//! result into one toast plus an optional redirect. At most one submission per
//! controller is in flight; extra submissions are reported as `Busy` and send
//! nothing.

#[cfg(test)]
#[path = "forms_test.rs"]
mod forms_test;

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::error::AuthError;
use crate::guard::Route;
use crate::session::SessionManager;
use crate::validate::{FieldErrors, LoginForm, RegisterForm};

pub const LOGIN_SUCCEEDED: &str = "Login successful";
pub const LOGIN_FAILED: &str = "Login failed";
pub const REGISTER_SUCCEEDED: &str = "Registration successful. Redirecting to login...";
pub const REGISTER_FAILED: &str = "Registration failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
}

/// A transient user-visible notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: ToastLevel::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: ToastLevel::Error, message: message.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Local validation failed; nothing was sent.
    Invalid(FieldErrors),
    /// Another submission from this form is still pending.
    Busy,
    /// Accepted by the server. Navigate to `redirect` after `delay`.
    Succeeded { toast: Toast, redirect: Route, delay: Duration },
    /// Rejected by the server or never reached it.
    Failed(Toast),
}

/// Toast text for a failed call: the server's own message when its error body
/// carried one, the form's fallback otherwise.
#[must_use]
pub fn failure_message(err: &AuthError, fallback: &str) -> String {
    err.server_message().unwrap_or(fallback).to_owned()
}

/// Clears the in-flight flag when the submission finishes or is dropped.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Debug, Default)]
pub struct LoginController {
    busy: AtomicBool,
}

impl LoginController {
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub async fn submit(&self, session: &SessionManager, form: &LoginForm) -> SubmitOutcome {
        let creds = match form.validate() {
            Ok(creds) => creds,
            Err(errors) => return SubmitOutcome::Invalid(errors),
        };
        let Some(_in_flight) = InFlight::acquire(&self.busy) else {
            return SubmitOutcome::Busy;
        };

        match session.login(&creds.email, &creds.password).await {
            Ok(_) => SubmitOutcome::Succeeded {
                toast: Toast::success(LOGIN_SUCCEEDED),
                redirect: Route::Notifications,
                delay: Duration::ZERO,
            },
            Err(err) => SubmitOutcome::Failed(Toast::error(failure_message(&err, LOGIN_FAILED))),
        }
    }
}

#[derive(Debug)]
pub struct RegisterController {
    busy: AtomicBool,
    redirect_delay: Duration,
}

impl RegisterController {
    #[must_use]
    pub fn new(redirect_delay: Duration) -> Self {
        Self { busy: AtomicBool::new(false), redirect_delay }
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub async fn submit(&self, session: &SessionManager, form: &RegisterForm) -> SubmitOutcome {
        let req = match form.validate() {
            Ok(req) => req,
            Err(errors) => return SubmitOutcome::Invalid(errors),
        };
        let Some(_in_flight) = InFlight::acquire(&self.busy) else {
            return SubmitOutcome::Busy;
        };

        match session.register(&req.email, &req.username, &req.password).await {
            Ok(()) => SubmitOutcome::Succeeded {
                toast: Toast::success(REGISTER_SUCCEEDED),
                redirect: Route::Login,
                delay: self.redirect_delay,
            },
            Err(err) => SubmitOutcome::Failed(Toast::error(failure_message(&err, REGISTER_FAILED))),
        }
    }
}
