//! Application state: current route, toasts, and the form controllers.
//!
//! SYSTEM CONTEXT
//! ==============
//! `App` is what the terminal shell drives. All navigation goes through
//! [`App::navigate`], which runs the route guard every time.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use std::time::Duration;

use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{AuthError, ConfigError};
use crate::forms::{LoginController, RegisterController, SubmitOutcome, Toast};
use crate::guard::{Navigation, Route, RouteGuard};
use crate::session::SessionManager;
use crate::validate::{LoginForm, RegisterForm};

pub struct App {
    session: SessionManager,
    login: LoginController,
    register: RegisterController,
    route: Route,
    toasts: Vec<Toast>,
    pending_redirect: Option<(Route, Duration)>,
}

impl App {
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        Ok(Self::with_session(SessionManager::new(config)?, config.register_redirect_delay))
    }

    #[must_use]
    pub fn with_session(session: SessionManager, register_redirect_delay: Duration) -> Self {
        Self {
            session,
            login: LoginController::default(),
            register: RegisterController::new(register_redirect_delay),
            route: Route::Login,
            toasts: Vec::new(),
            pending_redirect: None,
        }
    }

    #[must_use]
    pub fn route(&self) -> Route {
        self.route
    }

    #[must_use]
    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    #[must_use]
    pub fn guard(&self) -> RouteGuard<'_, SessionManager> {
        RouteGuard::new(&self.session)
    }

    /// Navigate to `route`, landing on login instead when the guard refuses.
    pub fn navigate(&mut self, route: Route) -> Navigation {
        let nav = self.guard().resolve(route);
        self.route = nav.route();
        nav
    }

    pub async fn submit_login(&mut self, form: &LoginForm) -> SubmitOutcome {
        let outcome = self.login.submit(&self.session, form).await;
        self.apply(&outcome);
        outcome
    }

    pub async fn submit_register(&mut self, form: &RegisterForm) -> SubmitOutcome {
        let outcome = self.register.submit(&self.session, form).await;
        self.apply(&outcome);
        outcome
    }

    /// Data for the notifications view. Refused by the guard without a request
    /// when there is no session; a rejected token sends the user to login.
    pub async fn notifications(&mut self) -> Result<Vec<Value>, AuthError> {
        if let Navigation::Redirect { .. } = self.navigate(Route::Notifications) {
            return Err(AuthError::Unauthenticated);
        }
        let result = self.session.fetch_notifications().await;
        if let Err(err) = &result {
            if err.requires_login() {
                self.toasts.push(Toast::error(err.to_string()));
                self.navigate(Route::Login);
            }
        }
        result
    }

    pub fn logout(&mut self) {
        self.session.logout();
        self.navigate(Route::Login);
    }

    /// Redirect scheduled by a successful submission, if any.
    #[must_use]
    pub fn pending_redirect(&self) -> Option<Route> {
        self.pending_redirect.map(|(route, _)| route)
    }

    /// Wait out the scheduled delay, then navigate. Callers show the toasts
    /// first so the user sees them during the pause.
    pub async fn follow_pending_redirect(&mut self) -> Option<Navigation> {
        let (route, delay) = self.pending_redirect.take()?;
        tokio::time::sleep(delay).await;
        Some(self.navigate(route))
    }

    /// Take pending toasts, oldest first.
    pub fn drain_toasts(&mut self) -> Vec<Toast> {
        std::mem::take(&mut self.toasts)
    }

    fn apply(&mut self, outcome: &SubmitOutcome) {
        match outcome {
            SubmitOutcome::Succeeded { toast, redirect, delay } => {
                self.toasts.push(toast.clone());
                if delay.is_zero() {
                    self.navigate(*redirect);
                } else {
                    self.pending_redirect = Some((*redirect, *delay));
                }
            }
            SubmitOutcome::Failed(toast) => self.toasts.push(toast.clone()),
            SubmitOutcome::Invalid(_) | SubmitOutcome::Busy => {}
        }
    }
}
