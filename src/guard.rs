//! Route guard for protected views.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every navigation re-reads authentication state; nothing is cached, since
//! the session may have been cleared (logout, external clear, `401`) since the
//! last check. A disallowed navigation resolves to the login route and no
//! protected data is requested.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use std::fmt;

use crate::store::CredentialStore;

/// Anything that can answer "is there an active session right now".
pub trait AuthStatus {
    fn is_authenticated(&self) -> bool;
}

impl AuthStatus for CredentialStore {
    fn is_authenticated(&self) -> bool {
        !self.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    Notifications,
}

impl Route {
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Notifications => "/notifications",
        }
    }

    #[must_use]
    pub fn is_protected(self) -> bool {
        matches!(self, Self::Notifications)
    }

    /// Parse a path; `/` is the login view.
    #[must_use]
    pub fn parse(path: &str) -> Option<Self> {
        match path.trim().trim_matches('/') {
            "" | "login" => Some(Self::Login),
            "register" => Some(Self::Register),
            "notifications" => Some(Self::Notifications),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Outcome of asking the guard for a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Render(Route),
    Redirect { from: Route, to: Route },
}

impl Navigation {
    /// The route that ends up rendered.
    #[must_use]
    pub fn route(self) -> Route {
        match self {
            Self::Render(route) | Self::Redirect { to: route, .. } => route,
        }
    }
}

/// True when `route` must not render for an unauthenticated client.
#[must_use]
pub fn should_redirect_unauth(route: Route, authenticated: bool) -> bool {
    route.is_protected() && !authenticated
}

pub struct RouteGuard<'a, A: AuthStatus + ?Sized> {
    auth: &'a A,
}

impl<'a, A: AuthStatus + ?Sized> RouteGuard<'a, A> {
    pub fn new(auth: &'a A) -> Self {
        Self { auth }
    }

    #[must_use]
    pub fn can_enter(&self) -> bool {
        self.auth.is_authenticated()
    }

    #[must_use]
    pub fn resolve(&self, route: Route) -> Navigation {
        if should_redirect_unauth(route, self.can_enter()) {
            tracing::debug!(%route, "unauthenticated; redirecting to login");
            return Navigation::Redirect { from: route, to: Route::Login };
        }
        Navigation::Render(route)
    }
}
