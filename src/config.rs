//! Client configuration parsed from environment variables.

use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_API_BASE_URL: &str = "https://server-o25o.onrender.com";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_REGISTER_REDIRECT_DELAY_MS: u64 = 2000;

/// Which path layout the remote server exposes for auth endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RouteStyle {
    /// `/auth/login` and `/auth/register`.
    #[default]
    Prefixed,
    /// `/login` and `/register`.
    Bare,
}

impl RouteStyle {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "prefixed" => Ok(Self::Prefixed),
            "bare" => Ok(Self::Bare),
            other => Err(ConfigError::Parse(format!(
                "unsupported API_ROUTE_STYLE '{other}' (expected 'prefixed' or 'bare')"
            ))),
        }
    }

    #[must_use]
    pub fn login_path(self) -> &'static str {
        match self {
            Self::Prefixed => "/auth/login",
            Self::Bare => "/login",
        }
    }

    #[must_use]
    pub fn register_path(self) -> &'static str {
        match self {
            Self::Prefixed => "/auth/register",
            Self::Bare => "/register",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL without a trailing slash.
    pub base_url: String,
    pub route_style: RouteStyle,
    /// Keep a cookie jar so server-set cookies ride along on later requests.
    pub with_credentials: bool,
    pub timeouts: Timeouts,
    /// Pause between a successful registration and the redirect to login.
    pub register_redirect_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_owned(),
            route_style: RouteStyle::default(),
            with_credentials: true,
            timeouts: Timeouts::default(),
            register_redirect_delay: Duration::from_millis(DEFAULT_REGISTER_REDIRECT_DELAY_MS),
        }
    }
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `API_BASE_URL`: default `https://server-o25o.onrender.com`
    /// - `API_ROUTE_STYLE`: `prefixed` (default) or `bare`
    /// - `API_WITH_CREDENTIALS`: default true
    /// - `API_REQUEST_TIMEOUT_SECS`: default 30
    /// - `API_CONNECT_TIMEOUT_SECS`: default 10
    /// - `REGISTER_REDIRECT_DELAY_MS`: default 2000
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("API_BASE_URL")
            .filter(|raw| !raw.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned());
        let route_style = match lookup("API_ROUTE_STYLE") {
            Some(raw) => RouteStyle::parse(&raw)?,
            None => RouteStyle::default(),
        };
        let with_credentials = lookup("API_WITH_CREDENTIALS")
            .as_deref()
            .and_then(parse_bool)
            .unwrap_or(true);
        let timeouts = Timeouts {
            request_secs: parse_timeout_secs(lookup("API_REQUEST_TIMEOUT_SECS"), DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: parse_timeout_secs(lookup("API_CONNECT_TIMEOUT_SECS"), DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        let register_redirect_delay = Duration::from_millis(parse_u64(
            lookup("REGISTER_REDIRECT_DELAY_MS"),
            DEFAULT_REGISTER_REDIRECT_DELAY_MS,
        ));

        Ok(Self { base_url: normalize_base_url(&base_url), route_style, with_credentials, timeouts, register_redirect_delay })
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = normalize_base_url(base_url);
        self
    }

    /// Absolute URL for an API path such as `/auth/login`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_owned()
}

fn parse_u64(raw: Option<String>, default: u64) -> u64 {
    raw.and_then(|v| v.trim().parse::<u64>().ok()).unwrap_or(default)
}

/// A zero timeout would fail every request, so it counts as malformed.
fn parse_timeout_secs(raw: Option<String>, default: u64) -> u64 {
    match parse_u64(raw, default) {
        0 => default,
        secs => secs,
    }
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
