//! # notifly
//!
//! Client for the notifications API: login, registration, and a protected
//! notifications view.
//!
//! ARCHITECTURE
//! ============
//! Leaves first: `store` holds the one active [`types::Session`], `api`
//! performs HTTP calls and attaches the stored bearer token, `session` is the
//! only writer of the store, and `guard` decides whether a protected route may
//! render. `forms` and `app` sit on top as the interactive callers; `shell`
//! parses terminal commands for the `notifly` binary.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod forms;
pub mod guard;
pub mod session;
pub mod shell;
pub mod store;
pub mod types;
pub mod validate;

#[cfg(test)]
mod test_support;
