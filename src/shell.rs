//! Line-oriented command parsing and rendering for the terminal front end.

#[cfg(test)]
#[path = "shell_test.rs"]
mod shell_test;

use std::fmt::Write as _;

use serde_json::Value;

use crate::forms::{Toast, ToastLevel};
use crate::guard::Route;
use crate::validate::{FieldErrors, LoginForm, RegisterForm};

pub const HELP: &str = "\
commands:
  login <email> <password>
  register <email> <username> <password> <confirm-password>
  open <path>            (/login, /register, /notifications)
  notifications          open the notifications view
  whoami                 show the current session
  logout
  help
  quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login(LoginForm),
    Register(RegisterForm),
    Open(Route),
    Notifications,
    WhoAmI,
    Logout,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("unknown route: {0}")]
    UnknownRoute(String),
    #[error("unknown command: {0} (try `help`)")]
    UnknownCommand(String),
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, ParseError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let args = words.collect::<Vec<_>>();

    let command = match (head.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("login", [email, password]) => {
            Command::Login(LoginForm { email: (*email).to_owned(), password: (*password).to_owned() })
        }
        ("login", _) => return Err(ParseError::Usage("login <email> <password>")),
        ("register", [email, username, password, confirm]) => Command::Register(RegisterForm {
            email: (*email).to_owned(),
            username: (*username).to_owned(),
            password: (*password).to_owned(),
            confirm_password: (*confirm).to_owned(),
        }),
        ("register", _) => return Err(ParseError::Usage("register <email> <username> <password> <confirm-password>")),
        ("open", [path]) => Command::Open(Route::parse(path).ok_or_else(|| ParseError::UnknownRoute((*path).to_owned()))?),
        ("open", _) => return Err(ParseError::Usage("open <path>")),
        ("notifications", []) => Command::Notifications,
        ("whoami", []) => Command::WhoAmI,
        ("logout", []) => Command::Logout,
        ("help" | "?", _) => Command::Help,
        ("quit" | "exit", _) => Command::Quit,
        (other, _) => return Err(ParseError::UnknownCommand(other.to_owned())),
    };
    Ok(Some(command))
}

#[must_use]
pub fn render_toast(toast: &Toast) -> String {
    match toast.level {
        ToastLevel::Success => format!("[ok] {}", toast.message),
        ToastLevel::Error => format!("[error] {}", toast.message),
    }
}

#[must_use]
pub fn render_field_errors(errors: &FieldErrors) -> String {
    let mut out = String::new();
    for (field, message) in errors.iter() {
        let _ = writeln!(out, "  {}: {message}", field.as_str());
    }
    out
}

#[must_use]
pub fn render_view(route: Route) -> &'static str {
    match route {
        Route::Login => "== Sign in ==\nno account? `open /register`",
        Route::Register => "== Create account ==",
        Route::Notifications => "== Notifications ==",
    }
}

#[must_use]
pub fn render_notifications(items: &[Value]) -> String {
    if items.is_empty() {
        return "  (no notifications)".to_owned();
    }
    let mut out = String::new();
    for item in items {
        let line = item
            .get("message")
            .or_else(|| item.get("text"))
            .and_then(Value::as_str)
            .map_or_else(|| item.to_string(), ToOwned::to_owned);
        let _ = writeln!(out, "  - {line}");
    }
    out.trim_end().to_owned()
}
