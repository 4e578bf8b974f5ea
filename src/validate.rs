//! Local input validation for the login and registration forms.
//!
//! Failures are reported per field and never reach the network. Every field is
//! checked exactly as typed; nothing is trimmed.

#[cfg(test)]
#[path = "validate_test.rs"]
mod validate_test;

use std::collections::BTreeMap;
use std::fmt;

use crate::types::{Credentials, RegisterRequest};

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_USERNAME_LEN: usize = 3;

pub const INVALID_EMAIL: &str = "Invalid email address";
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters";
pub const CONFIRM_TOO_SHORT: &str = "Confirmation must be at least 6 characters";
pub const USERNAME_TOO_SHORT: &str = "Username must be at least 3 characters";
pub const PASSWORDS_DO_NOT_MATCH: &str = "Passwords do not match";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Email,
    Username,
    Password,
    ConfirmPassword,
}

impl Field {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Username => "username",
            Self::Password => "password",
            Self::ConfirmPassword => "confirmPassword",
        }
    }
}

/// First error message per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    /// Record an error; an earlier message for the same field wins.
    pub fn insert(&mut self, field: Field, message: &str) {
        self.0.entry(field).or_insert_with(|| message.to_owned());
    }

    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    fn into_result<T>(self, ok: T) -> Result<T, Self> {
        if self.is_empty() { Ok(ok) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {message}", field.as_str())?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// Raw login form input.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<Credentials, FieldErrors> {
        let mut errors = FieldErrors::default();
        if !is_valid_email(&self.email) {
            errors.insert(Field::Email, INVALID_EMAIL);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.insert(Field::Password, PASSWORD_TOO_SHORT);
        }
        errors.into_result(Credentials { email: self.email.clone(), password: self.password.clone() })
    }
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm").field("email", &self.email).finish_non_exhaustive()
    }
}

/// Raw registration form input.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub email: String,
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<RegisterRequest, FieldErrors> {
        let mut errors = FieldErrors::default();
        if !is_valid_email(&self.email) {
            errors.insert(Field::Email, INVALID_EMAIL);
        }
        if self.username.chars().count() < MIN_USERNAME_LEN {
            errors.insert(Field::Username, USERNAME_TOO_SHORT);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.insert(Field::Password, PASSWORD_TOO_SHORT);
        }
        if self.confirm_password.chars().count() < MIN_PASSWORD_LEN {
            errors.insert(Field::ConfirmPassword, CONFIRM_TOO_SHORT);
        } else if self.password != self.confirm_password {
            errors.insert(Field::ConfirmPassword, PASSWORDS_DO_NOT_MATCH);
        }
        errors.into_result(RegisterRequest {
            email: self.email.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
        })
    }
}

impl fmt::Debug for RegisterForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterForm")
            .field("email", &self.email)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// `local@domain.tld` check.
///
/// The local part uses letters, digits and `_ ' + - .` with no leading dot and
/// no `..`; its last character is not `.` or `'`. Domain labels start with a
/// letter or digit and may contain hyphens. The final label is 2+ letters.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    is_valid_local_part(local) && is_valid_domain(domain)
}

fn is_valid_local_part(local: &str) -> bool {
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '\'' | '+' | '-' | '.');
    let Some(last) = local.chars().last() else {
        return false;
    };
    local.chars().all(allowed)
        && !local.starts_with('.')
        && !local.contains("..")
        && (last.is_ascii_alphanumeric() || matches!(last, '_' | '+' | '-'))
}

fn is_valid_domain(domain: &str) -> bool {
    let Some((labels, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    let valid_label = |label: &str| {
        label.starts_with(|c: char| c.is_ascii_alphanumeric())
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    };
    tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()) && labels.split('.').all(valid_label)
}
