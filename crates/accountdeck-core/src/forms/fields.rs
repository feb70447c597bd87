//! Field-level rules shared by the account forms.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

pub const NAME: &str = "name";
pub const EMAIL: &str = "email";
pub const PASSWORD: &str = "password";
pub const BIO: &str = "bio";
pub const OLD_PASSWORD: &str = "old_password";
pub const NEW_PASSWORD: &str = "new_password";
pub const CONFIRM_PASSWORD: &str = "confirm_password";

/// Minimum length for a display name.
pub const MIN_NAME_LENGTH: usize = 2;

/// Minimum length for a new password.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Passwords at or above this length rate as strong.
const STRONG_PASSWORD_LENGTH: usize = 10;

/// Something, an @, something, a dot, something. Deliberately loose and unanchored.
const EMAIL_PATTERN: &str = r"\S+@\S+\.\S+";

/// Field name to error message, in form order. An empty message marks a
/// valid field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors {
    fields: Vec<(&'static str, String)>,
}

impl FieldErrors {
    /// Start with every listed field valid.
    pub fn for_fields(fields: &[&'static str]) -> Self {
        Self {
            fields: fields.iter().map(|f| (*f, String::new())).collect(),
        }
    }

    pub fn set(&mut self, field: &'static str, message: impl Into<String>) {
        let message = message.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some((_, existing)) => *existing = message,
            None => self.fields.push((field, message)),
        }
    }

    /// Message for `field`, empty when valid or unknown.
    pub fn get(&self, field: &str) -> &str {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, message)| message.as_str())
            .unwrap_or("")
    }

    pub fn is_valid(&self) -> bool {
        self.fields.iter().all(|(_, message)| message.is_empty())
    }

    /// Every field with its message, including valid ones.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields.iter().map(|(name, message)| (*name, message.as_str()))
    }

    /// Only the fields that failed.
    pub fn errors(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.iter().filter(|(_, message)| !message.is_empty())
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.errors().map(|(_, message)| message).collect();
        if messages.is_empty() {
            write!(f, "No validation errors")
        } else {
            write!(f, "{}", messages.join("; "))
        }
    }
}

/// Length as the user sees it (characters, not bytes).
pub fn char_len(value: &str) -> usize {
    value.chars().count()
}

fn email_pattern() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).ok()).as_ref()
}

pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_some_and(|re| re.is_match(email))
}

/// Required, at least two characters.
pub fn check_name(name: &str) -> Option<&'static str> {
    if name.is_empty() {
        Some("Name is required")
    } else if char_len(name) < MIN_NAME_LENGTH {
        Some("Name must be at least 2 characters")
    } else {
        None
    }
}

pub fn check_email(email: &str) -> Option<&'static str> {
    if email.is_empty() {
        Some("Email is required")
    } else if !is_valid_email(email) {
        Some("Email is invalid")
    } else {
        None
    }
}

/// Required, at least six characters.
pub fn check_password(password: &str, required_message: &'static str) -> Option<&'static str> {
    if password.is_empty() {
        Some(required_message)
    } else if char_len(password) < MIN_PASSWORD_LENGTH {
        Some("Password must be at least 6 characters")
    } else {
        None
    }
}

pub fn check_confirmation(password: &str, confirmation: &str) -> Option<&'static str> {
    (password != confirmation).then_some("Passwords do not match")
}

/// Length-based password rating shown next to the signup password field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub enum PasswordStrength {
    Weak,
    Good,
    Strong,
}

impl fmt::Display for PasswordStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PasswordStrength::Weak => write!(f, "Weak"),
            PasswordStrength::Good => write!(f, "Good"),
            PasswordStrength::Strong => write!(f, "Strong"),
        }
    }
}

/// `None` for an empty password.
pub fn password_strength(password: &str) -> Option<PasswordStrength> {
    match char_len(password) {
        0 => None,
        n if n < MIN_PASSWORD_LENGTH => Some(PasswordStrength::Weak),
        n if n < STRONG_PASSWORD_LENGTH => Some(PasswordStrength::Good),
        _ => Some(PasswordStrength::Strong),
    }
}
