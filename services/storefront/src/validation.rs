//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

const USERNAME_MIN_LEN: usize = 3;
const USERNAME_MAX_LEN: usize = 40;

fn username_regex() -> &'static Regex {
    static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
    USERNAME_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9_.-]{3,40}$").expect("Failed to compile username regex")
    })
}

fn is_username_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')
}

/// Validate username
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("Username is required".to_string());
    }

    if !username_regex().is_match(username) {
        return Err("Invalid username (3–40 characters; a–z, 0–9, . _ -)".to_string());
    }

    Ok(())
}

/// Build a username from the local part of an email address
///
/// Characters outside `[A-Za-z0-9_.-]` become `_`, the result is cut to 40
/// characters and padded with `_` up to 3.
pub fn derive_username(email: &str) -> String {
    let local = email.split('@').next().unwrap_or_default();

    let mut username: String = local
        .chars()
        .map(|c| if is_username_char(c) { c } else { '_' })
        .take(USERNAME_MAX_LEN)
        .collect();

    while username.chars().count() < USERNAME_MIN_LEN {
        username.push('_');
    }

    username
}

/// Trim and lowercase an email address
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Trim an optional form field, treating blank input as missing
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
