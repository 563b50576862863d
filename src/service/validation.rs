//! Field rules for request payloads.

use chrono::NaiveDateTime;
use regex::Regex;
use std::sync::LazyLock;

use crate::error::AppError;

/// Implemented by every create/update payload; run before anything touches the store.
pub trait Validate {
    fn validate(&self) -> Result<(), AppError>;
}

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("Invalid regex pattern"));

static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9][0-9 ()\-]{4,19}$").expect("Invalid regex pattern"));

static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://[^\s/$.?#][^\s]*$").expect("Invalid regex pattern"));

pub fn require_text(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} must not be empty", field)));
    }
    Ok(())
}

pub fn check_email(field: &str, value: &str) -> Result<(), AppError> {
    if !EMAIL_REGEX.is_match(value) {
        return Err(AppError::Validation(format!("{} must be a valid email", field)));
    }
    Ok(())
}

pub fn check_phone(field: &str, value: &str) -> Result<(), AppError> {
    if !PHONE_REGEX.is_match(value) {
        return Err(AppError::Validation(format!("{} must be a valid phone number", field)));
    }
    Ok(())
}

pub fn check_url(field: &str, value: &str) -> Result<(), AppError> {
    if !URL_REGEX.is_match(value) {
        return Err(AppError::Validation(format!("{} must be an http(s) URL", field)));
    }
    Ok(())
}

pub fn check_positive(field: &str, value: i64) -> Result<(), AppError> {
    if value <= 0 {
        return Err(AppError::Validation(format!("{} must be positive", field)));
    }
    Ok(())
}

/// `start` must not be after `end`.
pub fn check_order(
    start_field: &str,
    start: &NaiveDateTime,
    end_field: &str,
    end: &NaiveDateTime,
) -> Result<(), AppError> {
    if start > end {
        return Err(AppError::Validation(format!(
            "{} must not be after {}",
            start_field, end_field
        )));
    }
    Ok(())
}

/// Applies `check` when the optional field is present.
pub fn optional<F>(field: &str, value: Option<&str>, check: F) -> Result<(), AppError>
where
    F: Fn(&str, &str) -> Result<(), AppError>,
{
    match value {
        Some(v) => check(field, v),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_must_have_content() {
        assert!(require_text("name", "Tomsk").is_ok());
        assert!(require_text("name", "   ").is_err());
    }

    #[test]
    fn contact_formats() {
        assert!(check_email("email", "a@b.ru").is_ok());
        assert!(check_email("email", "a@b").is_err());
        assert!(check_phone("phone", "+7 (913) 123-45-67").is_ok());
        assert!(check_phone("phone", "call me").is_err());
        assert!(check_url("url", "https://tsu.ru").is_ok());
        assert!(check_url("url", "tsu.ru").is_err());
        assert!(optional("url", None, check_url).is_ok());
        assert!(optional("url", Some("ftp://x"), check_url).is_err());
    }

    #[test]
    fn ordering_and_sign() {
        let a = crate::dates::parse_wall_clock("2024-05-01T10:00:00").unwrap();
        let b = crate::dates::parse_wall_clock("2024-05-02T10:00:00").unwrap();
        assert!(check_order("date_start", &a, "date_end", &b).is_ok());
        assert!(check_order("date_start", &a, "date_end", &a).is_ok());
        assert!(check_order("date_start", &b, "date_end", &a).is_err());
        assert!(check_positive("max_users", 1).is_ok());
        assert!(check_positive("max_users", 0).is_err());
    }
}
