//! Form validation
//!
//! Validators never stop at the first problem: they collect one message per
//! field into [`FieldErrors`] so the whole map can be shown inline and in a
//! summary block. A draft is only turned into a wire payload when the map is
//! empty.

pub mod promotion;
pub mod reservation;

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, ErrorCode};

pub use promotion::{PromotionField, PromotionMode, validate_promotion, validate_promotion_field};
pub use reservation::{ReservationField, validate_reservation, validate_reservation_field};

// ── Shared patterns ─────────────────────────────────────────────────

/// Letters, whitespace, apostrophes and hyphens (guest names, countries)
pub static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s'-]+$").expect("valid name pattern"));

/// Deliberately loose `local@domain.tld`
pub static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

/// Optional leading `+`, no leading zero, at most 16 digits
pub static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+]?[1-9][0-9]{0,15}$").expect("valid phone pattern"));

pub static ALPHANUMERIC_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]+$").expect("valid alphanumeric pattern"));

// ── Field error map ─────────────────────────────────────────────────

/// Validation failures keyed by wire field name (`checkOut`, `discount_value`, ...)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error; the first message for a field wins
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Absorb another map, keeping existing messages on conflict
    pub fn extend(&mut self, other: FieldErrors) {
        for (field, message) in other.0 {
            self.insert(field, message);
        }
    }

    /// Replace the state of `fields` with the outcome of a fresh check.
    ///
    /// Used by on-change validation: fields that now pass are cleared.
    pub fn refresh<'a>(&mut self, fields: impl IntoIterator<Item = &'a str>, fresh: FieldErrors) {
        for field in fields {
            self.0.remove(field);
        }
        self.0.extend(fresh.0);
    }

    /// Turn an empty map into `Ok(value)`, anything else into `Err(self)`
    pub fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }

    /// Whole map as user-visible text
    pub fn summary(&self) -> String {
        let mut text = String::from("Please fix the following errors:");
        for (field, message) in &self.0 {
            text.push_str(&format!("\n- {field}: {message}"));
        }
        text
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.summary())
    }
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        let mut err = AppError::with_message(ErrorCode::ValidationFailed, errors.summary());
        for (field, message) in errors.0 {
            err = err.with_detail(field, message);
        }
        err
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

/// Parse a whole number from a text input. `"3"` and `" 3 "` pass, `"3.5"` does not.
pub fn parse_whole_number(value: &str) -> Option<i64> {
    value.trim().parse::<i64>().ok()
}

/// Validate a name-like field: trimmed length bounds plus [`NAME_PATTERN`]
pub fn check_name(value: &str, label: &str, min: usize, max: usize) -> Option<String> {
    let trimmed = value.trim();
    let len = trimmed.chars().count();
    if len < min || len > max {
        return Some(format!("{label} must be between {min} and {max} characters"));
    }
    if !NAME_PATTERN.is_match(trimmed) {
        return Some(format!(
            "{label} can only contain letters, spaces, hyphens and apostrophes"
        ));
    }
    None
}

/// Integer within `[min, max]`
pub fn check_int_range(value: &str, label: &str, min: i64, max: i64) -> Result<i64, String> {
    let Some(n) = parse_whole_number(value) else {
        return Err(format!("{label} must be a whole number"));
    };
    if n < min || n > max {
        return Err(format!("{label} must be between {min} and {max}"));
    }
    Ok(n)
}

/// Count whitespace-separated, non-empty tokens
pub fn word_count(value: &str) -> usize {
    value.split_whitespace().count()
}

/// Strip the punctuation people type into phone numbers
pub fn normalize_phone(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_errors_first_message_wins() {
        let mut errors = FieldErrors::new();
        errors.insert("adults", "Adults must be between 1 and 20");
        errors.insert("adults", "Total guests cannot exceed 40");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("adults"), Some("Adults must be between 1 and 20"));
    }

    #[test]
    fn test_field_errors_refresh_clears_passing_fields() {
        let mut errors = FieldErrors::new();
        errors.insert("adults", "Total guests cannot exceed 40");
        errors.insert("children", "Total guests cannot exceed 40");
        errors.insert("email", "Email is required");

        errors.refresh(["adults", "children"], FieldErrors::new());
        assert!(!errors.contains("adults"));
        assert!(!errors.contains("children"));
        assert!(errors.contains("email"));
    }

    #[test]
    fn test_summary_lists_every_field() {
        let mut errors = FieldErrors::new();
        errors.insert("firstName", "First name is required");
        errors.insert("checkOut", "Check-out date must be after check-in date");
        let summary = errors.summary();
        assert!(summary.contains("firstName: First name is required"));
        assert!(summary.contains("checkOut: Check-out date must be after check-in date"));
    }

    #[test]
    fn test_into_app_error_carries_details() {
        let mut errors = FieldErrors::new();
        errors.insert("title", "Title is required");
        let err: AppError = errors.into();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert!(err.details.unwrap().contains_key("title"));
    }

    #[test]
    fn test_patterns() {
        assert!(NAME_PATTERN.is_match("Anne-Marie O'Neil"));
        assert!(!NAME_PATTERN.is_match("R2D2"));
        assert!(EMAIL_PATTERN.is_match("guest@lodge.lk"));
        assert!(!EMAIL_PATTERN.is_match("guest@lodge"));
        assert!(!EMAIL_PATTERN.is_match("gu est@lodge.lk"));
        assert!(PHONE_PATTERN.is_match(&normalize_phone("+94 (77) 123-4567")));
        assert!(!PHONE_PATTERN.is_match("0771234567"));
        assert!(ALPHANUMERIC_PATTERN.is_match("P042"));
        assert!(!ALPHANUMERIC_PATTERN.is_match("P-042"));
    }

    #[test]
    fn test_whole_numbers() {
        assert_eq!(parse_whole_number(" 4 "), Some(4));
        assert_eq!(parse_whole_number("4.5"), None);
        assert_eq!(parse_whole_number(""), None);
        assert_eq!(word_count("  Summer   Safari Special "), 3);
    }
}
