//! Field rules shared by the contact form and the submission handler.

use std::sync::LazyLock;

use regex::Regex;

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Returns `true` iff `value` looks like `local@domain.tld`.
///
/// Only strings that are obviously not an email address are rejected.
pub fn validate_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value)
}

/// Returns `true` iff the number of characters in `value`, ignoring leading
/// and trailing whitespace, is within `min..=max`.
pub fn validate_length(value: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&value.trim().chars().count())
}

/// Inclusive character bounds of a contact form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthLimit {
    pub min: usize,
    pub max: usize,
}

impl LengthLimit {
    pub fn check(self, value: &str) -> bool {
        validate_length(value, self.min, self.max)
    }
}

pub const NAME_LIMIT: LengthLimit = LengthLimit { min: 2, max: 100 };
pub const SUBJECT_LIMIT: LengthLimit = LengthLimit { min: 5, max: 200 };
pub const MESSAGE_LIMIT: LengthLimit = LengthLimit { min: 10, max: 1000 };
