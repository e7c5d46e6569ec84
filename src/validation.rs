// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Modalist-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Modalist and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Field validation for form-style dialogs.
//!
//! Compiled patterns are memoized in a [`PatternCache`] that callers own and pass in, so
//! several dialogs can share one cache without any process-wide state.

use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};

use chrono::{DateTime, NaiveDate};
use regex::Regex;
use thiserror::Error;

const EMAIL_PATTERN: &str = r"^[^@\s<>]+@[^@\s<>]+\.[^@\s<>]+$";
const URI_PATTERN: &str = r"^[A-Za-z][A-Za-z0-9+.\-]*://[^/\s?#]+";

/// Append-only map from pattern source to compiled regex. Failed compilations are not cached.
#[derive(Debug, Default)]
pub struct PatternCache {
    compiled: RwLock<HashMap<String, Arc<Regex>>>,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, pattern: &str) -> Result<Arc<Regex>, regex::Error> {
        {
            let compiled = self.compiled.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(regex) = compiled.get(pattern) {
                return Ok(Arc::clone(regex));
            }
        }

        let regex = Arc::new(Regex::new(pattern)?);
        let mut compiled = self.compiled.write().unwrap_or_else(PoisonError::into_inner);
        // a re-entrant caller may have inserted it meanwhile; keep the first one
        let entry = compiled.entry(pattern.to_owned()).or_insert(regex);
        Ok(Arc::clone(entry))
    }

    pub fn len(&self) -> usize {
        self.compiled.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("This field is required")]
    Required,
    #[error("Must be at least {0} characters")]
    TooShort(usize),
    #[error("Must be at most {0} characters")]
    TooLong(usize),
    #[error("Invalid pattern in schema")]
    BadPattern,
    #[error("Invalid format")]
    PatternMismatch,
    #[error("Must be a valid email address")]
    Email,
    #[error("Must be a valid URL (http:// or https://)")]
    Uri,
    #[error("Must be a valid date (YYYY-MM-DD)")]
    Date,
    #[error("Must be a valid date-time (RFC3339 format)")]
    DateTime,
    #[error("Must be at least {0}")]
    BelowMinimum(f64),
    #[error("Must be at most {0}")]
    AboveMaximum(f64),
}

/// Constraints on a string field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringRules {
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<String>,
    pub format: Option<String>,
}

pub fn validate_string(
    value: &str,
    rules: &StringRules,
    cache: &PatternCache,
) -> Result<(), ValidationError> {
    // Blank optional fields skip every other rule.
    if value.trim().is_empty() {
        return if rules.required { Err(ValidationError::Required) } else { Ok(()) };
    }
    let len = value.chars().count();
    if let Some(min) = rules.min_length.filter(|&min| min > 0) {
        if len < min {
            return Err(ValidationError::TooShort(min));
        }
    }
    if let Some(max) = rules.max_length {
        if len > max {
            return Err(ValidationError::TooLong(max));
        }
    }
    if let Some(pattern) = rules.pattern.as_deref().filter(|p| !p.is_empty()) {
        let regex = cache.get(pattern).map_err(|_| ValidationError::BadPattern)?;
        if !regex.is_match(value) {
            return Err(ValidationError::PatternMismatch);
        }
    }
    validate_format(value, rules.format.as_deref().unwrap_or(""), cache)
}

/// Unknown formats pass.
pub fn validate_format(
    value: &str,
    format: &str,
    cache: &PatternCache,
) -> Result<(), ValidationError> {
    let matches = |pattern: &str| cache.get(pattern).map(|re| re.is_match(value)).unwrap_or(false);
    match format {
        "email" if !matches(EMAIL_PATTERN) => Err(ValidationError::Email),
        "uri" if !matches(URI_PATTERN) => Err(ValidationError::Uri),
        "date" if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() => {
            Err(ValidationError::Date)
        }
        "date-time" if DateTime::parse_from_rfc3339(value).is_err() => {
            Err(ValidationError::DateTime)
        }
        _ => Ok(()),
    }
}

pub fn validate_number(
    value: f64,
    minimum: Option<f64>,
    maximum: Option<f64>,
) -> Result<(), ValidationError> {
    if let Some(min) = minimum {
        if value < min {
            return Err(ValidationError::BelowMinimum(min));
        }
    }
    if let Some(max) = maximum {
        if value > max {
            return Err(ValidationError::AboveMaximum(max));
        }
    }
    Ok(())
}

/// One editable string field and its latest validation message. A message does not stop
/// editing; it only blocks submitting the form.
#[derive(Debug, Clone, Default)]
pub struct FieldState {
    pub rules: StringRules,
    value: String,
    message: Option<String>,
}

impl FieldState {
    pub fn new(rules: StringRules) -> Self {
        Self { rules, value: String::new(), message: None }
    }

    pub fn set_value(&mut self, value: impl Into<String>, cache: &PatternCache) {
        self.value = value.into();
        self.validate(cache);
    }

    /// Re-checks the current value, e.g. for required fields nobody has touched yet.
    pub fn validate(&mut self, cache: &PatternCache) {
        self.message =
            validate_string(&self.value, &self.rules, cache).err().map(|e| e.to_string());
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

pub fn can_submit(fields: &[FieldState]) -> bool {
    fields.iter().all(|field| field.message.is_none())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{
        can_submit, validate_format, validate_number, validate_string, FieldState, PatternCache,
        StringRules, ValidationError,
    };

    #[test]
    fn cache_compiles_each_pattern_once() {
        let cache = PatternCache::new();
        let a = cache.get("^a+$").unwrap();
        let b = cache.get("^a+$").unwrap();
        assert!(std::sync::Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
        assert!(cache.get("(").is_err());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn string_rules_report_first_failure() {
        let cache = PatternCache::new();
        let rules = StringRules {
            min_length: Some(3),
            pattern: Some("^[a-z]+$".into()),
            ..StringRules::default()
        };
        assert_eq!(validate_string("ab", &rules, &cache), Err(ValidationError::TooShort(3)));
        assert_eq!(validate_string("ABC", &rules, &cache), Err(ValidationError::PatternMismatch));
        assert_eq!(validate_string("abc", &rules, &cache), Ok(()));

        let broken = StringRules { pattern: Some("[".into()), ..StringRules::default() };
        let err = validate_string("x", &broken, &cache).unwrap_err();
        assert_eq!(err.to_string(), "Invalid pattern in schema");
    }

    #[rstest]
    #[case("email", "dev@example.com", true)]
    #[case("email", "not-an-email", false)]
    #[case("uri", "https://example.com/x", true)]
    #[case("uri", "example.com", false)]
    #[case("date", "2024-02-29", true)]
    #[case("date", "2023-02-29", false)]
    #[case("date-time", "2024-01-01T10:00:00Z", true)]
    #[case("date-time", "2024-01-01 10:00", false)]
    #[case("color", "anything", true)]
    fn formats(#[case] format: &str, #[case] value: &str, #[case] ok: bool) {
        let cache = PatternCache::new();
        assert_eq!(validate_format(value, format, &cache).is_ok(), ok);
    }

    #[test]
    fn number_bounds_render_like_integers() {
        assert_eq!(
            validate_number(1.0, Some(5.0), None).unwrap_err().to_string(),
            "Must be at least 5"
        );
        assert_eq!(
            validate_number(11.5, None, Some(10.0)).unwrap_err().to_string(),
            "Must be at most 10"
        );
        assert!(validate_number(7.0, Some(5.0), Some(10.0)).is_ok());
    }

    #[test]
    fn invalid_field_blocks_submit_until_fixed() {
        let cache = PatternCache::new();
        let mut field = FieldState::new(StringRules {
            format: Some("email".into()),
            ..StringRules::default()
        });
        field.set_value("nope", &cache);
        assert_eq!(field.message(), Some("Must be a valid email address"));
        assert!(!can_submit(std::slice::from_ref(&field)));

        field.set_value("a@b.io", &cache);
        assert!(field.message().is_none());
        assert!(can_submit(&[field]));
    }

    #[test]
    fn blank_values_only_fail_when_required() {
        let cache = PatternCache::new();
        let optional = StringRules { min_length: Some(3), ..StringRules::default() };
        assert_eq!(validate_string("  ", &optional, &cache), Ok(()));

        let mut field = FieldState::new(StringRules { required: true, ..optional });
        assert!(field.message().is_none());
        field.validate(&cache);
        assert_eq!(field.message(), Some("This field is required"));
        field.set_value("abcd", &cache);
        assert!(can_submit(&[field]));
    }
}
