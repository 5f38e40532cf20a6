//! Comparators used by test checks.
//!
//! Every function returns an [`AssertionResult`] instead of panicking so a
//! test can evaluate all of its checks and report each one.

mod compare;
mod result;

use regex::Regex;
use serde_json::Value;

pub use compare::values_equal;
pub use result::{AssertionResult, FailureKind};

/// Exact equality; numbers compare numerically.
pub fn equals(actual: &Value, expected: &Value) -> AssertionResult {
    AssertionResult::from_outcome(
        values_equal(actual, expected),
        FailureKind::Mismatch,
        "value equals",
        expected.to_string(),
        actual.to_string(),
    )
}

/// Presence of `key` in an object, whatever its value.
pub fn has_key(mapping: &Value, key: &str) -> AssertionResult {
    let description = format!("has key {key:?}");
    let expected = format!("object with key {key:?}");
    match mapping {
        Value::Object(map) => {
            let keys: Vec<&str> = map.keys().map(String::as_str).collect();
            AssertionResult::from_outcome(
                map.contains_key(key),
                FailureKind::MissingKey,
                description,
                expected,
                format!("keys {keys:?}"),
            )
        }
        other => AssertionResult::fail(
            FailureKind::MissingKey,
            description,
            expected,
            other.to_string(),
        ),
    }
}

/// Structural comparison of a raw body against an expected document.
///
/// Whitespace and key order do not matter.
pub fn body_equals(actual_raw: &str, expected: &Value) -> AssertionResult {
    match serde_json::from_str::<Value>(actual_raw) {
        Ok(actual) => AssertionResult::from_outcome(
            values_equal(&actual, expected),
            FailureKind::Mismatch,
            "body equals",
            expected.to_string(),
            actual.to_string(),
        ),
        Err(err) => AssertionResult::fail(
            FailureKind::MalformedBody,
            "body equals",
            expected.to_string(),
            format!("{actual_raw:?} ({err})"),
        ),
    }
}

/// Byte-for-byte comparison of the raw body.
///
/// Sensitive to key order, whitespace and trailing newlines. Prefer
/// [`body_equals`] unless the exact serialization is the thing under test.
pub fn body_equals_literal(actual_raw: &str, expected_raw: &str) -> AssertionResult {
    AssertionResult::from_outcome(
        actual_raw == expected_raw,
        FailureKind::Mismatch,
        "body equals literal",
        format!("{expected_raw:?}"),
        format!("{actual_raw:?}"),
    )
}

pub fn status_code_equals(actual: u16, expected: u16) -> AssertionResult {
    AssertionResult::from_outcome(
        actual == expected,
        FailureKind::UnexpectedStatus,
        "status code",
        expected.to_string(),
        actual.to_string(),
    )
}

pub fn contains(haystack: &str, needle: &str) -> AssertionResult {
    AssertionResult::from_outcome(
        haystack.contains(needle),
        FailureKind::Mismatch,
        "contains",
        format!("text containing {needle:?}"),
        format!("{haystack:?}"),
    )
}

/// String value matching a regular expression.
pub fn matches(actual: &Value, pattern: &Regex) -> AssertionResult {
    let description = "value matches";
    let expected = format!("string matching /{}/", pattern.as_str());
    match actual {
        Value::String(text) => AssertionResult::from_outcome(
            pattern.is_match(text),
            FailureKind::Mismatch,
            description,
            expected,
            actual.to_string(),
        ),
        other => AssertionResult::fail(
            FailureKind::Mismatch,
            description,
            expected,
            other.to_string(),
        ),
    }
}
