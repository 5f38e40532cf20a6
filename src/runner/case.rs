use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use crate::{
    assertions::{self, AssertionResult, FailureKind},
    extract::{extract_ref, ExtractError, FieldPath, FieldPathError},
    http::{RequestSpec, ResponseCapture},
};

use super::logging::LogDetail;

#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    InvalidPath(#[from] FieldPathError),
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// One declarative assertion against a captured response.
#[derive(Debug, Clone)]
pub enum Check {
    Status(u16),
    Field { path: FieldPath, expected: Value },
    HasKey { path: FieldPath, key: String },
    FieldMatches { path: FieldPath, pattern: Regex },
    /// Structural whole-body comparison.
    BodyEquals(Value),
    /// Literal whole-body comparison; whitespace and key order sensitive.
    BodyLiteral(String),
    BodyContains(String),
}

impl Check {
    pub fn status(code: u16) -> Self {
        Self::Status(code)
    }

    pub fn field(path: &str, expected: impl Into<Value>) -> Result<Self, CheckError> {
        Ok(Self::Field {
            path: FieldPath::parse(path)?,
            expected: expected.into(),
        })
    }

    pub fn has_key(path: &str, key: impl Into<String>) -> Result<Self, CheckError> {
        Ok(Self::HasKey {
            path: FieldPath::parse(path)?,
            key: key.into(),
        })
    }

    pub fn field_matches(path: &str, pattern: &str) -> Result<Self, CheckError> {
        Ok(Self::FieldMatches {
            path: FieldPath::parse(path)?,
            pattern: Regex::new(pattern)?,
        })
    }

    pub fn body_equals(expected: Value) -> Self {
        Self::BodyEquals(expected)
    }

    pub fn body_literal(expected: impl Into<String>) -> Self {
        Self::BodyLiteral(expected.into())
    }

    pub fn body_contains(needle: impl Into<String>) -> Self {
        Self::BodyContains(needle.into())
    }

    pub fn evaluate(&self, capture: &ResponseCapture) -> AssertionResult {
        match self {
            Self::Status(expected) => assertions::status_code_equals(capture.status(), *expected),
            Self::Field { path, expected } => {
                let description = format!("{} equals", display_path(path));
                match extract_ref(capture, path) {
                    Ok(actual) => assertions::equals(actual, expected).describe(description),
                    Err(err) => extraction_failure(err, description, expected.to_string()),
                }
            }
            Self::HasKey { path, key } => {
                let description = format!("{} has key {key:?}", display_path(path));
                match extract_ref(capture, path) {
                    Ok(actual) => assertions::has_key(actual, key).describe(description),
                    Err(err) => {
                        extraction_failure(err, description, format!("object with key {key:?}"))
                    }
                }
            }
            Self::FieldMatches { path, pattern } => {
                let description = format!("{} matches", display_path(path));
                match extract_ref(capture, path) {
                    Ok(actual) => assertions::matches(actual, pattern).describe(description),
                    Err(err) => extraction_failure(
                        err,
                        description,
                        format!("string matching /{}/", pattern.as_str()),
                    ),
                }
            }
            Self::BodyEquals(expected) => assertions::body_equals(&capture.text(), expected),
            Self::BodyLiteral(expected) => {
                assertions::body_equals_literal(&capture.text(), expected)
            }
            Self::BodyContains(needle) => {
                assertions::contains(&capture.text(), needle).describe("body contains")
            }
        }
    }
}

fn display_path(path: &FieldPath) -> String {
    if path.is_root() {
        "body".to_string()
    } else {
        path.to_string()
    }
}

fn extraction_failure(err: ExtractError, description: String, expected: String) -> AssertionResult {
    let kind = match err {
        ExtractError::MalformedBody { .. } => FailureKind::MalformedBody,
        ExtractError::PathNotFound { .. } => FailureKind::PathNotFound,
    };
    AssertionResult::fail(kind, description, expected, err.to_string())
}

/// A single request plus the checks run against its response.
#[derive(Debug, Clone)]
pub struct TestCase {
    pub name: String,
    pub request: RequestSpec,
    pub checks: Vec<Check>,
    pub log: Option<LogDetail>,
}

impl TestCase {
    pub fn new(name: impl Into<String>, request: RequestSpec) -> Self {
        Self {
            name: name.into(),
            request,
            checks: Vec::new(),
            log: None,
        }
    }

    pub fn check(mut self, check: Check) -> Self {
        self.checks.push(check);
        self
    }

    pub fn checks(mut self, checks: impl IntoIterator<Item = Check>) -> Self {
        self.checks.extend(checks);
        self
    }

    /// Overrides the runner-wide log detail for this test only.
    pub fn log(mut self, detail: LogDetail) -> Self {
        self.log = Some(detail);
        self
    }
}
