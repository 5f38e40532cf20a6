use serde::Serialize;

/// Why a check did not pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    UnexpectedStatus,
    Mismatch,
    MissingKey,
    MalformedBody,
    PathNotFound,
}

impl FailureKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::UnexpectedStatus => "unexpected status code",
            Self::Mismatch => "assertion mismatch",
            Self::MissingKey => "missing key",
            Self::MalformedBody => "malformed body",
            Self::PathNotFound => "path not found",
        }
    }
}

/// Outcome of one comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssertionResult {
    pub description: String,
    pub passed: bool,
    pub expected: String,
    pub actual: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
}

impl AssertionResult {
    pub fn pass(
        description: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            passed: true,
            expected: expected.into(),
            actual: actual.into(),
            failure: None,
        }
    }

    pub fn fail(
        kind: FailureKind,
        description: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            passed: false,
            expected: expected.into(),
            actual: actual.into(),
            failure: Some(kind),
        }
    }

    pub(crate) fn from_outcome(
        passed: bool,
        kind: FailureKind,
        description: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        if passed {
            Self::pass(description, expected, actual)
        } else {
            Self::fail(kind, description, expected, actual)
        }
    }

    /// Renames the check, keeping the outcome.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn message(&self) -> String {
        match self.failure {
            None => format!("{}: ok", self.description),
            Some(kind) => format!(
                "{} ({}): expected {}, actual {}",
                self.description,
                kind.label(),
                self.expected,
                self.actual
            ),
        }
    }
}
