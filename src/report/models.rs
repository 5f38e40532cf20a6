use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{assertions::AssertionResult, http::TransportError};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "verdict", content = "error", rename_all = "snake_case")]
pub enum Verdict {
    Passed,
    Failed,
    /// No response was received, so no check ran.
    Errored(TransportError),
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TestOutcome {
    pub name: String,
    #[serde(flatten)]
    pub verdict: Verdict,
    pub status: Option<u16>,
    pub results: Vec<AssertionResult>,
    pub duration_ms: f64,
}

impl TestOutcome {
    pub fn new(
        name: impl Into<String>,
        verdict: Verdict,
        results: Vec<AssertionResult>,
        status: Option<u16>,
    ) -> Self {
        Self {
            name: name.into(),
            verdict,
            status,
            results,
            duration_ms: 0.0,
        }
    }

    pub fn with_duration(mut self, elapsed: Duration) -> Self {
        self.duration_ms = elapsed.as_secs_f64() * 1000.0;
        self
    }

    pub fn failures(&self) -> impl Iterator<Item = &AssertionResult> {
        self.results.iter().filter(|result| !result.passed)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    pub suite: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
    pub outcomes: Vec<TestOutcome>,
}

impl SuiteReport {
    pub fn new(
        suite: impl Into<String>,
        outcomes: Vec<TestOutcome>,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        let count = |wanted: fn(&Verdict) -> bool| {
            outcomes
                .iter()
                .filter(|outcome| wanted(&outcome.verdict))
                .count()
        };
        let passed = count(|v| matches!(v, Verdict::Passed));
        let failed = count(|v| matches!(v, Verdict::Failed));
        let errored = count(|v| matches!(v, Verdict::Errored(_)));

        Self {
            suite: suite.into(),
            started_at,
            finished_at,
            total: outcomes.len(),
            passed,
            failed,
            errored,
            outcomes,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.passed == self.total
    }

    pub fn outcome(&self, name: &str) -> Option<&TestOutcome> {
        self.outcomes.iter().find(|outcome| outcome.name == name)
    }
}
