//! Executes test cases: one request, then every check against the response.

mod case;
mod logging;

use std::time::Instant;

use chrono::Utc;
use futures_util::{stream, StreamExt};

use crate::{
    http::Transport,
    report::{SuiteReport, TestOutcome, Verdict},
};

pub use case::{Check, CheckError, TestCase};
pub use logging::{preview_body, LogDetail};

pub const DEFAULT_CONCURRENCY: usize = 4;
pub const DEFAULT_PREVIEW_BYTES: usize = 2048;

#[derive(Debug, Clone, Copy)]
pub struct RunnerOptions {
    /// Tests in flight at once within a suite.
    pub concurrency: usize,
    pub log: LogDetail,
    pub preview_bytes: usize,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            log: LogDetail::default(),
            preview_bytes: DEFAULT_PREVIEW_BYTES,
        }
    }
}

pub struct Runner<T> {
    transport: T,
    options: RunnerOptions,
}

impl<T: Transport> Runner<T> {
    pub fn new(transport: T, options: RunnerOptions) -> Self {
        Self { transport, options }
    }

    pub async fn run_test(&self, case: &TestCase) -> TestOutcome {
        let detail = case.log.unwrap_or(self.options.log);
        let start = Instant::now();

        logging::log_request(&case.name, &case.request, detail, self.options.preview_bytes);
        let capture = match self.transport.send(&case.request).await {
            Ok(capture) => capture,
            Err(error) => {
                log::warn!("[{}] transport error: {error}", case.name);
                return TestOutcome::new(&case.name, Verdict::Errored(error), Vec::new(), None)
                    .with_duration(start.elapsed());
            }
        };
        logging::log_response(&case.name, &capture, detail, self.options.preview_bytes);

        let results: Vec<_> = case
            .checks
            .iter()
            .map(|check| check.evaluate(&capture))
            .collect();
        let verdict = if results.iter().all(|result| result.passed) {
            Verdict::Passed
        } else {
            Verdict::Failed
        };
        log::debug!("[{}] {verdict:?}", case.name);

        TestOutcome::new(&case.name, verdict, results, Some(capture.status()))
            .with_duration(start.elapsed())
    }

    /// Runs every case; outcomes keep the order of `cases`.
    pub async fn run_suite(&self, name: &str, cases: &[TestCase]) -> SuiteReport {
        let started_at = Utc::now();
        let outcomes = stream::iter(cases.iter().map(|case| self.run_test(case)))
            .buffered(self.options.concurrency.max(1))
            .collect::<Vec<_>>()
            .await;
        SuiteReport::new(name, outcomes, started_at, Utc::now())
    }
}
