mod models;
mod printer;
mod writer;

pub use models::{SuiteReport, TestOutcome, Verdict};
pub use printer::{print_report, render_report};
pub use writer::{all_passed, exit_code, write_report};
