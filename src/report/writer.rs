use std::{fs, path::Path, process::ExitCode};

use anyhow::{Context, Result};

use super::models::SuiteReport;

/// Writes every suite report to `path` as pretty JSON.
pub fn write_report(path: &Path, reports: &[SuiteReport]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating report directory {}", parent.display()))?;
    }
    let contents = serde_json::to_string_pretty(reports).context("serializing report")?;
    fs::write(path, contents).with_context(|| format!("writing report to {}", path.display()))?;
    Ok(())
}

pub fn all_passed(reports: &[SuiteReport]) -> bool {
    reports.iter().all(SuiteReport::all_passed)
}

pub fn exit_code(reports: &[SuiteReport]) -> ExitCode {
    if all_passed(reports) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
