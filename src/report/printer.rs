use colored::{Color, Colorize};

use super::models::{SuiteReport, TestOutcome, Verdict};

pub fn print_report(report: &SuiteReport) {
    print!("{}", render_report(report));
}

pub fn render_report(report: &SuiteReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} {}\n", "Suite".bold(), report.suite.cyan()));

    for outcome in &report.outcomes {
        out.push_str(&render_outcome(outcome));
    }

    let summary_color = if report.all_passed() {
        Color::Green
    } else {
        Color::Red
    };
    let summary = format!(
        "{} passed, {} failed, {} errored ({} total)",
        report.passed, report.failed, report.errored, report.total
    );
    let elapsed_ms = (report.finished_at - report.started_at).num_milliseconds();
    out.push_str(&format!(
        "{} {} {}\n",
        "Result:".bold(),
        summary.color(summary_color),
        format!("in {elapsed_ms} ms").dimmed()
    ));
    out
}

fn render_outcome(outcome: &TestOutcome) -> String {
    let (label, color) = match &outcome.verdict {
        Verdict::Passed => ("PASS", Color::Green),
        Verdict::Failed => ("FAIL", Color::Red),
        Verdict::Errored(_) => ("ERROR", Color::Yellow),
    };

    let mut out = format!(
        "  {} {} {}\n",
        format!("{label:<5}").color(color).bold(),
        outcome.name,
        format!("({:.1} ms)", outcome.duration_ms).dimmed()
    );

    if let Verdict::Errored(error) = &outcome.verdict {
        out.push_str(&format!("        {}\n", error.to_string().yellow()));
    }
    for failure in outcome.failures() {
        out.push_str(&format!("        {} {}\n", "-".red(), failure.message()));
    }
    out
}
