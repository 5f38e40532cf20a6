use std::process::ExitCode;

use anyhow::{Context, Result};
use apiprobe::config::settings_from_environment;
use apiprobe::http::ReqwestTransport;
use apiprobe::report::{exit_code, print_report, write_report};
use apiprobe::runner::Runner;
use apiprobe::suites;
use colored::Colorize;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<ExitCode> {
    let settings = settings_from_environment()?;
    if let Some(profile) = &settings.profile {
        log::info!("using profile {profile}");
    }

    let suites = suites::all(&settings)?;
    let transport = ReqwestTransport::new(settings.timeout).context("building HTTP client")?;
    let runner = Runner::new(transport, settings.runner);

    let mut reports = Vec::with_capacity(suites.len());
    for suite in &suites {
        let report = runner.run_suite(suite.name, &suite.cases).await;
        print_report(&report);
        reports.push(report);
    }

    if let Some(path) = &settings.report_path {
        write_report(path, &reports)?;
        println!("Report written to {}", path.display());
    }

    Ok(exit_code(&reports))
}
