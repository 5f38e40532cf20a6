use std::time::Duration;

use anyhow::{Context, Result};
use apiprobe::http::{ReqwestTransport, Transport, TransportError};
use apiprobe::report::{SuiteReport, Verdict};
use apiprobe::runner::{Runner, RunnerOptions, TestCase};
use apiprobe::suites::{selenoid, SuiteConfig};
use httpmock::prelude::*;

const AUTHORIZATION: &str = "Basic dXNlcjE6MTIzNA==";
const HUB_READY: &str = r#"{"value":{"ready":true,"message":"Selenoid 1.10.7 built at 2021-11-21_05:46:32AM"}}"#;

fn config(server: &MockServer) -> Result<SuiteConfig> {
    Ok(SuiteConfig::new(&server.base_url())?.with_credentials(
        apiprobe::http::Credentials::new(selenoid::USERNAME, selenoid::PASSWORD),
    ))
}

fn case(cases: &[TestCase], name: &str) -> Result<TestCase> {
    cases
        .iter()
        .find(|case| case.name == name)
        .cloned()
        .with_context(|| format!("missing case {name}"))
}

async fn run_suite(server: &MockServer, timeout: Duration) -> Result<SuiteReport> {
    let cases = selenoid::suite(&config(server)?)?;
    let runner = Runner::new(ReqwestTransport::new(timeout)?, RunnerOptions::default());
    Ok(runner.run_suite(selenoid::NAME, &cases).await)
}

fn verdict<'a>(report: &'a SuiteReport, name: &str) -> &'a Verdict {
    &report
        .outcome(name)
        .unwrap_or_else(|| panic!("missing outcome {name}"))
        .verdict
}

#[tokio::test]
async fn status_checks_pass_on_canonical_body() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/status");
            then.status(200)
                .header("content-type", "application/json")
                .body(selenoid::STATUS_BODY);
        })
        .await;

    let report = run_suite(&server, Duration::from_secs(5)).await?;

    for name in [
        "status_total",
        "status_total_literal_body",
        "status_chrome_version",
    ] {
        assert_eq!(verdict(&report, name), &Verdict::Passed, "{name}");
    }
    Ok(())
}

#[tokio::test]
async fn reordered_body_only_breaks_literal_check() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/status");
            then.status(200).body(
                r#"{"browsers":{"chrome":{"99.0":{},"100.0":{}}},"used":0,"total":20}"#,
            );
        })
        .await;

    let report = run_suite(&server, Duration::from_secs(5)).await?;

    assert_eq!(verdict(&report, "status_total"), &Verdict::Passed);
    assert_eq!(verdict(&report, "status_chrome_version"), &Verdict::Passed);
    assert_eq!(
        verdict(&report, "status_total_literal_body"),
        &Verdict::Failed
    );
    Ok(())
}

#[tokio::test]
async fn hub_rejects_requests_without_credentials() -> Result<()> {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/wd/hub/status");
            then.status(401).body("Unauthorized\n");
        })
        .await;

    let report = run_suite(&server, Duration::from_secs(5)).await?;

    assert_eq!(
        verdict(&report, "hub_status_unauthenticated"),
        &Verdict::Passed
    );
    assert_eq!(
        verdict(&report, "hub_status_basic_auth"),
        &Verdict::Failed
    );
    mock.assert_hits_async(3).await;
    Ok(())
}

#[tokio::test]
async fn both_credential_routes_send_identical_requests() -> Result<()> {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/wd/hub/status")
                .header("authorization", AUTHORIZATION);
            then.status(200)
                .header("content-type", "application/json")
                .body(HUB_READY);
        })
        .await;

    let cases = selenoid::suite(&config(&server)?)?;
    let in_url = case(&cases, "hub_status_credentials_in_url")?;
    let explicit = case(&cases, "hub_status_basic_auth")?;

    let transport = ReqwestTransport::new(Duration::from_secs(5))?;
    let from_url = transport.send(&in_url.request).await?;
    let from_header = transport.send(&explicit.request).await?;

    mock.assert_hits_async(2).await;
    assert_eq!(from_url.status(), 200);
    assert_eq!(from_url.status(), from_header.status());
    assert_eq!(from_url.body(), from_header.body());
    assert_eq!(from_url.json()?["value"]["ready"], true);

    let runner = Runner::new(transport, RunnerOptions::default());
    assert!(runner.run_test(&in_url).await.verdict.is_pass());
    assert!(runner.run_test(&explicit).await.verdict.is_pass());
    Ok(())
}

#[tokio::test]
async fn slow_endpoint_errors_without_affecting_siblings() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/status");
            then.status(200)
                .body(selenoid::STATUS_BODY)
                .delay(Duration::from_secs(2));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/wd/hub/status")
                .header("authorization", AUTHORIZATION);
            then.status(200).body(HUB_READY);
        })
        .await;

    let report = run_suite(&server, Duration::from_millis(200)).await?;

    let names: Vec<_> = report.outcomes.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(
        names,
        [
            "status_total",
            "status_total_literal_body",
            "status_chrome_version",
            "hub_status_unauthenticated",
            "hub_status_credentials_in_url",
            "hub_status_basic_auth",
        ]
    );
    for name in [
        "status_total",
        "status_total_literal_body",
        "status_chrome_version",
    ] {
        let outcome = report.outcome(name).context("outcome")?;
        assert!(
            matches!(
                outcome.verdict,
                Verdict::Errored(TransportError::Timeout { timeout_ms: 200, .. })
            ),
            "{name}: {:?}",
            outcome.verdict
        );
        assert!(outcome.results.is_empty());
        assert_eq!(outcome.status, None);
    }
    assert_eq!(
        verdict(&report, "hub_status_credentials_in_url"),
        &Verdict::Passed
    );
    assert_eq!(verdict(&report, "hub_status_basic_auth"), &Verdict::Passed);
    assert_eq!(report.errored, 3);
    assert!(!report.all_passed());
    Ok(())
}
