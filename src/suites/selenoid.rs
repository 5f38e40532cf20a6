//! Contract checks for the selenoid browser grid.

use anyhow::{anyhow, Result};

use crate::{
    http::{Credentials, HttpMethod, RequestSpec},
    runner::{Check, LogDetail, TestCase},
};

use super::SuiteConfig;

pub const NAME: &str = "selenoid";
pub const BASE_URL: &str = "https://selenoid.autotests.cloud";
pub const USERNAME: &str = "user1";
pub const PASSWORD: &str = "1234";

pub const EXPECTED_TOTAL: u64 = 20;
/// `/status` exactly as the grid serializes it, trailing newline included.
pub const STATUS_BODY: &str = concat!(
    r#"{"total":20,"used":0,"queued":0,"pending":0,"browsers":"#,
    r#"{"android":{"8.1":{}},"chrome":{"100.0":{},"99.0":{}},"#,
    r#""chrome-mobile":{"86.0":{}},"firefox":{"97.0":{},"98.0":{}},"#,
    r#""opera":{"84.0":{},"85.0":{}}}}"#,
    "\n"
);

pub fn default_config() -> Result<SuiteConfig> {
    Ok(SuiteConfig::new(BASE_URL)?.with_credentials(Credentials::new(USERNAME, PASSWORD)))
}

pub fn suite(config: &SuiteConfig) -> Result<Vec<TestCase>> {
    let credentials = config
        .credentials
        .clone()
        .ok_or_else(|| anyhow!("selenoid suite needs grid credentials"))?;

    Ok(vec![
        TestCase::new("status_total", config.request(HttpMethod::Get, "/status")?)
            .check(Check::status(200))
            .check(Check::field("total", EXPECTED_TOTAL)?),
        // Legacy whole-body comparison: breaks on any reordering or whitespace change.
        TestCase::new(
            "status_total_literal_body",
            config.request(HttpMethod::Get, "/status")?,
        )
        .check(Check::body_literal(STATUS_BODY)),
        TestCase::new(
            "status_chrome_version",
            config.request(HttpMethod::Get, "/status")?,
        )
        .check(Check::status(200))
        .check(Check::has_key("browsers.chrome", "100.0")?)
        .log(LogDetail::All),
        TestCase::new(
            "hub_status_unauthenticated",
            config.request(HttpMethod::Get, "/wd/hub/status")?,
        )
        .check(Check::status(401)),
        TestCase::new(
            "hub_status_credentials_in_url",
            hub_status_with_userinfo(config, &credentials)?,
        )
        .check(Check::status(200))
        .check(Check::field("value.ready", true)?),
        TestCase::new(
            "hub_status_basic_auth",
            config
                .request(HttpMethod::Get, "/wd/hub/status")?
                .with_basic_auth(credentials),
        )
        .check(Check::status(200))
        .check(Check::field("value.ready", true)?),
    ])
}

fn hub_status_with_userinfo(
    config: &SuiteConfig,
    credentials: &Credentials,
) -> Result<RequestSpec> {
    let mut url = config.endpoint("/wd/hub/status")?;
    url.set_username(&credentials.username)
        .and_then(|()| url.set_password(Some(&credentials.password)))
        .map_err(|()| anyhow!("{} cannot carry credentials", config.base_url))?;
    Ok(RequestSpec::get(url).with_headers(config.default_headers.clone()))
}
