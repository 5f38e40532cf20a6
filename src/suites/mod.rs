//! Canonical suites for the public demo services.
//!
//! Every suite is built from an explicit [`SuiteConfig`], so the same cases
//! run against the live service or a local stand-in.

pub mod reqres;
pub mod selenoid;

use anyhow::{Context, Result};
use url::Url;

use crate::{
    config::ProbeSettings,
    http::{Credentials, HttpMethod, RequestSpec},
    runner::TestCase,
};

#[derive(Debug, Clone, PartialEq)]
pub struct SuiteConfig {
    pub base_url: Url,
    pub credentials: Option<Credentials>,
    /// Sent with every request of the suite.
    pub default_headers: Vec<(String, String)>,
}

impl SuiteConfig {
    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            credentials: None,
            default_headers: Vec::new(),
        })
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_header(&name.into(), value.into());
        self
    }

    /// Replaces a header with the same (case-insensitive) name or appends it.
    pub fn set_header(&mut self, name: &str, value: String) {
        match self
            .default_headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        {
            Some(entry) => entry.1 = value,
            None => self.default_headers.push((name.to_string(), value)),
        }
    }

    /// Resolves `path` below the base URL, keeping any base path prefix.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let mut base = self.base_url.clone();
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }
        base.join(path.trim_start_matches('/'))
            .with_context(|| format!("joining {path} onto {}", self.base_url))
    }

    pub fn request(&self, method: HttpMethod, path: &str) -> Result<RequestSpec> {
        let url = self.endpoint(path)?;
        Ok(RequestSpec::new(method, url).with_headers(self.default_headers.clone()))
    }
}

#[derive(Debug, Clone)]
pub struct Suite {
    pub name: &'static str,
    pub cases: Vec<TestCase>,
}

/// Builds every suite enabled in `settings`.
pub fn all(settings: &ProbeSettings) -> Result<Vec<Suite>> {
    let mut suites = Vec::new();
    if let Some(config) = &settings.reqres {
        suites.push(Suite {
            name: reqres::NAME,
            cases: reqres::suite(config).context("building reqres suite")?,
        });
    }
    if let Some(config) = &settings.selenoid {
        suites.push(Suite {
            name: selenoid::NAME,
            cases: selenoid::suite(config).context("building selenoid suite")?,
        });
    }
    Ok(suites)
}
