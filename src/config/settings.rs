use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, Context, Result};
use url::Url;

use crate::{
    env::{expand_placeholders, load_env_file, EnvMap},
    http::{Credentials, DEFAULT_TIMEOUT},
    runner::RunnerOptions,
    suites::{self, SuiteConfig},
};

use super::loader::{ApiprobeConfig, LoadedConfig, ProfileConfig, SuiteFileConfig};

/// Everything a run needs, with profile overrides and placeholders applied.
#[derive(Debug, Clone)]
pub struct ProbeSettings {
    pub profile: Option<String>,
    pub timeout: Duration,
    pub runner: RunnerOptions,
    pub report_path: Option<PathBuf>,
    pub reqres: Option<SuiteConfig>,
    pub selenoid: Option<SuiteConfig>,
    pub env_files: Vec<PathBuf>,
}

impl ProbeSettings {
    /// Settings used when no config file exists.
    pub fn defaults() -> Result<Self> {
        resolve_settings(None, None)
    }
}

pub fn resolve_settings(
    config: Option<&LoadedConfig>,
    requested_profile: Option<&str>,
) -> Result<ProbeSettings> {
    let empty = ApiprobeConfig::default();
    let (file, config_dir) = match config {
        Some(loaded) => (&loaded.config, loaded.dir.clone()),
        None => (&empty, std::env::current_dir()?),
    };

    reject_unknown_suites(file)?;
    let profile = resolve_profile(file, requested_profile)?;
    let overrides = profile.map(|(_, profile)| profile);
    let pick = |select: fn(&ProfileConfig) -> Option<&str>| {
        overrides.and_then(select).or_else(|| select(&file.base))
    };

    let mut env = EnvMap::new();
    let mut env_files = Vec::new();
    if let Some(env_file) = pick(|p| p.env.as_deref()) {
        let path = resolve_relative(&config_dir, env_file);
        load_env_file(&path, &mut env)?;
        env_files.push(path);
    }

    let defaults = RunnerOptions::default();
    let runner = RunnerOptions {
        concurrency: overrides
            .and_then(|p| p.concurrency)
            .or(file.base.concurrency)
            .unwrap_or(defaults.concurrency),
        log: overrides
            .and_then(|p| p.log)
            .or(file.base.log)
            .unwrap_or(defaults.log),
        preview_bytes: overrides
            .and_then(|p| p.preview_bytes)
            .or(file.base.preview_bytes)
            .unwrap_or(defaults.preview_bytes),
    };
    let timeout = overrides
        .and_then(|p| p.timeout_ms)
        .or(file.base.timeout_ms)
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_TIMEOUT);

    let report_path = pick(|p| p.report_path.as_deref())
        .map(|raw| expand_placeholders(raw, &env))
        .transpose()?
        .map(|expanded| resolve_relative(&config_dir, &expanded));

    let suite = |name: &str, fallback: SuiteConfig| -> Result<Option<SuiteConfig>> {
        let merged = merge_suite(
            file.base.suites.get(name),
            overrides.and_then(|p| p.suites.get(name)),
        );
        build_suite(name, &merged, fallback, &env)
    };

    Ok(ProbeSettings {
        profile: profile.map(|(name, _)| name.to_string()),
        timeout,
        runner,
        report_path,
        reqres: suite(suites::reqres::NAME, suites::reqres::default_config()?)?,
        selenoid: suite(suites::selenoid::NAME, suites::selenoid::default_config()?)?,
        env_files,
    })
}

fn resolve_profile<'a>(
    config: &'a ApiprobeConfig,
    requested: Option<&str>,
) -> Result<Option<(&'a str, &'a ProfileConfig)>> {
    let wanted = match requested.or(config.default_profile.as_deref()) {
        Some(name) => name,
        None => return Ok(None),
    };
    match config.profiles.get_key_value(wanted) {
        Some((name, profile)) => Ok(Some((name.as_str(), profile))),
        None => bail!("Unknown profile: {wanted}"),
    }
}

fn reject_unknown_suites(config: &ApiprobeConfig) -> Result<()> {
    const KNOWN: [&str; 2] = [suites::reqres::NAME, suites::selenoid::NAME];
    let scopes = std::iter::once(("top level".to_string(), &config.base)).chain(
        config
            .profiles
            .iter()
            .map(|(name, profile)| (format!("profile {name}"), profile)),
    );
    for (scope, profile) in scopes {
        if let Some(unknown) = profile.suites.keys().find(|name| !KNOWN.contains(&name.as_str())) {
            bail!(
                "Unknown suite in {scope}: {unknown} (expected one of {})",
                KNOWN.join(", ")
            );
        }
    }
    Ok(())
}

fn merge_suite(base: Option<&SuiteFileConfig>, over: Option<&SuiteFileConfig>) -> SuiteFileConfig {
    let mut merged = base.cloned().unwrap_or_default();
    if let Some(over) = over {
        merged.enabled = over.enabled.or(merged.enabled);
        merged.base_url = over.base_url.clone().or(merged.base_url);
        merged.username = over.username.clone().or(merged.username);
        merged.password = over.password.clone().or(merged.password);
        merged.default_headers.extend(over.default_headers.clone());
    }
    merged
}

fn build_suite(
    name: &str,
    file: &SuiteFileConfig,
    fallback: SuiteConfig,
    env: &EnvMap,
) -> Result<Option<SuiteConfig>> {
    if file.enabled == Some(false) {
        return Ok(None);
    }
    let expand = |raw: &str| {
        expand_placeholders(raw, env).with_context(|| format!("expanding {name} suite settings"))
    };

    let mut suite = fallback;
    if let Some(raw) = &file.base_url {
        let base_url = expand(raw)?;
        suite.base_url = Url::parse(&base_url)
            .with_context(|| format!("invalid baseUrl for {name} suite: {base_url}"))?;
    }

    match (&file.username, &file.password) {
        (Some(user), password) => {
            let password = password.as_deref().map(&expand).transpose()?.unwrap_or_default();
            suite.credentials = Some(Credentials::new(expand(user)?, password));
        }
        (None, Some(password)) => {
            let Some(existing) = suite.credentials.as_mut() else {
                bail!("{name} suite sets a password without a username");
            };
            existing.password = expand(password)?;
        }
        (None, None) => {}
    }

    let mut headers: Vec<_> = file.default_headers.iter().collect();
    headers.sort();
    for (header, value) in headers {
        suite.set_header(header, expand(value)?);
    }

    Ok(Some(suite))
}

fn resolve_relative(base: &Path, value: &str) -> PathBuf {
    let candidate = Path::new(value);
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        base.join(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::load_config, runner::LogDetail};
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn load(contents: &str, extra: &[(&str, &str)]) -> Result<(tempfile::TempDir, LoadedConfig)> {
        let temp = tempdir()?;
        fs::write(temp.path().join("apiprobe.json"), contents)?;
        for (name, body) in extra {
            fs::write(temp.path().join(name), body)?;
        }
        let loaded = load_config(temp.path())?.expect("config should load");
        Ok((temp, loaded))
    }

    #[test]
    fn defaults_target_public_services() -> Result<()> {
        let settings = ProbeSettings::defaults()?;
        let reqres = settings.reqres.expect("reqres enabled");
        let selenoid = settings.selenoid.expect("selenoid enabled");

        assert_eq!(reqres.base_url.as_str(), "https://reqres.in/");
        assert_eq!(selenoid.base_url.as_str(), "https://selenoid.autotests.cloud/");
        assert_eq!(selenoid.credentials, Some(Credentials::new("user1", "1234")));
        assert_eq!(settings.timeout, DEFAULT_TIMEOUT);
        assert_eq!(settings.runner.log, LogDetail::Summary);
        assert!(settings.profile.is_none());
        Ok(())
    }

    #[test]
    fn profile_overrides_base_and_expands_env_file() -> Result<()> {
        let (temp, loaded) = load(
            r#"{
  "timeoutMs": 1000,
  "concurrency": 2,
  "suites": {
    "selenoid": {"baseUrl": "https://grid.example", "username": "{GRID_USER}", "password": "{GRID_PASS}"}
  },
  "profiles": {
    "local": {
      "env": "local.env",
      "timeoutMs": 250,
      "reportPath": "reports/{RUN}.json",
      "suites": {
        "reqres": {"enabled": false},
        "selenoid": {"baseUrl": "http://127.0.0.1:4444"}
      }
    }
  }
}"#,
            &[("local.env", "GRID_USER=alice\nGRID_PASS=secret\nRUN=nightly\n")],
        )?;

        let settings = resolve_settings(Some(&loaded), Some("local"))?;

        assert_eq!(settings.profile.as_deref(), Some("local"));
        assert_eq!(settings.timeout, Duration::from_millis(250));
        assert_eq!(settings.runner.concurrency, 2);
        assert!(settings.reqres.is_none());
        let selenoid = settings.selenoid.expect("selenoid enabled");
        assert_eq!(selenoid.base_url.as_str(), "http://127.0.0.1:4444/");
        assert_eq!(selenoid.credentials, Some(Credentials::new("alice", "secret")));
        assert_eq!(
            settings.report_path,
            Some(temp.path().join("reports/nightly.json"))
        );
        assert_eq!(settings.env_files, vec![temp.path().join("local.env")]);
        Ok(())
    }

    #[test]
    fn default_profile_is_used_when_none_requested() -> Result<()> {
        let (_temp, loaded) = load(
            r#"{"defaultProfile": "quiet", "profiles": {"quiet": {"log": "off"}}}"#,
            &[],
        )?;
        let settings = resolve_settings(Some(&loaded), None)?;
        assert_eq!(settings.profile.as_deref(), Some("quiet"));
        assert_eq!(settings.runner.log, LogDetail::Off);
        Ok(())
    }

    #[test]
    fn unknown_profile_is_an_error() -> Result<()> {
        let (_temp, loaded) = load(r#"{"profiles": {"ci": {}}}"#, &[])?;
        let err = resolve_settings(Some(&loaded), Some("prod")).unwrap_err();
        assert!(err.to_string().contains("Unknown profile: prod"));
        Ok(())
    }

    #[test]
    fn unknown_suite_name_is_an_error() -> Result<()> {
        let (_temp, loaded) = load(r#"{"suites": {"reqers": {"enabled": false}}}"#, &[])?;
        let err = resolve_settings(Some(&loaded), None).unwrap_err();
        assert!(err.to_string().contains("Unknown suite in top level: reqers"));

        let (_temp, loaded) = load(
            r#"{"profiles": {"ci": {"suites": {"selenium": {}}}}}"#,
            &[],
        )?;
        let err = resolve_settings(Some(&loaded), None).unwrap_err();
        assert!(err.to_string().contains("Unknown suite in profile ci: selenium"));
        Ok(())
    }

    #[test]
    fn header_overrides_replace_defaults() -> Result<()> {
        let (_temp, loaded) = load(
            r#"{"suites": {"reqres": {"defaultHeaders": {"x-api-key": "custom", "accept": "application/json"}}}}"#,
            &[],
        )?;
        let reqres = resolve_settings(Some(&loaded), None)?
            .reqres
            .expect("reqres enabled");
        assert_eq!(
            reqres.default_headers,
            vec![
                ("x-api-key".to_string(), "custom".to_string()),
                ("accept".to_string(), "application/json".to_string()),
            ]
        );
        Ok(())
    }

    #[test]
    fn password_alone_keeps_default_username() -> Result<()> {
        let (_temp, loaded) = load(r#"{"suites": {"selenoid": {"password": "rotated"}}}"#, &[])?;
        let selenoid = resolve_settings(Some(&loaded), None)?
            .selenoid
            .expect("selenoid enabled");
        assert_eq!(selenoid.credentials, Some(Credentials::new("user1", "rotated")));
        Ok(())
    }

    #[test]
    fn invalid_base_url_names_the_suite() -> Result<()> {
        let (_temp, loaded) = load(r#"{"suites": {"reqres": {"baseUrl": "not a url"}}}"#, &[])?;
        let err = resolve_settings(Some(&loaded), None).unwrap_err();
        assert!(err.to_string().contains("invalid baseUrl for reqres suite"));
        Ok(())
    }
}
