use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::runner::LogDetail;

pub const CONFIG_FILE_NAME: &str = "apiprobe.json";

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SuiteFileConfig {
    pub enabled: Option<bool>,
    pub base_url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub default_headers: HashMap<String, String>,
}

/// Settings shared by the top level of the file and every profile.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ProfileConfig {
    pub env: Option<String>,
    pub timeout_ms: Option<u64>,
    pub concurrency: Option<usize>,
    pub log: Option<LogDetail>,
    pub preview_bytes: Option<usize>,
    pub report_path: Option<String>,
    pub suites: HashMap<String, SuiteFileConfig>,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiprobeConfig {
    pub default_profile: Option<String>,
    pub profiles: HashMap<String, ProfileConfig>,
    #[serde(flatten)]
    pub base: ProfileConfig,
}

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: ApiprobeConfig,
    pub path: PathBuf,
    pub dir: PathBuf,
}

/// Loads `target`, or `target/apiprobe.json` when it is a directory.
/// A missing file is not an error.
pub fn load_config(target: &Path) -> Result<Option<LoadedConfig>> {
    let resolved = if target.is_absolute() {
        target.to_path_buf()
    } else {
        std::env::current_dir()?.join(target)
    };

    let (file_path, dir) = if resolved.is_dir() {
        (resolved.join(CONFIG_FILE_NAME), resolved)
    } else {
        let dir = match resolved.parent() {
            Some(parent) => parent.to_path_buf(),
            None => std::env::current_dir()?,
        };
        (resolved, dir)
    };

    if !file_path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(&file_path)
        .with_context(|| format!("reading config {}", file_path.display()))?;
    let config: ApiprobeConfig = serde_json::from_str(&contents)
        .with_context(|| format!("parsing config {}", file_path.display()))?;

    Ok(Some(LoadedConfig {
        config,
        path: file_path,
        dir,
    }))
}
