mod loader;
mod settings;

use std::path::PathBuf;

use anyhow::{Context, Result};

pub use loader::{
    load_config, ApiprobeConfig, LoadedConfig, ProfileConfig, SuiteFileConfig, CONFIG_FILE_NAME,
};
pub use settings::{resolve_settings, ProbeSettings};

/// File or directory holding the config; defaults to the working directory.
pub const CONFIG_ENV: &str = "APIPROBE_CONFIG";
pub const PROFILE_ENV: &str = "APIPROBE_PROFILE";

/// Resolves settings from `APIPROBE_CONFIG` and `APIPROBE_PROFILE`.
pub fn settings_from_environment() -> Result<ProbeSettings> {
    let target = match std::env::var_os(CONFIG_ENV) {
        Some(path) => PathBuf::from(path),
        None => std::env::current_dir()?,
    };
    let loaded = load_config(&target).context("loading configuration")?;
    let profile = std::env::var(PROFILE_ENV).ok().filter(|p| !p.is_empty());
    resolve_settings(loaded.as_ref(), profile.as_deref())
}
