use std::{fs, io::Cursor, path::Path};

use anyhow::{Context, Result};

use crate::env::EnvMap;

/// Merges the `KEY=value` pairs of a dotenv file into `env`.
pub fn load_env_file(path: &Path, env: &mut EnvMap) -> Result<()> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading env file {}", path.display()))?;

    for item in dotenvy::from_read_iter(Cursor::new(content)) {
        let (key, value) = item.with_context(|| format!("parsing env file {}", path.display()))?;
        env.insert(key, value);
    }
    Ok(())
}
