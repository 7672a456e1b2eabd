//! Config file discovery and loading.

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

const CONFIG_FILE_NAME: &str = "config.yaml";

/// Resolve the config file to load, if any.
///
/// Priority: explicit path > `LINESTASH_CONFIG` > `<config dir>/linestash/config.yaml`
/// when that file exists.
pub fn config_file_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Ok(path) = std::env::var("LINESTASH_CONFIG") {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }
    let default = dirs::config_dir()?.join("linestash").join(CONFIG_FILE_NAME);
    default.exists().then_some(default)
}

/// Read a YAML config file into a JSON value tree, ready for substitution.
///
/// An empty file yields an empty object.
pub async fn load_config_value(path: &Path) -> Result<Value> {
    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    if raw.trim().is_empty() {
        debug!(path = %path.display(), "Config file is empty; using defaults");
        return Ok(Value::Object(Default::default()));
    }

    let value: Value = serde_yaml::from_str(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    Ok(value)
}
