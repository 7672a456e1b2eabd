//! Environment handling for config values.
//!
//! Two passes: `${VAR_NAME}` references inside string values of the config
//! file are substituted at load time (`$${VAR}` escapes to a literal
//! `${VAR}`), then well-known deployment variables overlay the parsed config.

use anyhow::{bail, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::schema::{LogFailurePolicy, StashConfig, StorageBackend};

/// `${NAME}` or the escaped form `$${NAME}`; only uppercase names match.
static ENV_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$?\$\{([A-Z_][A-Z0-9_]*)\}").expect("static regex"));

#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Substitute `${VAR}` references using the given map.
pub fn resolve_env_vars_with(value: &Value, env: &HashMap<String, String>) -> Result<Value> {
    substitute_value(value, env, "")
}

fn substitute_value(value: &Value, env: &HashMap<String, String>, path: &str) -> Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(substitute_string(s, env, path)?)),
        Value::Array(arr) => arr
            .iter()
            .enumerate()
            .map(|(i, v)| substitute_value(v, env, &format!("{path}[{i}]")))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        Value::Object(map) => {
            let mut out = serde_json::Map::new();
            for (k, v) in map {
                let child = if path.is_empty() { k.clone() } else { format!("{path}.{k}") };
                out.insert(k.clone(), substitute_value(v, env, &child)?);
            }
            Ok(Value::Object(out))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_string(s: &str, env: &HashMap<String, String>, path: &str) -> Result<String> {
    if !s.contains('$') {
        return Ok(s.to_string());
    }

    let mut missing: Option<String> = None;
    let out = ENV_REF.replace_all(s, |caps: &Captures| {
        let name = &caps[1];
        if caps[0].starts_with("$$") {
            return format!("${{{name}}}");
        }
        match env.get(name) {
            Some(val) if !val.is_empty() => val.clone(),
            _ => {
                missing.get_or_insert_with(|| name.to_string());
                String::new()
            }
        }
    });

    if let Some(var_name) = missing {
        bail!(MissingEnvVarError { var_name, config_path: path.to_string() });
    }
    Ok(out.into_owned())
}

/// Overlay deployment environment variables onto a parsed config.
///
/// The LINE and bucket variables keep the names the bot has always been
/// deployed with; everything else is namespaced `LINESTASH_*`.
pub fn apply_env_overlay(mut config: StashConfig, env: &HashMap<String, String>) -> StashConfig {
    let get = |key: &str| env.get(key).filter(|v| !v.is_empty()).cloned();

    if let Some(v) = get("CHANNEL_ACCESS_TOKEN") {
        config.line.channel_access_token = Some(v);
    }
    if let Some(v) = get("CHANNEL_SECRET") {
        config.line.channel_secret = Some(v);
    }
    if let Some(v) = get("LINESTASH_LINE_API_BASE_URL") {
        config.line.api_base_url = v;
    }
    if let Some(v) = get("LINESTASH_LINE_DATA_API_BASE_URL") {
        config.line.data_api_base_url = v;
    }

    if let Some(v) = get("AWS_CLIENT_REGION_NAME") {
        config.storage.region = Some(v);
    }
    if let Some(v) = get("AWS_CLIENT_BUCKET_NAME") {
        config.storage.bucket = Some(v);
    }
    match get("LINESTASH_STORAGE_BACKEND").as_deref() {
        Some("s3") => config.storage.backend = StorageBackend::S3,
        Some("local") => config.storage.backend = StorageBackend::Local,
        Some(other) => tracing::warn!(value = other, "Ignoring unknown LINESTASH_STORAGE_BACKEND"),
        None => {}
    }
    if let Some(v) = get("LINESTASH_S3_ENDPOINT") {
        config.storage.endpoint_url = Some(v);
    }
    if let Some(v) = get("LINESTASH_LOCAL_DIR") {
        config.storage.local_dir = Some(PathBuf::from(v));
    }
    if let Some(v) = env.get("LINESTASH_LOG_PREFIX") {
        config.storage.log_prefix = v.clone();
    }
    if let Some(v) = get("LINESTASH_SCRATCH_DIR") {
        config.storage.scratch_dir = Some(PathBuf::from(v));
    }

    if let Some(v) = get("LINESTASH_BIND") {
        config.server.bind = v;
    }
    if let Some(port) = get("LINESTASH_PORT").and_then(|p| p.parse().ok()) {
        config.server.port = port;
    }
    if let Some(v) = get("LINESTASH_WEBHOOK_PATH") {
        config.server.webhook_path = v;
    }

    if let Some(v) = get("LINESTASH_LOG_LEVEL") {
        config.logging.level = v;
    }
    if let Some(v) = get("LINESTASH_LOG_JSON") {
        config.logging.json = matches!(v.as_str(), "1" | "true" | "yes");
    }
    if let Some(v) = get("LINESTASH_LOG_DIR") {
        config.logging.dir = Some(PathBuf::from(v));
    }

    match get("LINESTASH_LOG_FAILURE").as_deref() {
        Some("abort") => config.dispatch.log_failure = LogFailurePolicy::Abort,
        Some("continue") => config.dispatch.log_failure = LogFailurePolicy::Continue,
        Some(other) => tracing::warn!(value = other, "Ignoring unknown LINESTASH_LOG_FAILURE"),
        None => {}
    }

    config
}
