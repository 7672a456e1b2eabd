//! `linestash-config`: runtime configuration for the linestash bot.
//!
//! Provides:
//! - Typed config schema (LINE channel, storage, server, logging, replies)
//! - YAML loading with `${ENV_VAR}` substitution
//! - Environment overlay using the deployment's variable names
//! - Deep validation and redaction for safe display

pub mod defaults;
pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod validation;

pub use env::{apply_env_overlay, resolve_env_vars_with, MissingEnvVarError};
pub use io::{config_file_path, load_config_value};
pub use redact::redact;
pub use schema::{
    DispatchConfig, LineConfig, LogFailurePolicy, LoggingConfig, RepliesConfig, ServerConfig,
    StashConfig, StickerReply, StorageBackend, StorageConfig,
};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::path::Path;

/// Log validation warnings and fail on any validation error.
pub fn ensure_valid(config: StashConfig) -> Result<StashConfig> {
    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    if !report.is_valid() {
        for error in &report.errors {
            tracing::error!(path = %error.path, message = %error.message, "Config error");
        }
        bail!("configuration is invalid ({} errors)", report.errors.len());
    }
    Ok(config)
}

/// Build the config against an explicit environment map, without validating.
pub async fn prepare_with(
    path: Option<&Path>,
    env: &HashMap<String, String>,
) -> Result<StashConfig> {
    let raw = match path {
        Some(path) => load_config_value(path).await?,
        None => serde_json::Value::Object(Default::default()),
    };
    let value = resolve_env_vars_with(&raw, env).context("Failed to resolve env vars in config")?;
    let config: StashConfig =
        serde_json::from_value(value).context("Failed to deserialize config")?;
    Ok(apply_env_overlay(config, env))
}
