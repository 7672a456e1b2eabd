//! `sign` and `check-config`.

use std::path::Path;

use anyhow::{Context, Result, bail};

use linestash_config::{StashConfig, ValidationReport};

use crate::read_input;

pub async fn sign(config: &StashConfig, body_path: &Path) -> Result<()> {
    let secret = config
        .line
        .channel_secret
        .as_deref()
        .filter(|s| !s.is_empty())
        .context("line.channelSecret is not set")?;
    let body = read_input(body_path).await?;
    println!("{}", linestash_channels::sign(secret, body.as_bytes())?);
    Ok(())
}

pub fn check(config: &StashConfig, source: Option<&Path>) -> Result<()> {
    match source {
        Some(path) => println!("# config: {}", path.display()),
        None => println!("# config: defaults and environment only"),
    }
    let value = serde_json::to_value(config)?;
    print!("{}", serde_yaml::to_string(&linestash_config::redact(&value))?);

    let report = linestash_config::validate(config);
    print!("{}", render_report(&report));
    if !report.is_valid() {
        bail!("configuration is invalid ({} errors)", report.errors.len());
    }
    Ok(())
}

fn render_report(report: &ValidationReport) -> String {
    let mut out = String::new();
    for warning in &report.warnings {
        out.push_str(&format!("warning: {}: {}\n", warning.path, warning.message));
    }
    for error in &report.errors {
        out.push_str(&format!("error: {}: {}\n", error.path, error.message));
    }
    if report.is_valid() {
        out.push_str("ok\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use linestash_config::ConfigValidationError;

    fn entry(path: &str, message: &str) -> ConfigValidationError {
        ConfigValidationError { path: path.to_string(), message: message.to_string() }
    }

    #[test]
    fn clean_report_says_ok() {
        let report = ValidationReport::default();
        assert_eq!(render_report(&report), "ok\n");
    }

    #[test]
    fn errors_suppress_ok_line() {
        let report = ValidationReport {
            errors: vec![entry("line.channelSecret", "is required")],
            warnings: vec![entry("storage.logPrefix", "should end with '/'")],
        };
        let rendered = render_report(&report);
        assert!(rendered.contains("warning: storage.logPrefix: should end with '/'"));
        assert!(rendered.contains("error: line.channelSecret: is required"));
        assert!(!rendered.ends_with("ok\n"));
    }

    #[tokio::test]
    async fn sign_requires_a_secret() {
        let dir = tempfile::tempdir().unwrap();
        let body = dir.path().join("body.json");
        std::fs::write(&body, "{}").unwrap();
        let err = sign(&StashConfig::default(), &body).await.unwrap_err();
        assert!(err.to_string().contains("channelSecret"));
    }
}
