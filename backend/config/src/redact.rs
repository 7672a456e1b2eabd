//! Config redaction: safe-to-print snapshots with secrets masked.

use serde_json::Value;

const SENSITIVE_KEYS: &[&str] = &[
    "channelSecret",
    "channelAccessToken",
    "accessKeyId",
    "secretAccessKey",
    "sessionToken",
];

/// Redact a serialized config, keeping a four-character hint of each secret.
pub fn redact(value: &Value) -> Value {
    redact_recursive(value, "")
}

fn is_sensitive_key(key: &str) -> bool {
    SENSITIVE_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

fn redact_recursive(value: &Value, key: &str) -> Value {
    match value {
        Value::String(s) if is_sensitive_key(key) && !s.is_empty() => {
            let hint: String = s.chars().take(4).collect();
            if s.chars().count() > 8 {
                Value::String(format!("{hint}***"))
            } else {
                Value::String("***".to_string())
            }
        }
        Value::Array(arr) => Value::Array(arr.iter().map(|v| redact_recursive(v, key)).collect()),
        Value::Object(map) => Value::Object(
            map.iter().map(|(k, v)| (k.clone(), redact_recursive(v, k))).collect(),
        ),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn masks_line_credentials() {
        let v = json!({"line": {"channelSecret": "0123456789abcdef", "channelAccessToken": "short"}});
        let out = redact(&v);
        assert_eq!(out["line"]["channelSecret"], "0123***");
        assert_eq!(out["line"]["channelAccessToken"], "***");
    }

    #[test]
    fn leaves_plain_fields() {
        let v = json!({"storage": {"bucket": "stash", "secretAccessKey": "wJalrXUtnFEMI/K7MDENG"}});
        let out = redact(&v);
        assert_eq!(out["storage"]["bucket"], "stash");
        assert!(!out["storage"]["secretAccessKey"].as_str().unwrap().contains("K7MDENG"));
    }
}
