//! The redaction engine
//!
//! Walks a JSON argument object recursively, replacing sensitive values
//! with [`REDACTED_SENTINEL`] while preserving the key set and structure.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

use crate::policy::RedactionPolicy;

/// Sentinel that replaces redacted values
pub const REDACTED_SENTINEL: &str = "[REDACTED]";

/// Result of redacting an argument object
#[derive(Debug, Clone, PartialEq)]
pub struct Redacted {
    /// Copy of the input with sensitive values replaced
    pub args: Map<String, Value>,
    /// Dotted paths of every altered key, in encounter order, deduplicated
    pub redacted_keys: Vec<String>,
}

/// Redact an argument object with the default policy
pub fn redact(args: &Map<String, Value>) -> Redacted {
    redact_with(args, &RedactionPolicy::default())
}

/// Redact an argument object with a custom policy
pub fn redact_with(args: &Map<String, Value>, policy: &RedactionPolicy) -> Redacted {
    let mut redacted_keys = Vec::new();
    let args = redact_object(args, policy, "", false, &mut redacted_keys);
    Redacted {
        args,
        redacted_keys,
    }
}

fn redact_object(
    object: &Map<String, Value>,
    policy: &RedactionPolicy,
    prefix: &str,
    sensitive: bool,
    redacted_keys: &mut Vec<String>,
) -> Map<String, Value> {
    let mut out = Map::with_capacity(object.len());
    for (key, value) in object {
        let path = join_path(prefix, key);
        let sensitive_key = sensitive || policy.is_sensitive_key(key);
        out.insert(
            key.clone(),
            redact_value(value, policy, sensitive_key, &path, redacted_keys),
        );
    }
    out
}

fn redact_value(
    value: &Value,
    policy: &RedactionPolicy,
    sensitive_key: bool,
    path: &str,
    redacted_keys: &mut Vec<String>,
) -> Value {
    match value {
        // Containers keep their shape; every leaf under a deny-listed
        // ancestor inherits its sensitivity
        Value::Object(object) => {
            Value::Object(redact_object(object, policy, path, sensitive_key, redacted_keys))
        }
        Value::Array(items) => Value::Array(
            items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    let item_path = join_path(path, &index.to_string());
                    redact_value(item, policy, sensitive_key, &item_path, redacted_keys)
                })
                .collect(),
        ),
        Value::String(s) => {
            if sensitive_key || looks_machine_generated(s, policy) {
                record(redacted_keys, path);
                Value::String(REDACTED_SENTINEL.to_string())
            } else {
                value.clone()
            }
        }
        // Non-string scalars under a sensitive key are still secrets
        Value::Number(_) | Value::Bool(_) if sensitive_key => {
            record(redacted_keys, path);
            Value::String(REDACTED_SENTINEL.to_string())
        }
        _ => value.clone(),
    }
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

fn record(redacted_keys: &mut Vec<String>, path: &str) {
    if !redacted_keys.iter().any(|k| k == path) {
        redacted_keys.push(path.to_string());
    }
}

/// Heuristic for secret-shaped strings under innocuous keys.
///
/// A string is flagged when it is longer than the policy minimum, contains
/// no whitespace, carries a 12+ character alphanumeric run mixing letters
/// and digits, and its Shannon entropy meets the policy threshold. The
/// sentinel itself never qualifies, which keeps redaction idempotent.
fn looks_machine_generated(s: &str, policy: &RedactionPolicy) -> bool {
    if s.chars().count() <= policy.min_length {
        return false;
    }
    if s.contains(char::is_whitespace) {
        return false;
    }
    if !alnum_run().is_match(s) {
        return false;
    }
    if !(s.chars().any(|c| c.is_ascii_alphabetic()) && s.chars().any(|c| c.is_ascii_digit())) {
        return false;
    }
    shannon_entropy(s) >= policy.entropy_threshold
}

fn alnum_run() -> &'static Regex {
    static RUN: OnceLock<Regex> = OnceLock::new();
    RUN.get_or_init(|| Regex::new(r"[A-Za-z0-9]{12,}").expect("literal pattern is valid"))
}

/// Shannon entropy in bits per character
fn shannon_entropy(s: &str) -> f64 {
    let mut counts = std::collections::HashMap::new();
    let mut total = 0usize;
    for c in s.chars() {
        *counts.entry(c).or_insert(0usize) += 1;
        total += 1;
    }
    if total == 0 {
        return 0.0;
    }
    counts
        .values()
        .map(|&count| {
            let p = count as f64 / total as f64;
            -p * p.log2()
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().expect("test value is an object").clone()
    }

    #[test]
    fn test_deny_listed_key_redacted() {
        let args = object(json!({"to": "a@b.com", "api_key": "sk-abc123xyz"}));
        let result = redact(&args);

        assert_eq!(result.args["to"], "a@b.com");
        assert_eq!(result.args["api_key"], REDACTED_SENTINEL);
        assert_eq!(result.redacted_keys, vec!["api_key"]);
    }

    #[test]
    fn test_empty_input() {
        let result = redact(&Map::new());
        assert!(result.args.is_empty());
        assert!(result.redacted_keys.is_empty());
    }

    #[test]
    fn test_structure_preserved() {
        let args = object(json!({
            "subject": "hello",
            "options": {"password": "hunter2hunter2", "retries": 3},
            "recipients": ["a@b.com", "c@d.com"],
        }));
        let result = redact(&args);

        // Same key set and shape, only values changed
        assert_eq!(result.args.len(), args.len());
        assert!(result.args["options"].is_object());
        assert_eq!(result.args["recipients"], args["recipients"]);
        assert_eq!(result.args["options"]["retries"], 3);
        assert_eq!(result.args["options"]["password"], REDACTED_SENTINEL);
        assert_eq!(result.redacted_keys, vec!["options.password"]);
    }

    #[test]
    fn test_idempotent() {
        let args = object(json!({
            "api_key": "sk-abc123xyz",
            "body": "x9J2mQ7pLk4Rv8Tz1Wc5",
            "note": "just words",
        }));
        let once = redact(&args);
        let twice = redact(&once.args);
        assert_eq!(once.args, twice.args);
    }

    #[test]
    fn test_high_entropy_string_redacted() {
        let args = object(json!({"payload": "x9J2mQ7pLk4Rv8Tz1Wc5"}));
        let result = redact(&args);
        assert_eq!(result.args["payload"], REDACTED_SENTINEL);
        assert_eq!(result.redacted_keys, vec!["payload"]);
    }

    #[test]
    fn test_natural_language_passes_through() {
        let args = object(json!({
            "body": "please review the attached quarterly report",
            "name": "administration",
        }));
        let result = redact(&args);
        assert_eq!(result.args, args);
        assert!(result.redacted_keys.is_empty());
    }

    #[test]
    fn test_non_string_values_pass_through() {
        let args = object(json!({"amount": 250, "dry_run": true, "memo": null}));
        let result = redact(&args);
        assert_eq!(result.args, args);
        assert!(result.redacted_keys.is_empty());
    }

    #[test]
    fn test_numeric_secret_under_sensitive_key() {
        let args = object(json!({"pin_token": 123456}));
        let result = redact(&args);
        assert_eq!(result.args["pin_token"], REDACTED_SENTINEL);
    }

    #[test]
    fn test_containers_under_sensitive_key_inherit_sensitivity() {
        let args = object(json!({
            "password": {"value": "hunter2"},
            "tokens": ["abc", {"current": "def"}],
        }));
        let result = redact(&args);

        assert_eq!(result.args["password"]["value"], REDACTED_SENTINEL);
        assert_eq!(result.args["tokens"][0], REDACTED_SENTINEL);
        assert_eq!(result.args["tokens"][1]["current"], REDACTED_SENTINEL);
        assert_eq!(
            result.redacted_keys,
            vec!["password.value", "tokens.0", "tokens.1.current"]
        );
    }

    #[test]
    fn test_array_elements_use_index_paths() {
        let args = object(json!({"credentials": [{"token": "a"}, {"token": "b"}]}));
        let result = redact(&args);
        assert_eq!(
            result.redacted_keys,
            vec!["credentials.0.token", "credentials.1.token"]
        );
    }

    #[test]
    fn test_custom_policy_override() {
        let policy = RedactionPolicy::new(vec!["account".to_string()]);
        let args = object(json!({"account_number": "12345", "password": "short"}));
        let result = redact_with(&args, &policy);

        assert_eq!(result.args["account_number"], REDACTED_SENTINEL);
        // "password" is not in the custom deny-list
        assert_eq!(result.args["password"], "short");
    }

    #[test]
    fn test_sentinel_not_entropy_flagged() {
        let args = object(json!({"note": REDACTED_SENTINEL}));
        let result = redact(&args);
        assert_eq!(result.args["note"], REDACTED_SENTINEL);
        assert!(result.redacted_keys.is_empty());
    }

    #[test]
    fn test_entropy_calculation() {
        assert_eq!(shannon_entropy(""), 0.0);
        assert_eq!(shannon_entropy("aaaa"), 0.0);
        // Uniform distribution over 4 symbols is exactly 2 bits
        assert!((shannon_entropy("abcd") - 2.0).abs() < 1e-9);
    }
}
