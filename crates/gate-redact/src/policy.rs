//! Redaction policy configuration

/// Default deny-list of sensitive key-name fragments.
///
/// A key is flagged when its lowercased form contains any fragment.
pub const DEFAULT_DENY_FRAGMENTS: &[&str] = &[
    "api_key",
    "apikey",
    "token",
    "password",
    "secret",
    "authorization",
    "cookie",
];

/// Policy controlling what gets redacted
///
/// The deny-list is authoritative; the entropy heuristic is a best-effort
/// secondary signal for secret-shaped string values under innocuous keys.
#[derive(Debug, Clone)]
pub struct RedactionPolicy {
    /// Key-name fragments matched case-insensitively
    pub deny_fragments: Vec<String>,
    /// Minimum Shannon entropy (bits per character) for the secret heuristic
    pub entropy_threshold: f64,
    /// Strings at or below this length are never entropy-flagged
    pub min_length: usize,
}

impl Default for RedactionPolicy {
    fn default() -> Self {
        Self {
            deny_fragments: DEFAULT_DENY_FRAGMENTS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            entropy_threshold: 3.5,
            min_length: 12,
        }
    }
}

impl RedactionPolicy {
    /// Create a policy with a custom deny-list, keeping default heuristics
    pub fn new(deny_fragments: Vec<String>) -> Self {
        Self {
            deny_fragments,
            ..Self::default()
        }
    }

    /// Add a deny-list fragment
    pub fn with_fragment<S: Into<String>>(mut self, fragment: S) -> Self {
        self.deny_fragments.push(fragment.into());
        self
    }

    /// Set the entropy threshold (bits per character)
    pub fn with_entropy_threshold(mut self, threshold: f64) -> Self {
        self.entropy_threshold = threshold;
        self
    }

    /// Check whether a key name matches the deny-list
    pub fn is_sensitive_key(&self, key: &str) -> bool {
        let key = key.to_lowercase();
        self.deny_fragments
            .iter()
            .any(|fragment| key.contains(fragment.as_str()))
    }
}
