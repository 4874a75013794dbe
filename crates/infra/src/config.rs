//! Configuration loading and representation.

/// Runtime configuration for an [`AccountService`](crate::service::AccountService)
/// deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Whether `get_account` reads through an account cache.
    pub cache_enabled: bool,
    /// Default log filter, used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            log_filter: "info".to_string(),
        }
    }
}

impl ServiceConfig {
    pub const CACHE_VAR: &'static str = "ACCTLOG_CACHE";
    pub const LOG_VAR: &'static str = "ACCTLOG_LOG";

    /// Load from process environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup (environment, test fixtures, ...).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(Self::CACHE_VAR) {
            match parse_bool(&raw) {
                Some(enabled) => config.cache_enabled = enabled,
                None => tracing::warn!(
                    var = Self::CACHE_VAR,
                    value = %raw,
                    "invalid boolean; keeping default"
                ),
            }
        }

        if let Some(filter) = lookup(Self::LOG_VAR) {
            let filter = filter.trim();
            if !filter.is_empty() {
                config.log_filter = filter.to_string();
            }
        }

        config
    }

    pub fn with_cache_enabled(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        assert_eq!(ServiceConfig::from_lookup(lookup(&[])), ServiceConfig::default());
    }

    #[test]
    fn reads_cache_flag_and_log_filter() {
        let config = ServiceConfig::from_lookup(lookup(&[
            ("ACCTLOG_CACHE", "off"),
            ("ACCTLOG_LOG", "acctlog_infra=debug"),
        ]));
        assert!(!config.cache_enabled);
        assert_eq!(config.log_filter, "acctlog_infra=debug");
    }

    #[test]
    fn invalid_boolean_keeps_default() {
        let config = ServiceConfig::from_lookup(lookup(&[("ACCTLOG_CACHE", "maybe")]));
        assert!(config.cache_enabled);
    }
}
