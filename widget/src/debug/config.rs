//! Debug configuration from environment variables

use std::path::PathBuf;

/// Default filter when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "donation_widget=info,lib_solana=info,warn";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugConfig {
    /// Log level filter (e.g., "donation_widget=debug,info")
    pub log_level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
    /// Directory for a daily-rotated log file, if file logging is enabled
    pub log_dir: Option<PathBuf>,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_FILTER.to_string(),
            json: false,
            log_dir: None,
        }
    }
}

impl DebugConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            log_level: lookup("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            json: lookup("WIDGET_LOG_JSON").map(|v| v == "1").unwrap_or(false),
            log_dir: lookup("WIDGET_LOG_DIR")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> DebugConfig {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        DebugConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        assert_eq!(config(&[]), DebugConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("RUST_LOG", "debug"),
            ("WIDGET_LOG_JSON", "1"),
            ("WIDGET_LOG_DIR", "logs"),
        ]);
        assert_eq!(config.log_level, "debug");
        assert!(config.json);
        assert_eq!(config.log_dir, Some(PathBuf::from("logs")));
    }

    #[test]
    fn test_empty_log_dir_disables_file_logging() {
        assert_eq!(config(&[("WIDGET_LOG_DIR", "")]).log_dir, None);
    }
}
