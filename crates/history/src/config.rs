/// Feature switches for post history, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct HistoryConfig {
    /// When off, edits record no revisions and `exists` always reports false.
    pub enable_post_history: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enable_post_history: true,
        }
    }
}

impl HistoryConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var               | Default |
    /// |-----------------------|---------|
    /// | `ENABLE_POST_HISTORY` | `true`  |
    pub fn from_env() -> Self {
        let enable_post_history = match std::env::var("ENABLE_POST_HISTORY") {
            Ok(raw) => parse_flag(&raw).unwrap_or_else(|| {
                tracing::warn!(value = %raw, "Unrecognised ENABLE_POST_HISTORY, keeping history on");
                true
            }),
            Err(_) => true,
        };

        Self {
            enable_post_history,
        }
    }
}

/// Parse a boolean switch the way operators tend to write them.
fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_flag_accepts_common_spellings() {
        assert_eq!(parse_flag("true"), Some(true));
        assert_eq!(parse_flag(" ON "), Some(true));
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag("false"), Some(false));
        assert_eq!(parse_flag("Off"), Some(false));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn history_is_on_by_default() {
        assert!(HistoryConfig::default().enable_post_history);
    }
}
