//! Configuration error types.

use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse engine options")]
    Parse(#[from] serde_json::Error),

    #[error("invalid `{field}` pattern")]
    Pattern {
        field: &'static str,
        #[source]
        source: regex::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_error_names_field() {
        let source = regex::Regex::new("(").unwrap_err();
        let err = ConfigError::Pattern {
            field: "exclude",
            source,
        };
        assert!(format!("{err}").contains("exclude"));
    }
}
