//! Include/exclude filtering for transformable modules.

use regex::Regex;

use crate::config::ConfigError;

/// Decides which module ids this engine is responsible for.
///
/// Compiled once at construction from the configured patterns; the hot
/// paths only run pre-built regexes.
///
/// Matching policy: exclude wins over include; an absent include pattern
/// admits everything. Extension matching is a separate question answered by
/// [`matches_extension`](Self::matches_extension) - the update driver cares
/// about the include/exclude patterns only, while the transform pipeline
/// additionally requires a recognized extension.
#[derive(Debug)]
pub struct ModuleFilter {
    include: Option<Regex>,
    exclude: Option<Regex>,
    extensions: Vec<String>,
}

impl ModuleFilter {
    pub fn new(
        include: Option<&str>,
        exclude: Option<&str>,
        extensions: Vec<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            include: compile("include", include)?,
            exclude: compile("exclude", exclude)?,
            extensions,
        })
    }

    /// Does the include/exclude configuration admit this id?
    pub fn matches(&self, id: &str) -> bool {
        if let Some(exclude) = &self.exclude
            && exclude.is_match(id)
        {
            return false;
        }
        match &self.include {
            Some(include) => include.is_match(id),
            None => true,
        }
    }

    /// Does the id (query already stripped) end in a recognized extension?
    pub fn matches_extension(&self, id: &str) -> bool {
        self.extensions.iter().any(|ext| id.ends_with(ext.as_str()))
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }
}

fn compile(field: &'static str, pattern: Option<&str>) -> Result<Option<Regex>, ConfigError> {
    let Some(pattern) = pattern else {
        return Ok(None);
    };
    Regex::new(pattern)
        .map(Some)
        .map_err(|source| ConfigError::Pattern { field, source })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(include: Option<&str>, exclude: Option<&str>) -> ModuleFilter {
        ModuleFilter::new(include, exclude, vec![".comp".to_string()]).unwrap()
    }

    #[test]
    fn no_patterns_admits_everything() {
        assert!(filter(None, None).matches("/any/path.comp"));
    }

    #[test]
    fn exclude_wins_over_include() {
        let f = filter(Some(r"src/"), Some(r"src/vendor/"));
        assert!(f.matches("/app/src/Foo.comp"));
        assert!(!f.matches("/app/src/vendor/Foo.comp"));
    }

    #[test]
    fn include_restricts() {
        let f = filter(Some(r"src/"), None);
        assert!(!f.matches("/app/lib/Foo.comp"));
    }

    #[test]
    fn extension_check_is_independent() {
        let f = filter(None, None);
        assert!(f.matches_extension("/app/src/Foo.comp"));
        assert!(!f.matches_extension("/app/src/foo.js"));
        // include/exclude does not consider extensions
        assert!(f.matches("/app/src/foo.js"));
    }

    #[test]
    fn invalid_pattern_is_a_config_error() {
        let err = ModuleFilter::new(Some("("), None, vec![]).unwrap_err();
        assert!(matches!(err, ConfigError::Pattern { field: "include", .. }));
    }
}
