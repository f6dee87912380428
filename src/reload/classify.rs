//! Change classification for recompiled output.
//!
//! Pure functions deciding which of {JS, CSS, neither} changed
//! meaningfully between two generations of compiled output. No fuzzy
//! matching: any residual difference after normalization is a behavior
//! change.

use super::normalize::{normalize_css, normalize_js};

/// Which compiled forms changed meaningfully.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub js: bool,
    pub css: bool,
}

impl ChangeSet {
    pub fn is_empty(self) -> bool {
        !self.js && !self.css
    }
}

/// Did the JS output change meaningfully?
///
/// Absent-vs-absent is unchanged; a presence flip is always a change;
/// present-vs-present compares normalized text for exact equality.
pub fn js_changed(css_token: Option<&str>, old: Option<&str>, new: Option<&str>) -> bool {
    match (old, new) {
        (None, None) => false,
        (Some(old), Some(new)) => {
            normalize_js(old, css_token) != normalize_js(new, css_token)
        }
        _ => true,
    }
}

/// Did the CSS output change meaningfully?
///
/// Same presence policy as [`js_changed`]; present-vs-present compares
/// raw text, since stylesheet output carries no instrumentation to strip.
pub fn css_changed(old: Option<&str>, new: Option<&str>) -> bool {
    match (old, new) {
        (None, None) => false,
        (Some(old), Some(new)) => normalize_css(old) != normalize_css(new),
        _ => true,
    }
}

/// Classify both compiled forms at once.
pub fn classify(
    css_token: Option<&str>,
    old_js: Option<&str>,
    new_js: Option<&str>,
    old_css: Option<&str>,
    new_css: Option<&str>,
) -> ChangeSet {
    ChangeSet {
        js: js_changed(css_token, old_js, new_js),
        css: css_changed(old_css, new_css),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hot::BOOTSTRAP_IMPORT;

    const TOKEN: &str = "cdr-6fa3b2c91d04";

    mod presence {
        use super::*;

        #[test]
        fn absent_absent_is_unchanged() {
            assert!(!js_changed(None, None, None));
            assert!(!css_changed(None, None));
        }

        #[test]
        fn presence_flip_is_a_change() {
            assert!(js_changed(None, None, Some("x")));
            assert!(js_changed(None, Some("x"), None));
            assert!(css_changed(None, Some(".a{}")));
            assert!(css_changed(Some(".a{}"), None));
        }
    }

    mod js {
        use super::*;

        #[test]
        fn identical_output_is_unchanged() {
            assert!(!js_changed(None, Some("export default 1;"), Some("export default 1;")));
        }

        #[test]
        fn scope_token_only_diff_is_unchanged() {
            // A style edit can add or drop the scope class on an element;
            // the generations then differ only in token occurrences.
            let old = format!("attr(div, \"class\", \"wrapper {TOKEN}\");");
            let new = "attr(div, \"class\", \"wrapper\");".to_string();
            assert!(!js_changed(Some(TOKEN), Some(&old), Some(&new)));
            // Without the captured token the same pair is a real change.
            assert!(js_changed(None, Some(&old), Some(&new)));
        }

        #[test]
        fn location_only_diff_is_unchanged() {
            let old = "p(\"a\");\nadd_location(n1, 10, 2);";
            let new = "p(\"a\");\nadd_location(n1, 12, 4);";
            assert!(!js_changed(None, Some(old), Some(new)));
        }

        #[test]
        fn bootstrap_suffix_diff_is_unchanged() {
            let old = format!("p(\"a\");\n{BOOTSTRAP_IMPORT} \"cinder/runtime\"; /* v1 */");
            let new = format!("p(\"a\");\n{BOOTSTRAP_IMPORT} \"cinder/runtime\"; /* v2 */");
            assert!(!js_changed(None, Some(&old), Some(&new)));
        }

        #[test]
        fn any_other_diff_is_a_change() {
            assert!(js_changed(None, Some("p(\"a\");"), Some("p(\"b\");")));
        }
    }

    mod css {
        use super::*;

        #[test]
        fn equality_is_exact() {
            assert!(!css_changed(Some(".a{color:red}"), Some(".a{color:red}")));
            assert!(css_changed(Some(".a{color:red}"), Some(".a{color:blue}")));
        }

        #[test]
        fn whitespace_matters() {
            // No normalization on the CSS side.
            assert!(css_changed(Some(".a{color:red}"), Some(".a{ color:red }")));
        }
    }

    #[test]
    fn classify_combines_both_forms() {
        let changes = classify(
            None,
            Some("p(\"a\");"),
            Some("p(\"a\");"),
            Some(".a{color:red}"),
            Some(".a{color:blue}"),
        );
        assert_eq!(changes, ChangeSet { js: false, css: true });
        assert!(!changes.is_empty());

        let unchanged = classify(None, None, None, None, None);
        assert!(unchanged.is_empty());
    }
}
