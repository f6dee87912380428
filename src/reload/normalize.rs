//! Semantic normalization of compiled output.
//!
//! Strips tokens that change between recompilations without changing
//! behavior, so that textual equality approximates semantic equality.
//! Everything here is textual/regex based by contract: the goal is cheap
//! approximate comparison, not a proof of semantic equivalence. The safe
//! failure direction is an unnecessary reload (under-stripping); treating
//! a real change as irrelevant would not be, so patterns are kept narrow.

use std::sync::LazyLock;

use regex::Regex;

use crate::hot::BOOTSTRAP_IMPORT;

/// Dev-mode no-op class attribute assignment, e.g.
/// `attr_dev(node, "class", "");` - emitted or dropped depending on
/// whether the element ends up with a scope class, which the scope token
/// stripping already ignores.
static ATTR_DEV_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\s*attr_dev\([^,]+,\s*"class",\s*""\);?\s*"#).unwrap()
});

/// Dev-mode source-location annotation, e.g. `add_location(n1, 10, 2);` -
/// its arguments shift with any edit above the node, carrying no
/// behavioral meaning.
static ADD_LOCATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\badd_location\s*\([^)]*\)\s*;?").unwrap());

/// Normalize compiled JS for comparison across generations.
///
/// Removes, in order:
/// 1. the injected hot bootstrap footer (always appended, never
///    interleaved - truncate at its first occurrence),
/// 2. every occurrence of the per-build CSS scope token (changes on each
///    recompilation by construction),
/// 3. dev-mode no-op class attribute calls,
/// 4. dev-mode location annotations.
///
/// The scope token is matched as one contiguous word; a compiler that
/// split it across concatenated literals would under-strip, degrading to
/// an unnecessary reload.
pub fn normalize_js(code: &str, css_token: Option<&str>) -> String {
    let code = match code.find(BOOTSTRAP_IMPORT) {
        Some(pos) => &code[..pos],
        None => code,
    };

    let code = match css_token {
        Some(token) if !token.is_empty() => match token_pattern(token) {
            // An unbuildable pattern leaves the token in place, which at
            // worst costs one unnecessary reload.
            Some(re) => re.replace_all(code, "").into_owned(),
            None => code.to_string(),
        },
        _ => code.to_string(),
    };

    let code = ATTR_DEV_RE.replace_all(&code, "");
    ADD_LOCATION_RE.replace_all(&code, "").into_owned()
}

/// Normalize CSS for comparison.
///
/// The identity function: stylesheet output carries no dev-mode
/// instrumentation, so every textual change is meaningful.
pub fn normalize_css(code: &str) -> &str {
    code
}

fn token_pattern(token: &str) -> Option<Regex> {
    Regex::new(&format!(r"\s*\b{}\b\s*", regex::escape(token))).ok()
}

// =============================================================================
// Tests
// =============================================================================
