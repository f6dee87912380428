//! Query-string handling and served-URL rewriting.
//!
//! Inside the managed-server host mode, modules are addressed by URL: ids
//! under the project root are rewritten to the server's base path, and host
//! URLs are rewritten back to absolute file paths when the engine needs to
//! talk about files again. Outside that mode both rewrites are identity.

use serde::{Deserialize, Serialize};

// =============================================================================
// Query suffixes
// =============================================================================

/// Split a module id into its path part and query suffix.
///
/// The suffix keeps its leading `?` so the two halves concatenate back to
/// the original id (re-fetch requests must round-trip).
pub fn split_query(id: &str) -> (&str, &str) {
    match id.find('?') {
        Some(pos) => id.split_at(pos),
        None => (id, ""),
    }
}

/// Strip the query suffix from a module id.
pub fn trim_query(id: &str) -> &str {
    split_query(id).0
}

// =============================================================================
// ServeContext
// =============================================================================

/// Root/base pair of the managed virtual server.
///
/// `root` is the absolute project root directory; `base` is the public base
/// path modules are served under (commonly `/`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServeContext {
    pub root: String,
    pub base: String,
}

impl ServeContext {
    pub fn new(root: impl Into<String>, base: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base: base.into(),
        }
    }

    /// Rewrite a file id under the project root to its served URL.
    ///
    /// Ids outside the root (including already-rewritten URLs) pass through
    /// unchanged, which makes the rewrite idempotent.
    pub fn to_served_url(&self, id: &str) -> String {
        let Some(rest) = id.strip_prefix(&self.root).and_then(|r| r.strip_prefix('/')) else {
            return id.to_string();
        };
        format!("{}{rest}", self.base)
    }

    /// Rewrite a served URL back to an absolute file path (inverse of
    /// [`to_served_url`](Self::to_served_url)).
    pub fn to_file_path(&self, url: &str) -> String {
        let Some(rest) = url.strip_prefix(&self.base) else {
            return url.to_string();
        };
        format!("{}/{rest}", self.root)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> ServeContext {
        ServeContext::new("/home/me/app", "/")
    }

    mod query {
        use super::super::*;

        #[test]
        fn split_keeps_question_mark() {
            assert_eq!(split_query("/a/b.comp?import"), ("/a/b.comp", "?import"));
        }

        #[test]
        fn split_without_query() {
            assert_eq!(split_query("/a/b.comp"), ("/a/b.comp", ""));
        }

        #[test]
        fn split_round_trips() {
            let id = "/a/b.comp?import&t=1";
            let (path, query) = split_query(id);
            assert_eq!(format!("{path}{query}"), id);
        }

        #[test]
        fn trim_removes_everything_after_first_question_mark() {
            assert_eq!(trim_query("/a/b.comp?x=1?y=2"), "/a/b.comp");
        }
    }

    mod serve_context {
        use super::*;

        #[test]
        fn rewrites_under_root() {
            assert_eq!(ctx().to_served_url("/home/me/app/src/Foo.comp"), "/src/Foo.comp");
        }

        #[test]
        fn leaves_foreign_ids_alone() {
            assert_eq!(ctx().to_served_url("/elsewhere/Foo.comp"), "/elsewhere/Foo.comp");
        }

        #[test]
        fn url_rewrite_is_idempotent() {
            let url = ctx().to_served_url("/home/me/app/src/Foo.comp");
            assert_eq!(ctx().to_served_url(&url), url);
        }

        #[test]
        fn file_path_is_inverse() {
            let ctx = ctx();
            let url = ctx.to_served_url("/home/me/app/src/Foo.comp");
            assert_eq!(ctx.to_file_path(&url), "/home/me/app/src/Foo.comp");
        }

        #[test]
        fn non_base_urls_pass_through() {
            let ctx = ServeContext::new("/home/me/app", "/base/");
            assert_eq!(ctx.to_file_path("/other/x.js"), "/other/x.js");
        }

        #[test]
        fn custom_base_round_trips() {
            let ctx = ServeContext::new("/home/me/app", "/base/");
            let url = ctx.to_served_url("/home/me/app/src/Foo.comp");
            assert_eq!(url, "/base/src/Foo.comp");
            assert_eq!(ctx.to_file_path(&url), "/home/me/app/src/Foo.comp");
        }
    }
}
