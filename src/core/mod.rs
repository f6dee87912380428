//! Core types - pure abstractions shared across the crate.

mod filter;
mod key;
mod url;

pub use filter::ModuleFilter;
pub use key::{CSS_SUFFIX, CssAssetKey, ModuleKey};
pub use url::{ServeContext, split_query, trim_query};

/// Which compiled form of a module a consumer imports.
///
/// A transformed module has two faces in the host's graph: the JS module
/// itself and the virtual stylesheet sibling it imports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Js,
    Css,
}

/// Opaque reference to a module in the host's graph.
///
/// The engine never inspects these beyond identity; they are handed back to
/// the host's invalidate operation unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleRef(String);

impl ModuleRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ModuleRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
