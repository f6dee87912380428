//! Module identity types.
//!
//! A [`ModuleKey`] is the canonical handle for a source module's compiled
//! output across recompilations. A [`CssAssetKey`] names the virtual
//! stylesheet sibling of a module: a file with no on-disk backing,
//! materialized only through the artifact cache.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::url::trim_query;

/// Suffix appended to a module key to name its generated stylesheet sibling.
pub const CSS_SUFFIX: &str = ".css";

// =============================================================================
// ModuleKey
// =============================================================================

/// Canonical identity for a source module.
///
/// # Invariants
/// - Two requests for the same underlying file normalize to the same key
///   within one session.
/// - Construction is idempotent: building a key from an already-canonical
///   id returns it unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleKey(String);

impl ModuleKey {
    /// Build a key from a raw module id.
    ///
    /// Query-string suffixes are stripped: they distinguish fetch variants
    /// of the same module, not different modules.
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(trim_query(id.as_ref()).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The virtual stylesheet sibling of this module.
    pub fn css_sibling(&self) -> CssAssetKey {
        CssAssetKey(format!("{}{CSS_SUFFIX}", self.0))
    }
}

impl fmt::Display for ModuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// CssAssetKey
// =============================================================================

/// Identity of a virtual stylesheet asset.
///
/// Derived deterministically from its owning [`ModuleKey`]; only ever
/// present in the cache if that module was transformed at least once.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CssAssetKey(String);

impl CssAssetKey {
    /// Build a lookup key from a raw id (e.g. a host load request).
    ///
    /// The raw id may carry a query suffix; it is stripped the same way
    /// module keys strip theirs so lookups round-trip.
    pub fn from_raw(id: impl AsRef<str>) -> Self {
        Self(trim_query(id.as_ref()).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CssAssetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Tests
// =============================================================================
