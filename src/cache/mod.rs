//! In-memory artifact cache and virtual asset store.
//!
//! One mapping per asset kind, last-write-wins, no TTL:
//!
//! - `ModuleKey` → latest [`CompiledArtifact`] (JS + sourcemap + metadata)
//! - `CssAssetKey` → latest [`CssPayload`]
//!
//! The CSS side doubles as the backing store for the host's virtual
//! filesystem: `load` requests for generated stylesheets are answered from
//! here, which is the only way a virtual asset is ever materialized.
//!
//! # Lifecycle
//!
//! Entries are created on a module's first transform and replaced on each
//! subsequent transform. The update driver deletes a module's entry
//! immediately before recompiling so the transform step cannot observe a
//! stale cached value.

use std::path::PathBuf;

use rustc_hash::FxHashMap;

use crate::compiler::Warning;
use crate::core::{CssAssetKey, ModuleKey};

// =============================================================================
// Artifacts
// =============================================================================

/// Compiled output for one module, as produced by the transform pipeline.
///
/// Immutable once created; recompilation supersedes the entry rather than
/// mutating it.
#[derive(Debug, Clone)]
pub struct CompiledArtifact {
    pub js_code: String,
    pub js_map: Option<String>,
    /// CSS text that was emitted to the virtual sibling (empty when the
    /// module has no styles).
    pub css_code: String,
    pub warnings: Vec<Warning>,
    /// Preprocessor-reported files the host should watch.
    pub dependencies: Vec<PathBuf>,
}

/// Contents of a virtual stylesheet asset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CssPayload {
    pub code: String,
}

impl CssPayload {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

// =============================================================================
// Cache
// =============================================================================

/// Per-session cache of compiled artifacts and virtual CSS payloads.
#[derive(Debug, Default)]
pub struct ArtifactCache {
    modules: FxHashMap<ModuleKey, CompiledArtifact>,
    css: FxHashMap<CssAssetKey, CssPayload>,
}

impl ArtifactCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_module(&self, key: &ModuleKey) -> Option<&CompiledArtifact> {
        self.modules.get(key)
    }

    pub fn set_module(&mut self, key: ModuleKey, artifact: CompiledArtifact) {
        self.modules.insert(key, artifact);
    }

    /// Evict a module's artifact. The CSS sibling stays: it is the prior
    /// payload the change classifier compares against, and the forthcoming
    /// transform overwrites it.
    pub fn delete_module(&mut self, key: &ModuleKey) -> Option<CompiledArtifact> {
        self.modules.remove(key)
    }

    pub fn get_css(&self, key: &CssAssetKey) -> Option<&CssPayload> {
        self.css.get(key)
    }

    pub fn set_css(&mut self, key: CssAssetKey, payload: CssPayload) {
        self.css.insert(key, payload);
    }

    pub fn delete_css(&mut self, key: &CssAssetKey) -> Option<CssPayload> {
        self.css.remove(key)
    }

    /// Is this raw id one of our virtual CSS assets?
    pub fn owns_virtual(&self, raw_id: &str) -> bool {
        self.css.contains_key(&CssAssetKey::from_raw(raw_id))
    }

    /// Answer a host load request for a virtual file.
    pub fn load_virtual(&self, raw_id: &str) -> Option<&CssPayload> {
        self.css.get(&CssAssetKey::from_raw(raw_id))
    }

    #[cfg(test)]
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(js: &str) -> CompiledArtifact {
        CompiledArtifact {
            js_code: js.to_string(),
            js_map: None,
            css_code: String::new(),
            warnings: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    #[test]
    fn last_write_wins() {
        let mut cache = ArtifactCache::new();
        let key = ModuleKey::new("/app/Foo.comp");

        cache.set_module(key.clone(), artifact("v1"));
        cache.set_module(key.clone(), artifact("v2"));

        assert_eq!(cache.get_module(&key).unwrap().js_code, "v2");
        assert_eq!(cache.module_count(), 1);
    }

    #[test]
    fn delete_makes_entry_absent() {
        let mut cache = ArtifactCache::new();
        let key = ModuleKey::new("/app/Foo.comp");

        cache.set_module(key.clone(), artifact("v1"));
        assert!(cache.delete_module(&key).is_some());
        assert!(cache.get_module(&key).is_none());
        // Deleting again is a no-op, not an error.
        assert!(cache.delete_module(&key).is_none());
    }

    #[test]
    fn virtual_load_answers_from_css_map() {
        let mut cache = ArtifactCache::new();
        let key = ModuleKey::new("/app/Foo.comp");

        cache.set_css(key.css_sibling(), CssPayload::new(".a{color:red}"));

        assert!(cache.owns_virtual("/app/Foo.comp.css"));
        assert_eq!(
            cache.load_virtual("/app/Foo.comp.css?direct").unwrap().code,
            ".a{color:red}"
        );
        assert!(cache.load_virtual("/app/Other.comp.css").is_none());
    }

    #[test]
    fn deleted_virtual_asset_stops_loading() {
        let mut cache = ArtifactCache::new();
        let key = ModuleKey::new("/app/Foo.comp").css_sibling();

        cache.set_css(key.clone(), CssPayload::new(".a{}"));
        assert!(cache.delete_css(&key).is_some());
        assert!(cache.load_virtual("/app/Foo.comp.css").is_none());
    }

    #[test]
    fn empty_payload_is_still_present() {
        // A module without styles still owns its virtual sibling so that
        // the injected import resolves.
        let mut cache = ArtifactCache::new();
        let key = ModuleKey::new("/app/Foo.comp");

        cache.set_css(key.css_sibling(), CssPayload::default());
        assert!(cache.owns_virtual("/app/Foo.comp.css"));
        assert_eq!(cache.load_virtual("/app/Foo.comp.css").unwrap().code, "");
    }
}
