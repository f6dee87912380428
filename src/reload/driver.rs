//! Invalidation driver - the per-file-change state machine.
//!
//! One file-change event is processed to completion before the next is
//! accepted (the host's single-flight dispatch provides the exclusivity).
//! Ordering inside one event matters: the cache eviction must
//! happen-before the recompilation, which must happen-before the
//! classification, or a concurrent event on the same key could be
//! classified against a mutated snapshot. There is no cancellation: a
//! superseding change event simply runs its own sequence afterwards,
//! last-write-wins on the cache.

use std::io;
use std::path::Path;

use rustc_hash::FxHashSet;

use crate::core::{AssetKind, ModuleRef};
use crate::debug;
use crate::engine::{Engine, EngineError};
use crate::graph::ModuleGraph;

use super::classify::classify;

/// What the driver decided about one file-change event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateDecision {
    /// The engine does not participate in this event; the host's default
    /// behavior (full invalidation) applies. Also the answer when there
    /// is no prior snapshot to compare against: correctness over
    /// precision.
    Unhandled,
    /// Exactly these consumers were invalidated. Empty means nothing
    /// observable changed and no client action is required.
    Invalidated(Vec<ModuleRef>),
}

impl Engine {
    /// Drive one recompilation event for a changed file.
    ///
    /// `read` is the host's re-read capability for the changed file; it
    /// is only invoked after the prior snapshot has been taken and
    /// evicted. Compiler failures propagate unmodified and leave the
    /// cache evicted, so the next transform cannot observe a stale entry.
    pub fn handle_file_change(
        &mut self,
        graph: &mut dyn ModuleGraph,
        path: &Path,
        read: impl FnOnce() -> io::Result<String>,
    ) -> Result<UpdateDecision, EngineError> {
        // 1. Entry guards
        if !self.resolved.hot || !self.resolved.emit_css {
            return Ok(UpdateDecision::Unhandled);
        }
        let path_str = path.to_string_lossy().into_owned();
        if !self.filter.matches(&path_str) {
            return Ok(UpdateDecision::Unhandled);
        }

        let key = self.module_key(&path_str);
        let css_key = key.css_sibling();

        // 2. Snapshot prior output; a module never transformed before has
        // nothing to compare against.
        let old_js = self.cache.get_module(&key).map(|a| a.js_code.clone());
        let old_css = self.cache.get_css(&css_key).map(|p| p.code.clone());
        let (Some(old_js), Some(old_css)) = (old_js, old_css) else {
            return Ok(UpdateDecision::Unhandled);
        };

        // 3. Evict so the transform cannot short-circuit on itself.
        self.cache.delete_module(&key);

        // 4. Recompile; failure leaves the cache evicted.
        let source = read().map_err(|source| EngineError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let new_js = self.transform(&source, &path_str, false)?.map(|a| a.js_code);
        let new_css = self.cache.get_css(&css_key).map(|p| p.code.clone());

        // 5. Classify old vs. fresh
        let token = self.scope_token(path);
        let changes = classify(
            token.as_deref(),
            Some(&old_js),
            new_js.as_deref(),
            Some(&old_css),
            new_css.as_deref(),
        );

        // 6. Select consumers per compiled form
        let js_consumers = graph.consumers_by_file(path, AssetKind::Js);
        let css_consumers = graph.consumers_by_file(path, AssetKind::Css);
        if js_consumers.is_empty() && css_consumers.is_empty() {
            return Ok(UpdateDecision::Unhandled);
        }

        // 7. Invalidate exactly the sets whose form changed
        let mut affected: Vec<ModuleRef> = Vec::new();
        let mut seen: FxHashSet<ModuleRef> = FxHashSet::default();
        if changes.js {
            collect(&mut affected, &mut seen, js_consumers);
        }
        if changes.css {
            collect(&mut affected, &mut seen, css_consumers);
        }
        for consumer in &affected {
            graph.invalidate(consumer);
        }

        debug!("reload"; "{key}: js_changed={} css_changed={} invalidated={}",
            changes.js, changes.css, affected.len());

        // 8. Possibly empty: nothing observable changed.
        Ok(UpdateDecision::Invalidated(affected))
    }
}

/// Union while preserving consumer-set iteration order.
fn collect(
    affected: &mut Vec<ModuleRef>,
    seen: &mut FxHashSet<ModuleRef>,
    consumers: Vec<ModuleRef>,
) {
    for consumer in consumers {
        if seen.insert(consumer.clone()) {
            affected.push(consumer);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
