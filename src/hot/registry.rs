//! Owned per-module hot state store.
//!
//! One registry per running client session. Explicitly owned (created by
//! the embedding runtime, passed to whoever needs it) rather than an
//! ambient global, so independent client instances - and tests - never
//! collide.

use std::mem;

use rustc_hash::FxHashMap;

use crate::core::ModuleKey;
use crate::log;

use super::state::{HotData, HotError, HotModuleState, HotStatus};

/// What the registry decided about one update signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The module was patched in place through the dispose/accept
    /// handshake.
    Applied,
    /// The module is declined: the host must fully reload the
    /// page/process.
    FullReload,
    /// The module is declined but automatic reload is disabled; the event
    /// was reported and nothing else happened.
    ReloadSkipped,
}

// =============================================================================
// HotRegistry
// =============================================================================

/// Per-module persistent hot state, keyed by module identity.
///
/// Lives for the lifetime of the running client session; module entries
/// survive across reload generations.
pub struct HotRegistry {
    modules: FxHashMap<ModuleKey, HotModuleState>,
    no_reload: bool,
}

impl HotRegistry {
    pub fn new(no_reload: bool) -> Self {
        Self {
            modules: FxHashMap::default(),
            no_reload,
        }
    }

    /// State for a module, if any generation ever touched it.
    pub fn state(&self, key: &ModuleKey) -> Option<&HotModuleState> {
        self.modules.get(key)
    }

    /// Carried-over data for a module (what `dispose` handlers wrote).
    pub fn data(&self, key: &ModuleKey) -> Option<&HotData> {
        self.modules.get(key).map(HotModuleState::data)
    }

    /// Register a dispose handler for the module's current generation.
    ///
    /// All handlers registered within one generation fire exactly once, in
    /// registration order, immediately before that generation is torn
    /// down.
    pub fn dispose(&mut self, key: &ModuleKey, handler: impl FnMut(&mut HotData) + 'static) {
        let state = self.entry(key);
        if state.status() == HotStatus::Fresh {
            state.transition(HotStatus::Active).ok();
        }
        state.dispose_handlers.push(Box::new(handler));
    }

    /// Register an accept handler for the module's current generation.
    ///
    /// Fires after the replacing module body has been loaded, receiving
    /// the data carrier the dispose handlers wrote into.
    pub fn accept(&mut self, key: &ModuleKey, handler: impl FnMut(&HotData) + 'static) {
        let state = self.entry(key);
        if state.status() == HotStatus::Fresh {
            state.transition(HotStatus::Active).ok();
        }
        state.accept_handlers.push(Box::new(handler));
    }

    /// Mark a module declined. Sticky: every subsequent update for this
    /// key forces a full reload regardless of what changed.
    pub fn decline(&mut self, key: &ModuleKey) {
        // Every state has a legal edge to Declined, including Declined
        // itself, so repeated declines stay idempotent.
        self.entry(key).transition(HotStatus::Declined).ok();
    }

    /// Apply an update signal for one module.
    ///
    /// `loader` re-executes the module's defining code (the new
    /// generation registers its handlers from inside it). Sequence:
    /// dispose handlers replay into the data carrier, the loader runs,
    /// then the superseded generation's accept handlers observe the
    /// carried data.
    pub fn apply_update(
        &mut self,
        key: &ModuleKey,
        loader: impl FnOnce(&mut Self),
    ) -> Result<UpdateOutcome, HotError> {
        if self.entry(key).is_declined() {
            if self.no_reload {
                log!("hot"; "{key}: declined, full reload required");
                return Ok(UpdateOutcome::ReloadSkipped);
            }
            return Ok(UpdateOutcome::FullReload);
        }

        // First update for a module that never registered handlers:
        // nothing to hand over, just load the new body.
        if self.entry(key).status() == HotStatus::Fresh {
            loader(self);
            return Ok(UpdateOutcome::Applied);
        }

        // Tear down the current generation.
        let (mut dispose_handlers, mut accept_handlers, mut data) = {
            let state = self.entry(key);
            state.transition(HotStatus::Disposing)?;
            (
                mem::take(&mut state.dispose_handlers),
                mem::take(&mut state.accept_handlers),
                mem::take(&mut state.data),
            )
        };
        for handler in dispose_handlers.iter_mut() {
            handler(&mut data);
        }

        // Carried data is visible to the new generation before it runs.
        {
            let state = self.entry(key);
            state.transition(HotStatus::Accepting)?;
            state.data = data;
        }

        // Re-execute the module body; new handlers land in fresh vecs.
        loader(self);

        let data = self
            .modules
            .get(key)
            .map(|state| state.data.clone())
            .unwrap_or_default();
        for handler in accept_handlers.iter_mut() {
            handler(&data);
        }

        let state = self.entry(key);
        // The loader may have declined the module; that wins over
        // returning to Active.
        if !state.is_declined() {
            state.transition(HotStatus::Active)?;
        }
        Ok(UpdateOutcome::Applied)
    }

    fn entry(&mut self, key: &ModuleKey) -> &mut HotModuleState {
        self.modules
            .entry(key.clone())
            .or_insert_with(HotModuleState::new)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use parking_lot::Mutex;
    use serde_json::json;

    use super::*;

    fn key() -> ModuleKey {
        ModuleKey::new("/src/Foo.comp")
    }

    #[test]
    fn dispose_data_reaches_accept() {
        let mut registry = HotRegistry::new(false);
        let key = key();

        registry.dispose(&key, |data| {
            data.insert("count".to_string(), json!(5));
        });
        let seen: Arc<Mutex<Option<i64>>> = Arc::default();
        let sink = Arc::clone(&seen);
        registry.accept(&key, move |data| {
            *sink.lock() = data.get("count").and_then(serde_json::Value::as_i64);
        });

        let outcome = registry.apply_update(&key, |_| {}).unwrap();
        assert_eq!(outcome, UpdateOutcome::Applied);
        assert_eq!(*seen.lock(), Some(5));
    }

    #[test]
    fn carried_data_survives_into_next_generation() {
        let mut registry = HotRegistry::new(false);
        let key = key();

        registry.dispose(&key, |data| {
            data.insert("count".to_string(), json!(5));
        });
        registry.apply_update(&key, |_| {}).unwrap();

        // A later generation reads the same handoff through the registry.
        let carried = registry.data(&key).unwrap();
        assert_eq!(carried.get("count"), Some(&json!(5)));
    }

    #[test]
    fn handlers_fire_in_registration_order() {
        let mut registry = HotRegistry::new(false);
        let key = key();

        let order: Arc<Mutex<Vec<&'static str>>> = Arc::default();
        for name in ["first", "second", "third"] {
            let sink = Arc::clone(&order);
            registry.dispose(&key, move |_| sink.lock().push(name));
        }

        registry.apply_update(&key, |_| {}).unwrap();
        assert_eq!(order.lock().as_slice(), ["first", "second", "third"]);
    }

    #[test]
    fn handlers_fire_once_per_generation() {
        let mut registry = HotRegistry::new(false);
        let key = key();

        let count = Arc::new(AtomicUsize::new(0));
        let sink = Arc::clone(&count);
        registry.dispose(&key, move |_| {
            sink.fetch_add(1, Ordering::SeqCst);
        });

        registry.apply_update(&key, |_| {}).unwrap();
        // Second update: the old generation's handlers are gone.
        registry.apply_update(&key, |_| {}).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn loader_registers_the_next_generation() {
        let mut registry = HotRegistry::new(false);
        let key = key();

        registry.dispose(&key, |data| {
            data.insert("generation".to_string(), json!(1));
        });

        let seen: Arc<Mutex<Vec<i64>>> = Arc::default();
        let sink = Arc::clone(&seen);
        let loader_key = key.clone();
        registry
            .apply_update(&key, move |registry| {
                // New module body: registers handlers for generation 2.
                registry.accept(&loader_key, move |data| {
                    if let Some(generation) =
                        data.get("generation").and_then(serde_json::Value::as_i64)
                    {
                        sink.lock().push(generation);
                    }
                });
            })
            .unwrap();

        // Generation 2's accept has not fired yet.
        assert!(seen.lock().is_empty());

        registry.apply_update(&key, |_| {}).unwrap();
        assert_eq!(seen.lock().as_slice(), [1]);
    }

    #[test]
    fn declined_forces_full_reload() {
        let mut registry = HotRegistry::new(false);
        let key = key();

        registry.decline(&key);
        assert_eq!(
            registry.apply_update(&key, |_| {}).unwrap(),
            UpdateOutcome::FullReload
        );
    }

    #[test]
    fn declined_is_sticky_across_updates() {
        let mut registry = HotRegistry::new(false);
        let key = key();

        registry.dispose(&key, |_| panic!("declined modules never dispose"));
        registry.decline(&key);

        for _ in 0..3 {
            assert_eq!(
                registry.apply_update(&key, |_| {}).unwrap(),
                UpdateOutcome::FullReload
            );
        }
        assert!(registry.state(&key).unwrap().is_declined());
    }

    #[test]
    fn no_reload_reports_instead_of_reloading() {
        let mut registry = HotRegistry::new(true);
        let key = key();

        registry.decline(&key);
        assert_eq!(
            registry.apply_update(&key, |_| {}).unwrap(),
            UpdateOutcome::ReloadSkipped
        );
    }

    #[test]
    fn decline_from_inside_loader_wins() {
        let mut registry = HotRegistry::new(false);
        let key = key();

        registry.accept(&key, |_| {});
        let loader_key = key.clone();
        registry
            .apply_update(&key, move |registry| registry.decline(&loader_key))
            .unwrap();

        assert!(registry.state(&key).unwrap().is_declined());
        assert_eq!(
            registry.apply_update(&key, |_| {}).unwrap(),
            UpdateOutcome::FullReload
        );
    }

    #[test]
    fn fresh_module_update_just_loads() {
        let mut registry = HotRegistry::new(false);
        let key = key();

        let loaded = Arc::new(AtomicUsize::new(0));
        let sink = Arc::clone(&loaded);
        let outcome = registry
            .apply_update(&key, move |_| {
                sink.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        assert_eq!(outcome, UpdateOutcome::Applied);
        assert_eq!(loaded.load(Ordering::SeqCst), 1);
    }
}
