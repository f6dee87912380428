//! Per-module hot state machine.
//!
//! Every state change goes through [`HotModuleState::transition`], so the
//! lifecycle is auditable and testable in isolation; in particular the
//! sticky `Declined` state is a transition like any other, not a
//! free-floating flag mutated from callbacks.

use thiserror::Error;

/// Opaque data carrier handed from a generation's dispose handlers to its
/// successor's accept handlers.
pub type HotData = serde_json::Map<String, serde_json::Value>;

/// Handler invoked before the current generation is torn down; writes
/// carried-over state into the data carrier.
pub type DisposeHandler = Box<dyn FnMut(&mut HotData)>;

/// Handler invoked after the new module body has been loaded; reads the
/// carried-over state.
pub type AcceptHandler = Box<dyn FnMut(&HotData)>;

// =============================================================================
// Status
// =============================================================================

/// Lifecycle of one hot-capable module across reload generations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotStatus {
    /// State exists but no generation has registered handlers yet.
    Fresh,
    /// A generation is live, handlers registered.
    Active,
    /// An update arrived; dispose handlers are replaying.
    Disposing,
    /// New module body loaded; accept handlers are replaying.
    Accepting,
    /// Terminal: the module opted out of in-place updates. Sticky.
    Declined,
}

impl HotStatus {
    /// Is `self -> to` a legal edge of the lifecycle?
    ///
    /// `Declined` is reachable from everywhere (including itself, so
    /// repeated declines stay idempotent) and leads nowhere else.
    pub fn can_transition(self, to: HotStatus) -> bool {
        use HotStatus::*;
        match (self, to) {
            (_, Declined) => true,
            (Declined, _) => false,
            (Fresh, Active) => true,
            (Active, Disposing) => true,
            (Disposing, Accepting) => true,
            (Accepting, Active) => true,
            _ => false,
        }
    }
}

/// Client-protocol errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HotError {
    #[error("invalid hot state transition: {from:?} -> {to:?}")]
    InvalidTransition { from: HotStatus, to: HotStatus },
}

// =============================================================================
// HotModuleState
// =============================================================================

/// State for one module, living for the whole client session (across
/// reload generations).
pub struct HotModuleState {
    status: HotStatus,
    /// Carried-over data; created lazily by the first dispose replay.
    pub(super) data: HotData,
    pub(super) dispose_handlers: Vec<DisposeHandler>,
    pub(super) accept_handlers: Vec<AcceptHandler>,
}

impl HotModuleState {
    pub(super) fn new() -> Self {
        Self {
            status: HotStatus::Fresh,
            data: HotData::new(),
            dispose_handlers: Vec::new(),
            accept_handlers: Vec::new(),
        }
    }

    pub fn status(&self) -> HotStatus {
        self.status
    }

    pub fn is_declined(&self) -> bool {
        self.status == HotStatus::Declined
    }

    /// Carried-over data of the current generation handoff.
    pub fn data(&self) -> &HotData {
        &self.data
    }

    /// Apply a lifecycle transition, rejecting illegal edges.
    pub fn transition(&mut self, to: HotStatus) -> Result<(), HotError> {
        if !self.status.can_transition(to) {
            return Err(HotError::InvalidTransition {
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }
}

impl std::fmt::Debug for HotModuleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HotModuleState")
            .field("status", &self.status)
            .field("data", &self.data)
            .field("dispose_handlers", &self.dispose_handlers.len())
            .field("accept_handlers", &self.accept_handlers.len())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
