//! Reload Module
//!
//! Change detection and minimal-scope invalidation for recompilations.
//!
//! # Architecture
//!
//! ```text
//! file change -> driver -> cache snapshot/evict -> transform
//!                  |                                   |
//!                  +-- normalize --> classify --> invalidate consumers
//! ```
//!
//! # Modules
//!
//! - `classify` - did the JS and/or CSS output change meaningfully?
//! - `driver` - the per-file-change state machine
//! - `normalize` - strip non-semantic churn before comparing output

pub mod classify;
pub mod driver;
pub mod normalize;
