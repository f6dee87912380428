//! Host module-graph boundary.
//!
//! The bundler owns the dependency graph; the engine only asks two
//! questions of it: "who consumes this file (in which compiled form)?" and
//! "invalidate this consumer". Graph storage, resolution, and file
//! watching all stay on the host side of this trait.

use std::path::Path;

use crate::core::{AssetKind, ModuleRef};

/// The host's module graph, as seen by the invalidation driver.
pub trait ModuleGraph {
    /// Consumers of a file, partitioned by the compiled form they import.
    ///
    /// For [`AssetKind::Css`] this means consumers of the file's virtual
    /// stylesheet sibling, not of the file itself.
    fn consumers_by_file(&self, file: &Path, kind: AssetKind) -> Vec<ModuleRef>;

    /// Invalidate one consumer module.
    fn invalidate(&mut self, module: &ModuleRef);
}
