//! Module resolution boundary.
//!
//! The engine resolves three things itself - its virtual CSS ids, the
//! fixed client-runtime alias, and an optional dev-client patch target -
//! and offers bare imports to the host-provided package-field resolver.
//! Everything else falls through to the host's default resolution.
//!
//! Package lookup failures partition three ways: not-found falls through
//! silently, a package refusing to expose its manifest is recorded for a
//! one-time end-of-build warning, and anything else is fatal.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::split_query;
use crate::engine::Engine;
use crate::hot::RUNTIME_ALIAS;
use crate::log;

/// Suffix identifying the host's stock dev client module.
pub const DEV_CLIENT_SUFFIX: &str = "/dev-client.js";

// =============================================================================
// Boundary types
// =============================================================================

/// Outcome of a host-side package-field lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageResolution {
    /// The package names a component-source entry point.
    Resolved(PathBuf),
    /// No such package (or no component field); fall through silently.
    NotFound,
    /// The package manifest exists but is not exported; recorded for a
    /// one-time end-of-build warning.
    ExportForbidden,
}

/// Host-provided bare-import lookup (the package/export heuristics stay
/// on the host side of this trait).
pub trait PackageFieldResolver {
    fn resolve(&self, package: &str, importer: &str) -> anyhow::Result<PackageResolution>;
}

/// Resolution failures that must reach the host.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("package resolution failed for `{name}`")]
    Package {
        name: String,
        #[source]
        source: anyhow::Error,
    },
}

// =============================================================================
// Engine surface
// =============================================================================

impl Engine {
    /// Resolve an import specifier, or fall through to the host
    /// (`Ok(None)`).
    pub fn resolve_id(
        &self,
        specifier: &str,
        importer: Option<&str>,
        ssr: bool,
    ) -> Result<Option<String>, ResolveError> {
        let (fname, query) = split_query(specifier);

        // Our virtual CSS assets resolve to themselves so the host comes
        // back through the load boundary; SSR wants the file-path form,
        // with the query preserved so re-fetch requests round-trip.
        if self.cache.owns_virtual(fname) {
            if ssr && let Some(serve) = self.mode.serve_context() {
                return Ok(Some(format!("{}{query}", serve.to_file_path(fname))));
            }
            return Ok(Some(specifier.to_string()));
        }

        // Fixed alias for the client runtime module.
        if fname == RUNTIME_ALIAS
            && let Some(runtime) = &self.runtime_module
        {
            return Ok(Some(runtime.to_string_lossy().into_owned()));
        }

        // Optional replacement of the host's stock dev client.
        if fname.ends_with(DEV_CLIENT_SUFFIX)
            && let Some(patch) = &self.dev_client_patch
        {
            return Ok(Some(patch.to_string_lossy().into_owned()));
        }

        // Only bare imports go to the package-field boundary.
        let Some(importer) = importer else {
            return Ok(None);
        };
        if fname.starts_with(['.', '/', '\0']) {
            return Ok(None);
        }
        let Some(resolver) = &self.package_resolver else {
            return Ok(None);
        };

        let name = package_name(fname);
        match resolver.resolve(name, importer) {
            Ok(PackageResolution::Resolved(path)) => Ok(Some(path.to_string_lossy().into_owned())),
            Ok(PackageResolution::NotFound) => Ok(None),
            Ok(PackageResolution::ExportForbidden) => {
                self.export_errors.lock().insert(name.to_string());
                Ok(None)
            }
            Err(source) => Err(ResolveError::Package {
                name: name.to_string(),
                source,
            }),
        }
    }

    /// End-of-build hook: report packages whose manifests could not be
    /// checked, once, then forget them.
    pub fn finish_build(&self) {
        let mut errors = self.export_errors.lock();
        if errors.is_empty() {
            return;
        }
        let mut names: Vec<_> = errors.iter().cloned().collect();
        names.sort();
        log!(
            "warning";
            "could not check the component field of these packages (manifest not exported): {}",
            names.join(", ")
        );
        errors.clear();
    }
}

/// Package name of a bare import specifier (keeps the scope segment,
/// drops any subpath).
fn package_name(specifier: &str) -> &str {
    let mut segments = specifier.splitn(3, '/');
    let first = segments.next().unwrap_or(specifier);
    if first.starts_with('@') {
        let end = first.len() + segments.next().map_or(0, |s| s.len() + 1);
        &specifier[..end]
    } else {
        first
    }
}

// =============================================================================
// Tests
// =============================================================================
