//! Engine construction and public surface.
//!
//! [`Engine`] owns everything the host hands us once (options, compiler,
//! preprocessors, boundary hooks) plus the per-session mutable state
//! (artifact cache, captured scope tokens, pending resolution warnings).
//! The operation surfaces live next to their domains:
//!
//! - `pipeline` - [`Engine::transform`]
//! - `reload::driver` - [`Engine::handle_file_change`]
//! - `resolve` - [`Engine::resolve_id`], [`Engine::finish_build`]
//!
//! and the small read-side surfaces ([`Engine::load_virtual`]) are here.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;

use crate::cache::{ArtifactCache, CssPayload};
use crate::compiler::{
    CompileError, ComponentCompiler, CssHashFn, Preprocessor, Warning,
};
use crate::config::{ConfigError, EngineOptions, HostMode, ResolvedOptions};
use crate::core::{ModuleFilter, ModuleKey, trim_query};
use crate::resolve::PackageFieldResolver;

/// Warning sink supplied by the host; defaults to the logger.
pub type WarningSink = Box<dyn Fn(&Warning) + Send + Sync>;

/// Errors surfaced by the update-event boundary.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to re-read `{path}`")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Compile(#[from] CompileError),
}

// =============================================================================
// Engine
// =============================================================================

/// The compiler-integration engine.
///
/// One instance per build session. All mutation funnels through `&mut
/// self` operations driven by the host's single-flight event dispatch; the
/// only shared interior state is the scope-token map the injected CSS hash
/// function writes into from inside compiler invocations.
pub struct Engine {
    pub(crate) options: EngineOptions,
    pub(crate) resolved: ResolvedOptions,
    pub(crate) mode: HostMode,
    pub(crate) filter: ModuleFilter,
    pub(crate) compiler: Box<dyn ComponentCompiler>,
    pub(crate) preprocessors: Vec<Box<dyn Preprocessor>>,
    pub(crate) package_resolver: Option<Box<dyn PackageFieldResolver>>,
    pub(crate) on_warn: Option<WarningSink>,
    pub(crate) cache: ArtifactCache,
    /// File → captured per-build CSS scope token.
    pub(crate) scope_tokens: Arc<Mutex<FxHashMap<PathBuf, String>>>,
    pub(crate) css_hash: Option<CssHashFn>,
    /// Package names that refused to expose their manifest; reported once
    /// at end of build.
    pub(crate) export_errors: Mutex<FxHashSet<String>>,
    pub(crate) runtime_module: Option<PathBuf>,
    pub(crate) dev_client_patch: Option<PathBuf>,
}

impl Engine {
    pub fn builder(compiler: Box<dyn ComponentCompiler>) -> EngineBuilder {
        EngineBuilder::new(compiler)
    }

    /// Canonical cache key for a raw module id.
    ///
    /// Strips the query suffix and applies the managed-server URL rewrite
    /// when one is configured. Idempotent; never fails - an unresolvable
    /// id simply misses the cache downstream.
    pub fn module_key(&self, raw_id: &str) -> ModuleKey {
        let id = trim_query(raw_id);
        match self.mode.serve_context() {
            Some(serve) => ModuleKey::new(serve.to_served_url(id)),
            None => ModuleKey::new(id),
        }
    }

    /// Answer a host load request for a virtual (generated) file.
    ///
    /// Only CSS assets are ever virtual in this design.
    pub fn load_virtual(&self, raw_id: &str) -> Option<CssPayload> {
        let id = match self.mode.serve_context() {
            Some(serve) => serve.to_served_url(trim_query(raw_id)),
            None => trim_query(raw_id).to_string(),
        };
        self.cache.load_virtual(&id).cloned()
    }

    /// Scope token captured for a source file, if any.
    pub fn scope_token(&self, file: &Path) -> Option<String> {
        self.scope_tokens.lock().get(file).cloned()
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn is_hot(&self) -> bool {
        self.resolved.hot
    }

    pub fn emits_css(&self) -> bool {
        self.resolved.emit_css
    }

    pub(crate) fn deliver_warning(&self, warning: &Warning) {
        match &self.on_warn {
            Some(sink) => sink(warning),
            None => crate::log!("warning"; "{warning}"),
        }
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Wires host collaborators into an [`Engine`].
pub struct EngineBuilder {
    options: EngineOptions,
    mode: HostMode,
    compiler: Box<dyn ComponentCompiler>,
    preprocessors: Vec<Box<dyn Preprocessor>>,
    package_resolver: Option<Box<dyn PackageFieldResolver>>,
    on_warn: Option<WarningSink>,
    css_hash: Option<CssHashFn>,
    runtime_module: Option<PathBuf>,
    dev_client_patch: Option<PathBuf>,
}

impl EngineBuilder {
    pub fn new(compiler: Box<dyn ComponentCompiler>) -> Self {
        Self {
            options: EngineOptions::new(),
            mode: HostMode::Plain,
            compiler,
            preprocessors: Vec::new(),
            package_resolver: None,
            on_warn: None,
            css_hash: None,
            runtime_module: None,
            dev_client_patch: None,
        }
    }

    pub fn options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn host_mode(mut self, mode: HostMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn preprocessor(mut self, preprocessor: Box<dyn Preprocessor>) -> Self {
        self.preprocessors.push(preprocessor);
        self
    }

    pub fn package_resolver(mut self, resolver: Box<dyn PackageFieldResolver>) -> Self {
        self.package_resolver = Some(resolver);
        self
    }

    pub fn on_warn(mut self, sink: WarningSink) -> Self {
        self.on_warn = Some(sink);
        self
    }

    /// Override the injected CSS scope-hash function.
    pub fn css_hash(mut self, css_hash: CssHashFn) -> Self {
        self.css_hash = Some(css_hash);
        self
    }

    /// Module the client runtime alias resolves to.
    pub fn runtime_module(mut self, path: impl Into<PathBuf>) -> Self {
        self.runtime_module = Some(path.into());
        self
    }

    /// Replacement target for the host's stock dev client.
    pub fn dev_client_patch(mut self, path: impl Into<PathBuf>) -> Self {
        self.dev_client_patch = Some(path.into());
        self
    }

    /// Run the one-time validation pass and assemble the engine.
    pub fn build(self) -> Result<Engine, ConfigError> {
        let Self {
            mut options,
            mode,
            compiler,
            preprocessors,
            package_resolver,
            on_warn,
            css_hash,
            runtime_module,
            dev_client_patch,
        } = self;

        let resolved = options.resolve(&mode);

        let extensions = if options.extensions.is_empty() {
            compiler.extensions()
        } else {
            options.extensions.clone()
        };
        let filter = ModuleFilter::new(
            options.include.as_deref(),
            options.exclude.as_deref(),
            extensions,
        )?;

        let scope_tokens: Arc<Mutex<FxHashMap<PathBuf, String>>> = Arc::default();
        let css_hash = css_hash.or_else(|| {
            (resolved.hot && resolved.emit_css && mode.is_dev_serve())
                .then(|| default_css_hash(Arc::clone(&scope_tokens)))
        });

        Ok(Engine {
            options,
            resolved,
            mode,
            filter,
            compiler,
            preprocessors,
            package_resolver,
            on_warn,
            cache: ArtifactCache::new(),
            scope_tokens,
            css_hash,
            export_errors: Mutex::new(FxHashSet::default()),
            runtime_module,
            dev_client_patch,
        })
    }
}

/// The injected scope-hash function: a stable 12-hex-char token derived
/// from the filename, recorded so the change classifier can strip it.
fn default_css_hash(tokens: Arc<Mutex<FxHashMap<PathBuf, String>>>) -> CssHashFn {
    Arc::new(move |filename: &Path| {
        let digest = blake3::hash(filename.to_string_lossy().as_bytes());
        let token = format!("cdr-{}", hex::encode(&digest.as_bytes()[..6]));
        tokens.lock().insert(filename.to_path_buf(), token.clone());
        token
    })
}

// =============================================================================
// Tests
// =============================================================================
