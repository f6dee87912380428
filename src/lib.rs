//! cinder - change-detection and hot-reload engine for component-compiler
//! dev pipelines.
//!
//! Given a source file, cinder drives an external component-language
//! compiler to produce JavaScript and (optionally) a virtual CSS asset,
//! tracks prior outputs per module, and decides - on every recompilation
//! triggered by a file change - whether the change is cosmetically
//! irrelevant (reuse previous output, no client reload), requires a
//! targeted reload of only the JS or only the CSS consumers, or requires
//! a full page reload.
//!
//! # Architecture
//!
//! ```text
//! host file-change event
//!        |
//!        v
//!   reload::driver ---> cache (snapshot / evict)
//!        |                 ^
//!        v                 |
//!     pipeline ----> compiler boundary
//!        |
//!        v
//!   reload::{normalize, classify} ---> graph boundary (invalidate)
//!
//! client side: hot::{registry, state} consume the invalidation signal
//! ```
//!
//! The compiler, the host's module graph, and file watching are external
//! collaborators consumed through traits; cinder itself performs no disk
//! I/O and persists nothing.
//!
//! # Modules
//!
//! - `cache` - per-module artifact cache, doubling as the virtual-asset
//!   store
//! - `compiler` - the component-compiler boundary traits
//! - `config` - typed options with a one-time validation pass
//! - `core` - module identity, URL rewriting, filtering
//! - `engine` - construction and the host-facing surface
//! - `graph` - the host module-graph boundary trait
//! - `hot` - the client-side accept/dispose protocol
//! - `pipeline` - the transform pipeline (source text to cached artifact)
//! - `reload` - change detection and targeted invalidation
//! - `resolve` - the module-resolution boundary

pub mod cache;
pub mod compiler;
pub mod config;
pub mod core;
pub mod engine;
pub mod graph;
pub mod hot;
pub mod logger;
pub mod pipeline;
pub mod reload;
pub mod resolve;

pub use cache::{ArtifactCache, CompiledArtifact, CssPayload};
pub use compiler::{
    CompileError, CompileOptions, Compiled, ComponentCompiler, CssHashFn, GenerateMode,
    Preprocessed, Preprocessor, Warning,
};
pub use config::{CompilerSettings, ConfigError, EngineOptions, HostMode, HotOptions};
pub use core::{AssetKind, CssAssetKey, ModuleKey, ModuleRef, ServeContext};
pub use engine::{Engine, EngineBuilder, EngineError};
pub use graph::ModuleGraph;
pub use hot::{HotData, HotError, HotRegistry, HotStatus, RUNTIME_ALIAS, UpdateOutcome};
pub use reload::driver::UpdateDecision;
pub use resolve::{PackageFieldResolver, PackageResolution, ResolveError};
