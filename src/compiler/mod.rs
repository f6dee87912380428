//! Component-compiler boundary.
//!
//! The component-language compiler and its preprocessors are external
//! collaborators, consumed as black boxes behind the [`ComponentCompiler`]
//! and [`Preprocessor`] traits. The engine never inspects compiled output
//! beyond the textual normalization in `reload::normalize`.

mod warning;

pub use warning::{CSS_UNUSED_WARNING, Warning, WarningPosition};

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

// =============================================================================
// Options
// =============================================================================

/// Output form requested from the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerateMode {
    /// Client-side module (hot-capable).
    #[default]
    Dom,
    /// Server-side rendering module (never hot-patched).
    Ssr,
}

/// Per-build CSS scope-hash function.
///
/// Injected by the engine to capture the token the change classifier must
/// ignore; the compiler calls it once per compiled file.
pub type CssHashFn = Arc<dyn Fn(&Path) -> String + Send + Sync>;

/// Options for one compiler invocation.
#[derive(Clone, Default)]
pub struct CompileOptions {
    pub filename: PathBuf,
    /// Emit dev-mode instrumentation (location annotations etc.).
    pub dev: bool,
    pub generate: GenerateMode,
    /// Have the compiler inject CSS into the JS output instead of
    /// returning it separately.
    pub inject_css: bool,
    /// Sourcemap carried over from preprocessing.
    pub sourcemap: Option<String>,
    pub css_hash: Option<CssHashFn>,
}

impl fmt::Debug for CompileOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompileOptions")
            .field("filename", &self.filename)
            .field("dev", &self.dev)
            .field("generate", &self.generate)
            .field("inject_css", &self.inject_css)
            .field("css_hash", &self.css_hash.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

// =============================================================================
// Output
// =============================================================================

/// Raw output of one compiler invocation.
#[derive(Debug, Clone, Default)]
pub struct Compiled {
    pub js_code: String,
    pub js_map: Option<String>,
    /// `None` when the module has no styles (or they were injected).
    pub css_code: Option<String>,
    pub warnings: Vec<Warning>,
}

/// Output of one preprocessor pass.
#[derive(Debug, Clone, Default)]
pub struct Preprocessed {
    pub code: String,
    pub map: Option<String>,
    /// Extra files this source depends on; the host should watch them.
    pub dependencies: Vec<PathBuf>,
}

// =============================================================================
// Errors
// =============================================================================

/// Source position reported by the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

/// Structured compiler failure.
///
/// Propagated unmodified to the host, which surfaces it to the developer
/// (e.g. through an error overlay) instead of reloading.
#[derive(Debug, Clone)]
pub struct CompileError {
    pub message: String,
    pub filename: Option<PathBuf>,
    pub position: Option<Position>,
}

impl CompileError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            filename: None,
            position: None,
        }
    }

    pub fn with_filename(mut self, filename: impl Into<PathBuf>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_position(mut self, line: u32, column: u32) -> Self {
        self.position = Some(Position { line, column });
        self
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(filename) = &self.filename {
            write!(f, " ({}", filename.display())?;
            if let Some(pos) = self.position {
                write!(f, ":{}:{}", pos.line, pos.column)?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

impl std::error::Error for CompileError {}

// =============================================================================
// Traits
// =============================================================================

/// The component-language compiler.
pub trait ComponentCompiler {
    /// Compile one source file.
    fn compile(&self, source: &str, options: &CompileOptions) -> Result<Compiled, CompileError>;

    /// Source extensions this compiler claims (e.g. `[".comp"]`).
    fn extensions(&self) -> Vec<String>;
}

/// A source preprocessor run before compilation.
pub trait Preprocessor {
    fn preprocess(&self, source: &str, filename: &Path) -> Result<Preprocessed, CompileError>;
}

// =============================================================================
// Tests
// =============================================================================
