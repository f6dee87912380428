//! Engine configuration.
//!
//! Options arrive from the embedding host either as a typed
//! [`EngineOptions`] value or as loose JSON via
//! [`EngineOptions::from_value`]. All validation happens once, at engine
//! construction:
//!
//! - unknown fields are collected in a single pass and warned about,
//! - conflicting fields are normalized with a warning,
//! - hot mode is resolved against the host mode (plain bundler builds
//!   default it off, a managed dev-serve defaults it on).

mod error;

pub use error::ConfigError;

use serde::Deserialize;

use crate::core::ServeContext;
use crate::log;

// ============================================================================
// Host mode
// ============================================================================

/// How the engine is being hosted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostMode {
    /// Plain bundler build: ids are file paths, no URL rewriting.
    Plain,
    /// Bundler-managed virtual server: ids are served URLs.
    Managed {
        serve: ServeContext,
        /// True when the managed server runs in development mode, which
        /// turns on dev/hot defaults.
        dev_serve: bool,
    },
}

impl HostMode {
    pub fn serve_context(&self) -> Option<&ServeContext> {
        match self {
            Self::Managed { serve, .. } => Some(serve),
            Self::Plain => None,
        }
    }

    pub fn is_dev_serve(&self) -> bool {
        matches!(self, Self::Managed { dev_serve: true, .. })
    }
}

// ============================================================================
// Options
// ============================================================================

/// Host-facing engine options.
///
/// With the struct-level serde default, fields missing from a loose value
/// are taken from [`Default`], which matches [`EngineOptions::new`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Regex restricting which ids the engine transforms.
    pub include: Option<String>,
    /// Regex excluding ids from transformation (wins over `include`).
    pub exclude: Option<String>,
    /// Recognized source extensions; empty means "ask the compiler".
    pub extensions: Vec<String>,
    /// Emit styles as virtual CSS assets instead of having the compiler
    /// inject them into the JS output.
    pub emit_css: bool,
    pub hot: HotOptions,
    pub compiler: CompilerSettings,
}

/// Hot-reload options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HotOptions {
    /// Tri-state: `None` resolves per host mode (on in a managed dev
    /// serve, off otherwise).
    pub enabled: Option<bool>,
    /// Report declined modules instead of forcing a full reload.
    pub no_reload: bool,
}

/// Settings forwarded to the component compiler.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CompilerSettings {
    /// Compile with dev-mode instrumentation. `None` resolves per host
    /// mode.
    pub dev: Option<bool>,
    /// Have the compiler inject CSS into the JS output. Forced off when
    /// `emit_css` is enabled.
    pub css: Option<bool>,
}

/// Option flags after the one-time validation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedOptions {
    pub dev: bool,
    pub hot: bool,
    pub emit_css: bool,
    pub no_reload: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            include: None,
            exclude: None,
            extensions: Vec::new(),
            // Virtual CSS emission is the default; compiler-injected
            // styles are the opt-out.
            emit_css: true,
            hot: HotOptions::default(),
            compiler: CompilerSettings::default(),
        }
    }
}

impl EngineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deserialize options from a loose JSON value, warning once per
    /// unknown field.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        let mut unknown = Vec::new();
        let options: Self = serde_ignored::deserialize(value, |path| {
            unknown.push(path.to_string());
        })?;
        for path in &unknown {
            log!("warning"; "unknown `{path}` option - use `compiler` for compiler configuration");
        }
        Ok(options)
    }

    /// Resolve tri-state fields against the host mode and normalize
    /// conflicts. Called exactly once, at engine construction.
    pub fn resolve(&mut self, mode: &HostMode) -> ResolvedOptions {
        if self.emit_css {
            if self.compiler.css == Some(true) {
                log!("warning"; "forcing `compiler.css` off because `emit_css` is enabled");
            }
            self.compiler.css = Some(false);
        }

        // Managed dev serve defaults dev/hot on when unspecified.
        if mode.is_dev_serve() {
            if self.compiler.dev.is_none() {
                self.compiler.dev = Some(true);
            }
            if self.hot.enabled.is_none() {
                self.hot.enabled = Some(true);
            }
        }

        let dev = self.compiler.dev.unwrap_or(false);
        let mut hot = self.hot.enabled.unwrap_or(false);

        // Hot updates patch dev-instrumented modules; without dev output
        // there is nothing to patch against.
        if hot && !dev {
            log!("config"; "disabling hot reload because `compiler.dev` is disabled");
            hot = false;
            self.hot.enabled = Some(false);
        }

        ResolvedOptions {
            dev,
            hot,
            emit_css: self.emit_css,
            no_reload: self.hot.no_reload,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn managed(dev_serve: bool) -> HostMode {
        HostMode::Managed {
            serve: ServeContext::new("/app", "/"),
            dev_serve,
        }
    }

    #[test]
    fn from_value_accepts_known_fields() {
        let options = EngineOptions::from_value(json!({
            "emit_css": true,
            "hot": { "enabled": true, "no_reload": true },
            "compiler": { "dev": true },
        }))
        .unwrap();
        assert!(options.emit_css);
        assert_eq!(options.hot.enabled, Some(true));
        assert!(options.hot.no_reload);
    }

    #[test]
    fn emit_css_defaults_on() {
        assert!(EngineOptions::new().emit_css);
        assert!(EngineOptions::from_value(json!({})).unwrap().emit_css);
    }

    #[test]
    fn from_value_tolerates_unknown_fields() {
        // Unknown fields warn but do not fail the parse.
        let options = EngineOptions::from_value(json!({
            "emit_css": true,
            "emitCss": true,
        }))
        .unwrap();
        assert!(options.emit_css);
    }

    #[test]
    fn emit_css_forces_compiler_css_off() {
        let mut options = EngineOptions::new();
        options.compiler.css = Some(true);
        options.resolve(&HostMode::Plain);
        assert_eq!(options.compiler.css, Some(false));
    }

    #[test]
    fn dev_serve_defaults_hot_and_dev_on() {
        let mut options = EngineOptions::new();
        let resolved = options.resolve(&managed(true));
        assert!(resolved.dev);
        assert!(resolved.hot);
    }

    #[test]
    fn managed_build_keeps_hot_off() {
        let mut options = EngineOptions::new();
        let resolved = options.resolve(&managed(false));
        assert!(!resolved.dev);
        assert!(!resolved.hot);
    }

    #[test]
    fn hot_requires_dev() {
        let mut options = EngineOptions::new();
        options.hot.enabled = Some(true);
        options.compiler.dev = Some(false);
        let resolved = options.resolve(&HostMode::Plain);
        assert!(!resolved.hot);
    }

    #[test]
    fn explicit_settings_survive_dev_serve_defaults() {
        let mut options = EngineOptions::new();
        options.hot.enabled = Some(false);
        let resolved = options.resolve(&managed(true));
        assert!(resolved.dev);
        assert!(!resolved.hot);
    }
}
