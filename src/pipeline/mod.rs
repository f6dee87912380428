//! Transform pipeline - source text to cached artifact.
//!
//! Pure orchestration over the compiler boundary; the only state it
//! touches is the artifact cache it repopulates.
//!
//! Stages, in order: filter → preprocess → compile → warning routing →
//! virtual CSS emission (+ injected import) → hot bootstrap injection →
//! cache population.

use std::path::PathBuf;

use crate::cache::{CompiledArtifact, CssPayload};
use crate::compiler::{CSS_UNUSED_WARNING, CompileError, CompileOptions, GenerateMode};
use crate::core::trim_query;
use crate::engine::Engine;
use crate::hot;

impl Engine {
    /// Transform one source file into a compiled artifact.
    ///
    /// Returns `Ok(None)` when the id is not ours (filter or extension
    /// mismatch). Compiler failures propagate unmodified.
    pub fn transform(
        &mut self,
        source: &str,
        raw_id: &str,
        ssr: bool,
    ) -> Result<Option<CompiledArtifact>, CompileError> {
        if !self.filter.matches(raw_id) {
            return Ok(None);
        }
        let fname = trim_query(raw_id);
        if !self.filter.matches_extension(fname) {
            return Ok(None);
        }

        let key = self.module_key(raw_id);

        // Under a managed server repeated transform requests for the same
        // module are served from the cache; the update driver evicts the
        // entry first when it needs a real recompilation.
        if self.mode.serve_context().is_some()
            && let Some(cached) = self.cache.get_module(&key)
        {
            return Ok(Some(cached.clone()));
        }

        // Preprocess
        let filename = PathBuf::from(fname);
        let mut code = source.to_string();
        let mut sourcemap = None;
        let mut dependencies = Vec::new();
        for preprocessor in &self.preprocessors {
            let processed = preprocessor.preprocess(&code, &filename)?;
            dependencies.extend(processed.dependencies);
            if processed.map.is_some() {
                sourcemap = processed.map;
            }
            code = processed.code;
        }

        // Compile
        let options = CompileOptions {
            filename,
            dev: self.resolved.dev,
            generate: if ssr { GenerateMode::Ssr } else { GenerateMode::Dom },
            inject_css: self.options.compiler.css.unwrap_or(false),
            sourcemap,
            css_hash: self.css_hash.clone(),
        };
        let compiled = self.compiler.compile(&code, &options)?;

        // Route warnings
        for warning in &compiled.warnings {
            if !self.resolved.emit_css && warning.code == CSS_UNUSED_WARNING {
                continue;
            }
            self.deliver_warning(warning);
        }

        let mut js_code = compiled.js_code;

        // Emit CSS to the virtual sibling; modules without styles still
        // own an (empty) entry so the sibling id stays resolvable.
        let mut css_code = String::new();
        if self.resolved.emit_css {
            let css_key = key.css_sibling();
            let css = compiled.css_code.unwrap_or_default();
            if !css.is_empty() {
                let specifier = serde_json::Value::String(css_key.as_str().to_owned());
                js_code.push_str(&format!("\nimport {specifier};\n"));
            }
            css_code = css.clone();
            self.cache.set_css(css_key, CssPayload::new(css));
        }

        // Hot bootstrap footer (client modules only)
        if self.resolved.hot && !ssr {
            js_code = hot::inject_bootstrap(&js_code, &key, self.resolved.no_reload);
        }

        let artifact = CompiledArtifact {
            js_code,
            js_map: compiled.js_map,
            css_code,
            warnings: compiled.warnings,
            dependencies,
        };
        self.cache.set_module(key, artifact.clone());
        Ok(Some(artifact))
    }
}

// =============================================================================
// Tests
// =============================================================================
