//! Hot bootstrap injection.
//!
//! The transform pipeline appends this footer to every hot-capable
//! module. It is always appended, never interleaved, which is what lets
//! the semantic normalizer truncate at its first occurrence when
//! comparing generations.

use crate::core::ModuleKey;

/// Import specifier the footer uses to reach the client runtime; resolved
/// by [`Engine::resolve_id`](crate::engine::Engine::resolve_id).
pub const RUNTIME_ALIAS: &str = "cinder/runtime";

/// First fragment of the injected footer. The normalizer truncates
/// compiled output at this marker before comparing.
pub const BOOTSTRAP_IMPORT: &str = "import * as ___CINDER_HOT_API from";

/// Append the hot bootstrap footer to compiled module code.
pub fn inject_bootstrap(js_code: &str, key: &ModuleKey, no_reload: bool) -> String {
    let id = serde_json::Value::String(key.as_str().to_owned());
    format!(
        "{js_code}\n\
         {BOOTSTRAP_IMPORT} {RUNTIME_ALIAS:?};\n\
         ___CINDER_HOT_API.applyUpdate({{ id: {id}, noReload: {no_reload} }});\n"
    )
}
