//! Compiler warning type and routing policy.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Position;

/// Warning code for selectors the compiler proved unused.
///
/// Suppressed when virtual CSS emission is off: with compiler-injected
/// styles the compiler cannot see consumers of the emitted stylesheet, so
/// the warning is noise.
pub const CSS_UNUSED_WARNING: &str = "css-unused-selector";

/// A single compiler warning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warning {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<WarningPosition>,
}

/// Serializable mirror of [`Position`] for warning payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningPosition {
    pub line: u32,
    pub column: u32,
}

impl From<Position> for WarningPosition {
    fn from(pos: Position) -> Self {
        Self {
            line: pos.line,
            column: pos.column,
        }
    }
}

impl Warning {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            position: None,
        }
    }

    pub fn at(mut self, line: u32, column: u32) -> Self {
        self.position = Some(WarningPosition { line, column });
        self
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.code)?;
        if let Some(pos) = self.position {
            write!(f, " at {}:{}", pos.line, pos.column)?;
        }
        Ok(())
    }
}
