//! Lowering configuration (stencil.toml)
//!
//! Names of the external libraries and helpers the text backends reference,
//! plus switches for the bytecode backend. Loaded once and frozen into the
//! function registry.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level lowering configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoweringConfig {
    #[serde(default)]
    pub js: JsConfig,

    #[serde(default)]
    pub python: PythonConfig,

    #[serde(default)]
    pub bytecode: BytecodeConfig,
}

/// JavaScript text backend settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsConfig {
    /// Library providing `range(start, end, step)` (default: "goog.array")
    #[serde(default = "default_js_range_library")]
    pub range_library: String,

    /// Library holding Stencil's own JS helpers (default: "stencil.runtime")
    #[serde(default = "default_js_runtime_library")]
    pub runtime_library: String,
}

fn default_js_range_library() -> String {
    "goog.array".to_string()
}

fn default_js_runtime_library() -> String {
    "stencil.runtime".to_string()
}

impl Default for JsConfig {
    fn default() -> Self {
        Self {
            range_library: default_js_range_library(),
            runtime_library: default_js_runtime_library(),
        }
    }
}

/// Python text backend settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PythonConfig {
    /// Builtin used for integer ranges (default: "range")
    #[serde(default = "default_py_range_builtin")]
    pub range_builtin: String,
}

fn default_py_range_builtin() -> String {
    "range".to_string()
}

impl Default for PythonConfig {
    fn default() -> Self {
        Self {
            range_builtin: default_py_range_builtin(),
        }
    }
}

/// Bytecode backend settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BytecodeConfig {
    /// Use unboxed fast paths when an operand's representation is known
    #[serde(default = "default_true")]
    pub specialize_numeric: bool,
}

fn default_true() -> bool {
    true
}

impl Default for BytecodeConfig {
    fn default() -> Self {
        Self {
            specialize_numeric: true,
        }
    }
}

impl LoweringConfig {
    /// Parse from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Serialize to TOML text
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
