//! Per-backend lowering capabilities
//!
//! A plugin implements any subset of the four capability traits. The
//! [`Capabilities`] record attached to a function holds one optional trait
//! object per backend; dispatch checks presence, never the plugin's type.

use std::fmt;
use std::sync::Arc;

use crate::bytecode::{ExprBuilder, TypedExpr};
use crate::config::LoweringConfig;
use crate::deferred::{DeferredValue, ValueFactory};
use crate::error::LowerResult;
use crate::text::{JsExpr, PyExpr};

/// A code generation target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    /// Expression trees for the bytecode emitter
    Bytecode,
    /// JavaScript source text
    JsText,
    /// Python source text
    PyText,
    /// Portable deferred-call descriptions
    GenericCall,
}

impl Backend {
    pub const ALL: [Backend; 4] = [
        Backend::Bytecode,
        Backend::JsText,
        Backend::PyText,
        Backend::GenericCall,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Backend::Bytecode => "bytecode",
            Backend::JsText => "js",
            Backend::PyText => "python",
            Backend::GenericCall => "generic-call",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Read-only facts about the call being lowered
#[derive(Debug, Clone, Copy)]
pub struct LoweringContext<'a> {
    pub function: &'a str,
    pub config: &'a LoweringConfig,
}

impl<'a> LoweringContext<'a> {
    pub fn new(function: &'a str, config: &'a LoweringConfig) -> Self {
        Self { function, config }
    }
}

/// Lowers a call into a bytecode expression tree
///
/// Arguments arrive already lowered, with their static representations
/// known; implementations may branch on them.
pub trait BytecodeLowering: Send + Sync {
    fn lower(&self, builder: &mut ExprBuilder<'_>, args: Vec<TypedExpr>) -> LowerResult<TypedExpr>;
}

/// Lowers a call into JavaScript text
pub trait JsTextLowering: Send + Sync {
    fn lower(&self, ctx: &LoweringContext<'_>, args: &[JsExpr]) -> LowerResult<JsExpr>;

    /// Libraries the generated text references (e.g. `goog.array`)
    fn required_libraries(&self, _ctx: &LoweringContext<'_>, _args: &[JsExpr]) -> Vec<String> {
        Vec::new()
    }
}

/// Lowers a call into Python text
pub trait PyTextLowering: Send + Sync {
    fn lower(&self, ctx: &LoweringContext<'_>, args: &[PyExpr]) -> LowerResult<PyExpr>;

    /// Modules the generated text references (e.g. `math`)
    fn required_modules(&self, _ctx: &LoweringContext<'_>, _args: &[PyExpr]) -> Vec<String> {
        Vec::new()
    }
}

/// Describes a call through the value factory
///
/// One implementation serves every bytecode target: the result is
/// materialized by the backend.
pub trait GenericCallLowering: Send + Sync {
    fn lower(
        &self,
        factory: &ValueFactory<'_>,
        args: Vec<DeferredValue>,
        ctx: &LoweringContext<'_>,
    ) -> LowerResult<DeferredValue>;
}

/// The capabilities one function provides
#[derive(Clone, Default)]
pub struct Capabilities {
    bytecode: Option<Arc<dyn BytecodeLowering>>,
    js: Option<Arc<dyn JsTextLowering>>,
    python: Option<Arc<dyn PyTextLowering>>,
    generic: Option<Arc<dyn GenericCallLowering>>,
}

impl Capabilities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every capability, provided by one plugin
    pub fn all<P>(plugin: Arc<P>) -> Self
    where
        P: BytecodeLowering + JsTextLowering + PyTextLowering + GenericCallLowering + 'static,
    {
        Self::new()
            .with_bytecode(plugin.clone())
            .with_js(plugin.clone())
            .with_python(plugin.clone())
            .with_generic(plugin)
    }

    pub fn with_bytecode(mut self, capability: Arc<dyn BytecodeLowering>) -> Self {
        self.bytecode = Some(capability);
        self
    }

    pub fn with_js(mut self, capability: Arc<dyn JsTextLowering>) -> Self {
        self.js = Some(capability);
        self
    }

    pub fn with_python(mut self, capability: Arc<dyn PyTextLowering>) -> Self {
        self.python = Some(capability);
        self
    }

    pub fn with_generic(mut self, capability: Arc<dyn GenericCallLowering>) -> Self {
        self.generic = Some(capability);
        self
    }

    pub fn bytecode(&self) -> Option<&dyn BytecodeLowering> {
        self.bytecode.as_deref()
    }

    pub fn js(&self) -> Option<&dyn JsTextLowering> {
        self.js.as_deref()
    }

    pub fn python(&self) -> Option<&dyn PyTextLowering> {
        self.python.as_deref()
    }

    pub fn generic(&self) -> Option<&dyn GenericCallLowering> {
        self.generic.as_deref()
    }

    /// Is a capability present for `backend`?
    pub fn supports(&self, backend: Backend) -> bool {
        match backend {
            Backend::Bytecode => self.bytecode.is_some(),
            Backend::JsText => self.js.is_some(),
            Backend::PyText => self.python.is_some(),
            Backend::GenericCall => self.generic.is_some(),
        }
    }

    /// Backends with a capability present
    pub fn supported(&self) -> Vec<Backend> {
        Backend::ALL
            .into_iter()
            .filter(|b| self.supports(*b))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.supported().is_empty()
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.supported()).finish()
    }
}
