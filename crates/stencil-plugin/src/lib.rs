//! Stencil Plugin Framework
//!
//! Lowers one declared plugin function into four backend artifacts:
//! - **Bytecode**: [`Expr`] trees, emitted into [`Chunk`]s and run by the [`Vm`]
//! - **JavaScript / Python text**: precedence-tagged [`GeneratedExpression`]s
//! - **Generic call**: [`DeferredValue`]s built through a [`ValueFactory`],
//!   materialized by the bytecode backend
//!
//! Functions are declared once into a [`FunctionRegistry`] together with
//! their [`Capabilities`]; the [`Lowerer`] validates each call site against
//! the signature and dispatches to the capability of the active backend.

#![warn(rust_2018_idioms)]

pub mod bytecode;
pub mod capability;
pub mod config;
pub mod deferred;
pub mod diagnostic;
pub mod error;
pub mod lower;
pub mod method_ref;
pub mod registry;
pub mod specialize;
pub mod text;

pub use bytecode::{emit, Cached, Chunk, CmpOp, Expr, ExprBuilder, TypedExpr, Vm, VmError};
pub use capability::{
    Backend, BytecodeLowering, Capabilities, GenericCallLowering, JsTextLowering, LoweringContext,
    PyTextLowering,
};
pub use config::{ConfigError, LoweringConfig};
pub use deferred::{DeferredValue, ValueFactory};
pub use diagnostic::{
    Checkpoint, Diagnostic, DiagnosticCollector, ErrorCode, ErrorReporter, SourceLocation,
};
pub use error::{ErrorClass, LowerError, LowerResult};
pub use lower::{BackendArgs, BackendArtifact, CallSite, Lowerer};
pub use method_ref::MethodRef;
pub use registry::{validate_call, FunctionEntry, FunctionRegistry, RegistryBuilder};
pub use specialize::{select_path, NumericPath, RoundingSpecializer};
pub use text::{GeneratedExpression, JsExpr, Precedence, PyExpr, PyFunctionExprBuilder};
