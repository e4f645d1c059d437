//! Bytecode backend
//!
//! Plugins lower calls into [`Expr`] trees, the emitter turns trees into
//! [`Chunk`]s and the [`Vm`] executes them.

pub mod builder;
pub mod emit;
pub mod expr;
pub mod vm;

pub use builder::{Cached, ExprBuilder};
pub use emit::{emit, Chunk, Instr};
pub use expr::{CmpOp, Expr, TypedExpr};
pub use vm::{Vm, VmError, VmResult};
