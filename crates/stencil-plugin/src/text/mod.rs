//! Text backends (JavaScript and Python)

pub mod js;
pub mod precedence;
pub mod py;

pub use js::JsExpr;
pub use precedence::{Associativity, GeneratedExpression, Operator, Precedence};
pub use py::{PyExpr, PyFunctionExprBuilder};
