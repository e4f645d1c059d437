//! Lowered expression trees
//!
//! Every node knows its physical representation statically. Plugins build
//! trees out of the call-site argument trees they are handed; the emitter
//! later linearizes them into a [`Chunk`](super::Chunk).

use std::fmt;

use stencil_runtime::{Repr, Slot, Value};
use stencil_types::SemanticType;

use crate::error::{LowerError, LowerResult};
use crate::method_ref::MethodRef;

/// Numeric comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CmpOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl CmpOp {
    pub fn symbol(self) -> &'static str {
        match self {
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
        }
    }

    /// Apply to an already-computed ordering
    pub fn holds(self, ordering: Option<std::cmp::Ordering>) -> bool {
        use std::cmp::Ordering::*;
        match (self, ordering) {
            (CmpOp::Ne, None) => true,
            (_, None) => false,
            (CmpOp::Lt, Some(o)) => o == Less,
            (CmpOp::Le, Some(o)) => o != Greater,
            (CmpOp::Gt, Some(o)) => o == Greater,
            (CmpOp::Ge, Some(o)) => o != Less,
            (CmpOp::Eq, Some(o)) => o == Equal,
            (CmpOp::Ne, Some(o)) => o != Equal,
        }
    }
}

/// A lowered expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Constant slot
    Const(Slot),

    /// Call-site argument
    Arg { index: u16, repr: Repr },

    /// Local bound by an enclosing `Let`
    Local { index: u16, repr: Repr },

    /// Call of a resolved routine; arguments already match its parameters
    Invoke { method: MethodRef, args: Vec<Expr> },

    /// Numeric conversion between native representations
    Convert { value: Box<Expr>, to: Repr },

    /// Box a native value
    BoxValue(Box<Expr>),

    /// Unbox into a native representation
    Unbox { value: Box<Expr>, to: Repr },

    /// Boxed list of boxed elements
    NewList(Vec<Expr>),

    /// Evaluate `value` once into local `index`, then evaluate `body`
    Let {
        index: u16,
        value: Box<Expr>,
        body: Box<Expr>,
    },

    /// `cond ? then : otherwise`; both branches share a representation
    Select {
        cond: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },

    /// Numeric comparison of two operands of the same native representation
    Compare {
        op: CmpOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },

    /// Is a boxed value null or undefined?
    IsNull(Box<Expr>),

    /// Boolean negation
    Not(Box<Expr>),
}

impl Expr {
    pub fn int(value: i64) -> Self {
        Expr::Const(Slot::Int64(value))
    }

    pub fn float(value: f64) -> Self {
        Expr::Const(Slot::Float64(value))
    }

    pub fn bool(value: bool) -> Self {
        Expr::Const(Slot::Bool(value))
    }

    pub fn null() -> Self {
        Expr::Const(Slot::Boxed(Value::Null))
    }

    /// Static representation of the value this expression produces
    pub fn repr(&self) -> Repr {
        match self {
            Expr::Const(slot) => slot.repr(),
            Expr::Arg { repr, .. } | Expr::Local { repr, .. } => *repr,
            Expr::Invoke { method, .. } => method.ret(),
            Expr::Convert { to, .. } | Expr::Unbox { to, .. } => *to,
            Expr::BoxValue(_) | Expr::NewList(_) => Repr::Boxed,
            Expr::Let { body, .. } => body.repr(),
            Expr::Select { then, .. } => then.repr(),
            Expr::Compare { .. } | Expr::IsNull(_) | Expr::Not(_) => Repr::Bool,
        }
    }

    /// Can this expression be evaluated more than once instead of being
    /// bound to a local?
    pub fn is_cheap(&self) -> bool {
        match self {
            Expr::Const(_) | Expr::Arg { .. } | Expr::Local { .. } => true,
            Expr::Invoke { method, args } => method.is_cheap() && args.iter().all(Expr::is_cheap),
            Expr::Convert { value, .. } | Expr::Unbox { value, .. } | Expr::BoxValue(value) => {
                value.is_cheap()
            }
            _ => false,
        }
    }

    /// The integer this expression folds to, if it is a constant
    pub fn as_int_constant(&self) -> Option<i64> {
        match self {
            Expr::Const(Slot::Int64(v)) => Some(*v),
            Expr::Const(Slot::Boxed(Value::Int(v))) => Some(*v),
            Expr::Const(Slot::Float64(v)) if v.fract() == 0.0 => Some(*v as i64),
            Expr::BoxValue(value) | Expr::Convert { value, .. } | Expr::Unbox { value, .. } => {
                value.as_int_constant()
            }
            _ => None,
        }
    }

    /// Coerce to `to`, folding constants where the conversion is exact
    pub fn coerce(self, to: Repr) -> LowerResult<Expr> {
        let from = self.repr();
        if from == to {
            return Ok(self);
        }
        if let Expr::Const(slot) = &self {
            if let Ok(folded) = slot.clone().convert(to) {
                return Ok(Expr::Const(folded));
            }
        }
        match (from, to) {
            (_, Repr::Boxed) => Ok(Expr::BoxValue(Box::new(self))),
            (Repr::Boxed, to) => Ok(Expr::Unbox {
                value: Box::new(self),
                to,
            }),
            (from, to) if from.is_native_numeric() && to.is_native_numeric() => Ok(Expr::Convert {
                value: Box::new(self),
                to,
            }),
            (from, to) => Err(LowerError::internal(format!(
                "cannot coerce {} to {}",
                from, to
            ))),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Const(Slot::Int64(v)) => write!(f, "{}", v),
            Expr::Const(Slot::Float64(v)) => write!(f, "{:?}", v),
            Expr::Const(Slot::Bool(v)) => write!(f, "{}", v),
            Expr::Const(Slot::Boxed(v)) => write!(f, "(box {})", v),
            Expr::Arg { index, repr } => write!(f, "arg{}:{}", index, repr),
            Expr::Local { index, repr } => write!(f, "local{}:{}", index, repr),
            Expr::Invoke { method, args } => {
                write!(f, "({}", method)?;
                for arg in args {
                    write!(f, " {}", arg)?;
                }
                write!(f, ")")
            }
            Expr::Convert { value, to } => write!(f, "(convert {} {})", to, value),
            Expr::BoxValue(value) => write!(f, "(box {})", value),
            Expr::Unbox { value, to } => write!(f, "(unbox {} {})", to, value),
            Expr::NewList(items) => {
                write!(f, "(list")?;
                for item in items {
                    write!(f, " {}", item)?;
                }
                write!(f, ")")
            }
            Expr::Let { index, value, body } => {
                write!(f, "(let local{} {} {})", index, value, body)
            }
            Expr::Select {
                cond,
                then,
                otherwise,
            } => write!(f, "(select {} {} {})", cond, then, otherwise),
            Expr::Compare { op, lhs, rhs } => write!(f, "({} {} {})", op.symbol(), lhs, rhs),
            Expr::IsNull(value) => write!(f, "(null? {})", value),
            Expr::Not(value) => write!(f, "(not {})", value),
        }
    }
}

// ============================================================================
// Typed expressions
// ============================================================================

/// A lowered expression together with its semantic type
///
/// This is what call sites hand to plugins and what plugins hand back.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedExpr {
    pub expr: Expr,
    pub ty: SemanticType,
}

impl TypedExpr {
    pub fn new(expr: Expr, ty: SemanticType) -> Self {
        Self { expr, ty }
    }

    /// Call-site argument `index` with a known representation
    pub fn arg(index: u16, repr: Repr, ty: SemanticType) -> Self {
        Self::new(Expr::Arg { index, repr }, ty)
    }

    pub fn for_int(value: i64) -> Self {
        Self::new(Expr::int(value), SemanticType::Int)
    }

    pub fn for_float(value: f64) -> Self {
        Self::new(Expr::float(value), SemanticType::Float)
    }

    pub fn for_bool(value: bool) -> Self {
        Self::new(Expr::bool(value), SemanticType::Bool)
    }

    pub fn null() -> Self {
        Self::new(Expr::null(), SemanticType::Null)
    }

    pub fn repr(&self) -> Repr {
        self.expr.repr()
    }

    /// Coerce the expression, keeping the semantic type
    pub fn coerce(self, to: Repr) -> LowerResult<TypedExpr> {
        Ok(Self::new(self.expr.coerce(to)?, self.ty))
    }

    /// Replace the semantic type
    pub fn with_type(self, ty: SemanticType) -> Self {
        Self { ty, ..self }
    }

    pub fn into_expr(self) -> Expr {
        self.expr
    }
}

impl fmt::Display for TypedExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {}", self.expr, self.ty)
    }
}
