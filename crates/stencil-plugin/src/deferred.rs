//! Deferred values
//!
//! Generic-call plugins describe *what* to call through a [`ValueFactory`]
//! and get back a [`DeferredValue`]. Nothing is emitted at that point; the
//! bytecode backend materializes the finished description into an
//! [`Expr`] tree, choosing the boxing and conversions itself.

use stencil_runtime::{Repr, Slot, Value};
use stencil_types::SemanticType;

use crate::bytecode::{Expr, TypedExpr};
use crate::error::{LowerError, LowerResult};
use crate::method_ref::MethodRef;

/// A symbolic, not-yet-materialized value
#[derive(Debug, Clone, PartialEq)]
pub enum DeferredValue {
    /// An already-lowered call-site argument
    Leaf(TypedExpr),
    /// A literal
    Constant(Slot),
    /// Call of a resolved routine
    Call {
        method: MethodRef,
        args: Vec<DeferredValue>,
    },
    /// Boxed list construction
    List(Vec<DeferredValue>),
}

impl DeferredValue {
    /// Integer this value folds to, when it is a literal or a literal leaf
    pub fn as_int_constant(&self) -> Option<i64> {
        match self {
            DeferredValue::Leaf(leaf) => leaf.expr.as_int_constant(),
            DeferredValue::Constant(slot) => Expr::Const(slot.clone()).as_int_constant(),
            _ => None,
        }
    }

    /// Turn the description into an expression tree
    ///
    /// Call arguments are coerced to the routine's declared parameter
    /// representations, list elements are boxed.
    pub fn materialize(self) -> LowerResult<TypedExpr> {
        match self {
            DeferredValue::Leaf(expr) => Ok(expr),
            DeferredValue::Constant(slot) => {
                let ty = type_of_repr(slot.repr());
                Ok(TypedExpr::new(Expr::Const(slot), ty))
            }
            DeferredValue::Call { method, args } => {
                let args = args
                    .into_iter()
                    .zip(method.params())
                    .map(|(arg, repr)| arg.materialize()?.expr.coerce(*repr))
                    .collect::<LowerResult<Vec<_>>>()?;
                tracing::trace!(method = %method, "materialized call");
                let ty = type_of_repr(method.ret());
                Ok(TypedExpr::new(method.invoke(args)?, ty))
            }
            DeferredValue::List(items) => {
                let mut element_types = Vec::with_capacity(items.len());
                let mut elements = Vec::with_capacity(items.len());
                for item in items {
                    let item = item.materialize()?;
                    element_types.push(item.ty);
                    elements.push(item.expr.coerce(Repr::Boxed)?);
                }
                let element = match element_types.split_first() {
                    Some((first, rest)) if rest.iter().all(|t| t == first) => first.clone(),
                    _ => SemanticType::Unknown,
                };
                Ok(TypedExpr::new(
                    Expr::NewList(elements),
                    SemanticType::list_of(element),
                ))
            }
        }
    }
}

impl From<TypedExpr> for DeferredValue {
    fn from(expr: TypedExpr) -> Self {
        DeferredValue::Leaf(expr)
    }
}

fn type_of_repr(repr: Repr) -> SemanticType {
    match repr {
        Repr::Int64 => SemanticType::Int,
        Repr::Float64 => SemanticType::Float,
        Repr::Bool => SemanticType::Bool,
        Repr::Boxed => SemanticType::Unknown,
    }
}

// ============================================================================
// Factory
// ============================================================================

/// Builds deferred values for one call site
///
/// Only available while a generic-call capability is lowering; checks the
/// arity of every call it builds and that runtime routines target a runtime
/// registered for the function.
pub struct ValueFactory<'a> {
    function: &'a str,
    runtimes: &'a [String],
}

impl<'a> ValueFactory<'a> {
    pub fn new(function: &'a str, runtimes: &'a [String]) -> Self {
        Self { function, runtimes }
    }

    /// Call a static routine
    pub fn call_static_routine(
        &self,
        method: &MethodRef,
        args: Vec<DeferredValue>,
    ) -> LowerResult<DeferredValue> {
        if method.is_instance() {
            return Err(LowerError::internal(format!(
                "{} is an instance routine; use call_runtime_routine",
                method
            )));
        }
        self.call(method, args)
    }

    /// Call an instance routine on the runtime object registered for this
    /// function
    pub fn call_runtime_routine(
        &self,
        method: &MethodRef,
        args: Vec<DeferredValue>,
    ) -> LowerResult<DeferredValue> {
        if !method.is_instance() {
            return Err(LowerError::internal(format!(
                "{} is a static routine; use call_static_routine",
                method
            )));
        }
        if !self.runtimes.iter().any(|r| r == method.owner()) {
            return Err(LowerError::UnregisteredRuntime {
                function: self.function.to_string(),
                owner: method.owner().to_string(),
            });
        }
        self.call(method, args)
    }

    /// Build a list; elements are boxed on materialization
    pub fn list_of(&self, args: Vec<DeferredValue>) -> DeferredValue {
        DeferredValue::List(args)
    }

    pub fn constant(&self, slot: Slot) -> DeferredValue {
        DeferredValue::Constant(slot)
    }

    pub fn int(&self, value: i64) -> DeferredValue {
        DeferredValue::Constant(Slot::Int64(value))
    }

    pub fn null(&self) -> DeferredValue {
        DeferredValue::Constant(Slot::Boxed(Value::Null))
    }

    /// Name of the function being lowered
    pub fn function(&self) -> &str {
        self.function
    }

    fn call(&self, method: &MethodRef, args: Vec<DeferredValue>) -> LowerResult<DeferredValue> {
        if args.len() != method.arity() {
            return Err(LowerError::ArityMismatch {
                name: method.to_string(),
                expected: method.arity().to_string(),
                actual: args.len(),
            });
        }
        Ok(DeferredValue::Call {
            method: method.clone(),
            args,
        })
    }
}
