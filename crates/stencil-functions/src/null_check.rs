//! `isNull(any) -> bool` and `isNonnull(any) -> bool`

use stencil_plugin::bytecode::{Expr, ExprBuilder, TypedExpr};
use stencil_plugin::text::{js, py, JsExpr, PyExpr};
use stencil_plugin::{
    BytecodeLowering, DeferredValue, GenericCallLowering, JsTextLowering, LowerResult,
    LoweringContext, MethodRef, PyTextLowering, ValueFactory,
};
use stencil_runtime::{owner, Repr, RoutineTable};
use stencil_types::{Overload, Purity, SemanticType, Signature, TypeResult};

use crate::args;

/// Null test, optionally negated
///
/// Only `isNull` has a generic-call lowering, backed by the
/// `BasicRuntime.isNull` routine; see [`NullCheck::has_generic`].
#[derive(Debug)]
pub struct NullCheck {
    name: &'static str,
    negated: bool,
    routine: MethodRef,
}

impl NullCheck {
    pub fn is_null(table: &RoutineTable) -> LowerResult<Self> {
        Self::resolve(table, "isNull", false)
    }

    pub fn is_nonnull(table: &RoutineTable) -> LowerResult<Self> {
        Self::resolve(table, "isNonnull", true)
    }

    fn resolve(table: &RoutineTable, name: &'static str, negated: bool) -> LowerResult<Self> {
        Ok(Self {
            name,
            negated,
            routine: MethodRef::resolve(table, owner::BASIC, "isNull", &[Repr::Boxed])?.as_cheap(),
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether the generic-call capability is offered
    pub fn has_generic(&self) -> bool {
        !self.negated
    }

    pub fn signature(&self) -> TypeResult<Signature> {
        Signature::new(
            self.name,
            vec![Overload::parse(&["any"], "bool")?],
            Purity::Pure,
        )
    }
}

impl BytecodeLowering for NullCheck {
    fn lower(&self, builder: &mut ExprBuilder<'_>, args: Vec<TypedExpr>) -> LowerResult<TypedExpr> {
        let [arg] = args::take::<1, _>(self.name, args)?;
        let expr = if arg.repr() == Repr::Boxed {
            let test = Expr::IsNull(Box::new(arg.expr));
            if self.negated {
                Expr::Not(Box::new(test))
            } else {
                test
            }
        } else {
            // unboxed values are never null; keep the operand for its effects
            builder.cache(arg.expr)?.finish(Expr::bool(self.negated))
        };
        Ok(TypedExpr::new(expr, SemanticType::Bool))
    }
}

impl JsTextLowering for NullCheck {
    fn lower(&self, _ctx: &LoweringContext<'_>, args: &[JsExpr]) -> LowerResult<JsExpr> {
        let [arg] = args::borrow::<1, _>(self.name, args)?;
        Ok(if self.negated {
            js::is_not_null(arg)
        } else {
            js::is_null(arg)
        })
    }
}

impl PyTextLowering for NullCheck {
    fn lower(&self, _ctx: &LoweringContext<'_>, args: &[PyExpr]) -> LowerResult<PyExpr> {
        let [arg] = args::borrow::<1, _>(self.name, args)?;
        Ok(if self.negated {
            py::is_not_none(arg)
        } else {
            py::is_none(arg)
        })
    }
}

impl GenericCallLowering for NullCheck {
    fn lower(
        &self,
        factory: &ValueFactory<'_>,
        args: Vec<DeferredValue>,
        _ctx: &LoweringContext<'_>,
    ) -> LowerResult<DeferredValue> {
        factory.call_static_routine(&self.routine, args)
    }
}
