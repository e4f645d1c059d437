//! `max(number, number) -> number` and `min(number, number) -> number`
//!
//! When both operands share an unboxed numeric representation the bytecode
//! lowering selects between them inline; everything else goes through the
//! boxed runtime helper. Float selection ignores a NaN operand the same way
//! the helper does.

use stencil_plugin::bytecode::{CmpOp, Expr, ExprBuilder, TypedExpr};
use stencil_plugin::text::{js, py, JsExpr, PyExpr};
use stencil_plugin::{
    BytecodeLowering, DeferredValue, GenericCallLowering, JsTextLowering, LowerResult,
    LoweringContext, MethodRef, PyTextLowering, ValueFactory,
};
use stencil_runtime::{owner, Repr, RoutineTable};
use stencil_types::{Overload, Purity, SemanticType, Signature, TypeResult};

use crate::args;

#[derive(Debug)]
pub struct ExtremumFunction {
    name: &'static str,
    /// Comparison under which the first operand wins
    wins: CmpOp,
    dynamic: MethodRef,
}

impl ExtremumFunction {
    pub fn max(table: &RoutineTable) -> LowerResult<Self> {
        Self::resolve(table, "max", CmpOp::Gt)
    }

    pub fn min(table: &RoutineTable) -> LowerResult<Self> {
        Self::resolve(table, "min", CmpOp::Lt)
    }

    fn resolve(table: &RoutineTable, name: &'static str, wins: CmpOp) -> LowerResult<Self> {
        Ok(Self {
            name,
            wins,
            dynamic: MethodRef::resolve(table, owner::BASIC, name, &[Repr::Boxed, Repr::Boxed])?,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn signature(&self) -> TypeResult<Signature> {
        Signature::new(
            self.name,
            vec![Overload::parse(&["number", "number"], "number")?],
            Purity::Pure,
        )
    }

    /// `select(b wins over a, b, select(a is NaN, b, a))`
    fn select(&self, a: Expr, b: Expr, repr: Repr) -> Expr {
        let b_wins = Expr::Compare {
            op: self.wins,
            lhs: Box::new(b.clone()),
            rhs: Box::new(a.clone()),
        };
        let otherwise = if repr == Repr::Float64 {
            let a_is_nan = Expr::Compare {
                op: CmpOp::Ne,
                lhs: Box::new(a.clone()),
                rhs: Box::new(a.clone()),
            };
            Expr::Select {
                cond: Box::new(a_is_nan),
                then: Box::new(b.clone()),
                otherwise: Box::new(a),
            }
        } else {
            a
        };
        Expr::Select {
            cond: Box::new(b_wins),
            then: Box::new(b),
            otherwise: Box::new(otherwise),
        }
    }
}

fn result_type(a: &SemanticType, b: &SemanticType) -> SemanticType {
    if a == b && a.is_numeric() {
        a.clone()
    } else {
        SemanticType::Number
    }
}

impl BytecodeLowering for ExtremumFunction {
    fn lower(&self, builder: &mut ExprBuilder<'_>, args: Vec<TypedExpr>) -> LowerResult<TypedExpr> {
        let [a, b] = args::take::<2, _>(self.name, args)?;
        let ty = result_type(&a.ty, &b.ty);
        let repr = a.repr();
        if repr == b.repr() && builder.specializes(repr) {
            let a = builder.cache(a.expr)?;
            let b = builder.cache(b.expr)?;
            let body = self.select(a.reference(), b.reference(), repr);
            let expr = a.finish(b.finish(body));
            return Ok(TypedExpr::new(expr, ty));
        }
        let expr = builder.invoke(&self.dynamic, vec![a.expr, b.expr])?;
        Ok(TypedExpr::new(expr, ty))
    }
}

impl JsTextLowering for ExtremumFunction {
    fn lower(&self, _ctx: &LoweringContext<'_>, args: &[JsExpr]) -> LowerResult<JsExpr> {
        let pair = args::borrow::<2, _>(self.name, args)?;
        Ok(js::call(&format!("Math.{}", self.name), pair))
    }
}

impl PyTextLowering for ExtremumFunction {
    fn lower(&self, _ctx: &LoweringContext<'_>, args: &[PyExpr]) -> LowerResult<PyExpr> {
        let pair = args::borrow::<2, _>(self.name, args)?;
        Ok(py::call(self.name, pair))
    }
}

impl GenericCallLowering for ExtremumFunction {
    fn lower(
        &self,
        factory: &ValueFactory<'_>,
        args: Vec<DeferredValue>,
        _ctx: &LoweringContext<'_>,
    ) -> LowerResult<DeferredValue> {
        factory.call_static_routine(&self.dynamic, args)
    }
}
