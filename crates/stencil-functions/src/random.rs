//! `randomInt(number) -> int`
//!
//! Uniform integer in `[0, n)`. The only impure function in the library; the
//! bytecode and generic-call lowerings call an instance routine on the
//! `RandomRuntime` registered for the function.

use stencil_plugin::bytecode::{ExprBuilder, TypedExpr};
use stencil_plugin::text::{js, py, JsExpr, PyExpr, PyFunctionExprBuilder};
use stencil_plugin::{
    BytecodeLowering, DeferredValue, GenericCallLowering, JsTextLowering, LowerError, LowerResult,
    LoweringContext, MethodRef, PyTextLowering, ValueFactory,
};
use stencil_runtime::{owner, Repr, RoutineTable};
use stencil_types::{Overload, Purity, SemanticType, Signature, TypeResult};

use crate::args;

pub const NAME: &str = "randomInt";

#[derive(Debug)]
pub struct RandomIntFunction {
    routine: MethodRef,
}

impl RandomIntFunction {
    pub fn new(table: &RoutineTable) -> LowerResult<Self> {
        Ok(Self {
            routine: MethodRef::resolve(table, owner::RANDOM, NAME, &[Repr::Int64])?,
        })
    }

    pub fn signature(&self) -> TypeResult<Signature> {
        Signature::new(
            NAME,
            vec![Overload::new(vec![SemanticType::Number], SemanticType::Int)],
            Purity::Impure,
        )
    }
}

fn check_bound(bound: Option<i64>) -> LowerResult<()> {
    match bound {
        Some(n) if n <= 0 => Err(LowerError::invalid_argument(
            NAME,
            format!("upper bound must be positive, got {}", n),
        )),
        _ => Ok(()),
    }
}

impl BytecodeLowering for RandomIntFunction {
    fn lower(&self, builder: &mut ExprBuilder<'_>, args: Vec<TypedExpr>) -> LowerResult<TypedExpr> {
        let [bound] = args::take::<1, _>(NAME, args)?;
        check_bound(bound.expr.as_int_constant())?;
        let expr = builder.invoke(&self.routine, vec![bound.expr])?;
        Ok(TypedExpr::new(expr, SemanticType::Int))
    }
}

impl JsTextLowering for RandomIntFunction {
    fn lower(&self, _ctx: &LoweringContext<'_>, args: &[JsExpr]) -> LowerResult<JsExpr> {
        let [bound] = args::borrow::<1, _>(NAME, args)?;
        check_bound(bound.as_integer_literal())?;
        let scaled = js::binary(&js::op::TIMES, &js::call("Math.random", &[]), bound);
        Ok(js::call("Math.floor", &[scaled]))
    }
}

impl PyTextLowering for RandomIntFunction {
    fn lower(&self, _ctx: &LoweringContext<'_>, args: &[PyExpr]) -> LowerResult<PyExpr> {
        let [bound] = args::borrow::<1, _>(NAME, args)?;
        check_bound(bound.as_integer_literal())?;
        let last = py::binary(&py::op::MINUS, bound, &py::integer(1));
        Ok(PyFunctionExprBuilder::new("random.randint")
            .add_arg(&py::integer(0))
            .add_arg(&last)
            .build())
    }

    fn required_modules(&self, _ctx: &LoweringContext<'_>, _args: &[PyExpr]) -> Vec<String> {
        vec!["random".to_string()]
    }
}

impl GenericCallLowering for RandomIntFunction {
    fn lower(
        &self,
        factory: &ValueFactory<'_>,
        args: Vec<DeferredValue>,
        _ctx: &LoweringContext<'_>,
    ) -> LowerResult<DeferredValue> {
        let [bound] = args::take::<1, _>(NAME, args)?;
        check_bound(bound.as_int_constant())?;
        factory.call_runtime_routine(&self.routine, vec![bound])
    }
}
