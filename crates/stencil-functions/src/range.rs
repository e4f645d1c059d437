//! `range(end)`, `range(start, end)`, `range(start, end, step)`
//!
//! Each arity maps to its own runtime routine. A step that is a literal zero
//! is rejected at compile time on every backend; JS additionally routes
//! non-literal steps through `checkedStep` so a zero step fails at render
//! time instead of looping. Python's builtin already raises on a zero step.

use stencil_plugin::bytecode::{ExprBuilder, TypedExpr};
use stencil_plugin::text::{js, py, JsExpr, PyExpr};
use stencil_plugin::{
    BytecodeLowering, DeferredValue, GenericCallLowering, JsTextLowering, LowerError, LowerResult,
    LoweringContext, MethodRef, PyTextLowering, ValueFactory,
};
use stencil_runtime::{owner, Repr, RoutineTable};
use stencil_types::{Overload, Purity, SemanticType, Signature, TypeResult};

use crate::args;

pub const NAME: &str = "range";

/// Integer sequence generation
#[derive(Debug)]
pub struct RangeFunction {
    /// Routine for arity `i + 1`
    routines: [MethodRef; 3],
}

impl RangeFunction {
    pub fn new(table: &RoutineTable) -> LowerResult<Self> {
        use Repr::Int64;
        Ok(Self {
            routines: [
                MethodRef::resolve(table, owner::BASIC, NAME, &[Int64])?,
                MethodRef::resolve(table, owner::BASIC, NAME, &[Int64, Int64])?,
                MethodRef::resolve(table, owner::BASIC, NAME, &[Int64, Int64, Int64])?,
            ],
        })
    }

    pub fn signature(&self) -> TypeResult<Signature> {
        let list = || SemanticType::list_of(SemanticType::Int);
        Signature::new(
            NAME,
            vec![
                Overload::parse(&["number"], "list<int>")?,
                Overload::parse(&["number", "number"], "list<int>")?,
                Overload::new(vec![SemanticType::Number; 3], list()),
            ],
            Purity::Pure,
        )
    }

    /// The routine specialized for `arity` arguments
    pub fn routine(&self, arity: usize) -> LowerResult<&MethodRef> {
        arity
            .checked_sub(1)
            .and_then(|i| self.routines.get(i))
            .ok_or_else(|| LowerError::internal(format!("no range routine for arity {}", arity)))
    }
}

fn zero_step() -> LowerError {
    LowerError::invalid_argument(NAME, "step must be non-zero")
}

/// Reject a literal zero step, if the step is present
fn check_step(step: Option<i64>) -> LowerResult<()> {
    match step {
        Some(0) => Err(zero_step()),
        _ => Ok(()),
    }
}

impl BytecodeLowering for RangeFunction {
    fn lower(&self, builder: &mut ExprBuilder<'_>, args: Vec<TypedExpr>) -> LowerResult<TypedExpr> {
        args::between(NAME, &args, 1, 3)?;
        if args.len() == 3 {
            check_step(args[2].expr.as_int_constant())?;
        }
        let method = self.routine(args.len())?;
        let args = args.into_iter().map(TypedExpr::into_expr).collect();
        let expr = builder.invoke(method, args)?;
        Ok(TypedExpr::new(expr, SemanticType::list_of(SemanticType::Int)))
    }
}

impl GenericCallLowering for RangeFunction {
    fn lower(
        &self,
        factory: &ValueFactory<'_>,
        args: Vec<DeferredValue>,
        _ctx: &LoweringContext<'_>,
    ) -> LowerResult<DeferredValue> {
        args::between(NAME, &args, 1, 3)?;
        if args.len() == 3 {
            check_step(args[2].as_int_constant())?;
        }
        factory.call_static_routine(self.routine(args.len())?, args)
    }
}

impl JsTextLowering for RangeFunction {
    fn lower(&self, ctx: &LoweringContext<'_>, args: &[JsExpr]) -> LowerResult<JsExpr> {
        args::between(NAME, args, 1, 3)?;
        let callee = format!("{}.range", ctx.config.js.range_library);
        match args {
            [start, end, step] => {
                let step = match step.as_integer_literal() {
                    Some(0) => return Err(zero_step()),
                    Some(_) => step.clone(),
                    None => js::call(&checked_step(ctx), std::slice::from_ref(step)),
                };
                Ok(js::call(&callee, &[start.clone(), end.clone(), step]))
            }
            _ => Ok(js::call(&callee, args)),
        }
    }

    fn required_libraries(&self, ctx: &LoweringContext<'_>, args: &[JsExpr]) -> Vec<String> {
        let mut libraries = vec![ctx.config.js.range_library.clone()];
        if let [_, _, step] = args {
            if step.as_integer_literal().is_none() {
                libraries.push(ctx.config.js.runtime_library.clone());
            }
        }
        libraries
    }
}

fn checked_step(ctx: &LoweringContext<'_>) -> String {
    format!("{}.checkedStep", ctx.config.js.runtime_library)
}

impl PyTextLowering for RangeFunction {
    fn lower(&self, ctx: &LoweringContext<'_>, args: &[PyExpr]) -> LowerResult<PyExpr> {
        args::between(NAME, args, 1, 3)?;
        if let [_, _, step] = args {
            check_step(step.as_integer_literal())?;
        }
        let range = py::call(&ctx.config.python.range_builtin, args);
        Ok(py::call("list", &[range]))
    }
}
