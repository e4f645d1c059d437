//! `ceiling(number) -> int` and `floor(number) -> int`

use stencil_plugin::bytecode::{ExprBuilder, TypedExpr};
use stencil_plugin::text::{js, py, JsExpr, PyExpr};
use stencil_plugin::{
    BytecodeLowering, DeferredValue, GenericCallLowering, JsTextLowering, LowerResult,
    LoweringContext, PyTextLowering, RoundingSpecializer, ValueFactory,
};
use stencil_runtime::RoutineTable;
use stencil_types::{Overload, Purity, SemanticType, Signature, TypeResult};

use crate::args;

/// Rounds a number up or down to an integer
#[derive(Debug)]
pub struct RoundingFunction {
    name: &'static str,
    specializer: RoundingSpecializer,
    /// `Math.ceil` / `Math.floor`
    js_callee: &'static str,
    /// `math.ceil` / `math.floor`
    py_callee: &'static str,
}

impl RoundingFunction {
    pub fn ceiling(table: &RoutineTable) -> LowerResult<Self> {
        Ok(Self {
            name: "ceiling",
            specializer: RoundingSpecializer::resolve(table, "ceil")?,
            js_callee: "Math.ceil",
            py_callee: "math.ceil",
        })
    }

    pub fn floor(table: &RoutineTable) -> LowerResult<Self> {
        Ok(Self {
            name: "floor",
            specializer: RoundingSpecializer::resolve(table, "floor")?,
            js_callee: "Math.floor",
            py_callee: "math.floor",
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn signature(&self) -> TypeResult<Signature> {
        Signature::new(
            self.name,
            vec![Overload::new(vec![SemanticType::Number], SemanticType::Int)],
            Purity::Pure,
        )
    }
}

impl BytecodeLowering for RoundingFunction {
    fn lower(&self, builder: &mut ExprBuilder<'_>, args: Vec<TypedExpr>) -> LowerResult<TypedExpr> {
        let [arg] = args::take::<1, _>(self.name, args)?;
        self.specializer.lower(builder, arg)
    }
}

impl JsTextLowering for RoundingFunction {
    fn lower(&self, _ctx: &LoweringContext<'_>, args: &[JsExpr]) -> LowerResult<JsExpr> {
        let [arg] = args::borrow::<1, _>(self.name, args)?;
        Ok(js::call(self.js_callee, std::slice::from_ref(arg)))
    }
}

impl PyTextLowering for RoundingFunction {
    fn lower(&self, _ctx: &LoweringContext<'_>, args: &[PyExpr]) -> LowerResult<PyExpr> {
        let [arg] = args::borrow::<1, _>(self.name, args)?;
        // math.ceil returns a float on Python 2
        let rounded = py::call(self.py_callee, std::slice::from_ref(arg));
        Ok(py::call("int", &[rounded]))
    }

    fn required_modules(&self, _ctx: &LoweringContext<'_>, _args: &[PyExpr]) -> Vec<String> {
        vec!["math".to_string()]
    }
}

impl GenericCallLowering for RoundingFunction {
    fn lower(
        &self,
        factory: &ValueFactory<'_>,
        args: Vec<DeferredValue>,
        _ctx: &LoweringContext<'_>,
    ) -> LowerResult<DeferredValue> {
        factory.call_static_routine(self.specializer.dynamic(), args)
    }
}
