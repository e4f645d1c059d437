//! Numeric representation specializer
//!
//! Chooses the cheapest correct lowering for a numeric operand from its
//! static representation. Integers pass through, floats use the native
//! routine, and anything only known at render time goes through the portable
//! boxed helper. All three paths agree for every finite input.

use stencil_runtime::{owner, Repr, RoutineTable};
use stencil_types::SemanticType;

use crate::bytecode::{Expr, ExprBuilder, TypedExpr};
use crate::error::LowerResult;
use crate::method_ref::MethodRef;

/// Lowering strategy for one numeric operand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericPath {
    /// Already an integer: no work
    PassThrough,
    /// Native float routine, then truncate into an integer
    Native,
    /// Boxed runtime helper
    Dynamic,
}

/// Pick the path for an operand of representation `repr`
///
/// With numeric specialization disabled every operand takes the dynamic path.
pub fn select_path(repr: Repr, specialize: bool) -> NumericPath {
    match repr {
        Repr::Int64 if specialize => NumericPath::PassThrough,
        Repr::Float64 if specialize => NumericPath::Native,
        _ => NumericPath::Dynamic,
    }
}

/// Rounds a number to an integer (`ceil`, `floor`) along the three paths
#[derive(Debug, Clone)]
pub struct RoundingSpecializer {
    native: MethodRef,
    dynamic: MethodRef,
}

impl RoundingSpecializer {
    /// Resolve `Math.<routine>(f64)` and `BasicRuntime.<routine>(value)`
    pub fn resolve(table: &RoutineTable, routine: &str) -> LowerResult<Self> {
        Ok(Self {
            native: MethodRef::resolve(table, owner::MATH, routine, &[Repr::Float64])?.as_cheap(),
            dynamic: MethodRef::resolve(table, owner::BASIC, routine, &[Repr::Boxed])?,
        })
    }

    pub fn native(&self) -> &MethodRef {
        &self.native
    }

    pub fn dynamic(&self) -> &MethodRef {
        &self.dynamic
    }

    /// Lower `routine(arg)` to an integer-valued expression
    pub fn lower(&self, builder: &mut ExprBuilder<'_>, arg: TypedExpr) -> LowerResult<TypedExpr> {
        let path = select_path(arg.repr(), builder.config().bytecode.specialize_numeric);
        tracing::trace!(
            function = builder.function(),
            repr = %arg.repr(),
            path = ?path,
            "numeric specialization"
        );
        let expr = match path {
            NumericPath::PassThrough => arg.expr,
            NumericPath::Native => {
                // the native routine already produced an integral value
                let rounded = builder.invoke(&self.native, vec![arg.expr])?;
                Expr::Convert {
                    value: Box::new(rounded),
                    to: Repr::Int64,
                }
            }
            NumericPath::Dynamic => builder.invoke(&self.dynamic, vec![arg.expr])?,
        };
        Ok(TypedExpr::new(expr, SemanticType::Int))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoweringConfig;

    #[test]
    fn test_select_path() {
        assert_eq!(select_path(Repr::Int64, true), NumericPath::PassThrough);
        assert_eq!(select_path(Repr::Float64, true), NumericPath::Native);
        assert_eq!(select_path(Repr::Boxed, true), NumericPath::Dynamic);
        assert_eq!(select_path(Repr::Int64, false), NumericPath::Dynamic);
        assert_eq!(select_path(Repr::Float64, false), NumericPath::Dynamic);
    }

    #[test]
    fn test_lower_paths() {
        let table = RoutineTable::standard();
        let ceil = RoundingSpecializer::resolve(&table, "ceil").unwrap();
        let config = LoweringConfig::default();
        let mut builder = ExprBuilder::new("ceiling", &config, &[]);

        let int_arg = TypedExpr::arg(0, Repr::Int64, SemanticType::Int);
        let lowered = ceil.lower(&mut builder, int_arg.clone()).unwrap();
        assert_eq!(lowered.expr, int_arg.expr);

        let float_arg = TypedExpr::arg(0, Repr::Float64, SemanticType::Float);
        let lowered = ceil.lower(&mut builder, float_arg).unwrap();
        assert_eq!(
            lowered.expr.to_string(),
            "(convert i64 (Math.ceil arg0:f64))"
        );
        assert_eq!(lowered.repr(), Repr::Int64);

        let boxed_arg = TypedExpr::arg(0, Repr::Boxed, SemanticType::Number);
        let lowered = ceil.lower(&mut builder, boxed_arg).unwrap();
        assert_eq!(lowered.expr.to_string(), "(BasicRuntime.ceil arg0:value)");
        assert_eq!(lowered.ty, SemanticType::Int);
    }

    #[test]
    fn test_unknown_routine_is_configuration_error() {
        let table = RoutineTable::standard();
        assert!(RoundingSpecializer::resolve(&table, "round").is_err());
    }
}
