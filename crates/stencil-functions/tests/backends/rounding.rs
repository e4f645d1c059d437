//! ceiling / floor

use stencil_functions::build_registry;
use stencil_plugin::text::{js, py};
use stencil_plugin::{JsExpr, LoweringConfig, PyExpr};
use stencil_runtime::{RoutineTable, Value};
use stencil_types::SemanticType;

use crate::harness::*;

const SAMPLES: [f64; 7] = [-3.7, -3.0, 0.0, 0.5, 3.0, 3.2, 9007199254740992.0];

#[test]
fn test_ceiling_agrees_across_paths() {
    let h = Harness::standard();
    for v in SAMPLES {
        let expected = Value::Int(v.ceil() as i64);

        let native = h.bytecode("ceiling", &[float(v)]).unwrap();
        assert_eq!(native, expected, "float path, ceiling({})", v);

        let dynamic = h
            .bytecode("ceiling", &[boxed(Value::Float(v), SemanticType::Number)])
            .unwrap();
        assert_eq!(dynamic, expected, "boxed path, ceiling({})", v);

        let generic = h.generic("ceiling", &[float(v)]).unwrap();
        assert_eq!(generic, expected, "generic call, ceiling({})", v);

        if v.fract() == 0.0 {
            let exact = h.bytecode("ceiling", &[int(v as i64)]).unwrap();
            assert_eq!(exact, expected, "int path, ceiling({})", v);
        }
    }
}

#[test]
fn test_floor_agrees_across_paths() {
    let h = Harness::standard();
    for v in SAMPLES {
        let expected = Value::Int(v.floor() as i64);
        assert_eq!(h.bytecode("floor", &[float(v)]).unwrap(), expected);
        assert_eq!(
            h.bytecode("floor", &[boxed(Value::Float(v), SemanticType::Number)])
                .unwrap(),
            expected
        );
        assert_eq!(h.generic("floor", &[float(v)]).unwrap(), expected);
    }
}

#[test]
fn test_ceiling_without_specialization() {
    let mut config = LoweringConfig::default();
    config.bytecode.specialize_numeric = false;
    let registry = build_registry(config, &RoutineTable::standard()).unwrap();
    let h = Harness::with_registry(&registry, 1);
    for v in SAMPLES {
        assert_eq!(
            h.bytecode("ceiling", &[float(v)]).unwrap(),
            Value::Int(v.ceil() as i64)
        );
    }
    assert_eq!(h.bytecode("ceiling", &[int(-4)]).unwrap(), Value::Int(-4));
}

#[test]
fn test_ceiling_text() {
    let h = Harness::standard();
    let types = [SemanticType::Float];

    let scaled = js::binary(&js::op::TIMES, &JsExpr::atomic("x"), &js::integer(2));
    let (text, libraries) = h.js("ceiling", &types, vec![scaled]).unwrap();
    assert_eq!(text, "Math.ceil(x * 2)");
    assert!(libraries.is_empty());

    let negated = py::unary(&py::op::NEGATE, &PyExpr::atomic("x"));
    let (text, modules) = h.python("ceiling", &types, vec![negated]).unwrap();
    assert_eq!(text, "int(math.ceil(-x))");
    assert_eq!(modules, vec!["math"]);
}

#[test]
fn test_ceiling_rejects_strings() {
    let h = Harness::standard();
    let types = [SemanticType::String];
    assert_diagnostic(h.js("ceiling", &types, vec![JsExpr::atomic("s")]), "L0004");
}
