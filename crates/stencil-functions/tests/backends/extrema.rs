//! max / min

use stencil_plugin::bytecode::TypedExpr;
use stencil_plugin::{BackendArgs, JsExpr, PyExpr};
use stencil_runtime::{Repr, Value};
use stencil_types::SemanticType;

use crate::harness::*;

#[test]
fn test_native_and_runtime_paths_agree() {
    let h = Harness::standard();
    let pairs = [(3, 9), (-4, -7), (5, 5), (i64::MIN, i64::MAX)];
    for (a, b) in pairs {
        let ints = [int(a), int(b)];
        let boxed_pair = [
            boxed(Value::Int(a), SemanticType::Number),
            boxed(Value::Int(b), SemanticType::Number),
        ];
        assert_eq!(h.bytecode("max", &ints).unwrap(), Value::Int(a.max(b)));
        assert_eq!(h.bytecode("min", &ints).unwrap(), Value::Int(a.min(b)));
        assert_eq!(
            h.bytecode("max", &boxed_pair).unwrap(),
            Value::Int(a.max(b))
        );
        assert_eq!(h.generic("min", &ints).unwrap(), Value::Int(a.min(b)));
    }
}

#[test]
fn test_float_operands() {
    let h = Harness::standard();
    let pairs = [(1.5, -2.0), (f64::NAN, 4.0), (4.0, f64::NAN), (-0.5, -0.25)];
    for (a, b) in pairs {
        let floats = [float(a), float(b)];
        assert_eq!(h.bytecode("max", &floats).unwrap(), Value::Float(a.max(b)));
        assert_eq!(h.generic("max", &floats).unwrap(), Value::Float(a.max(b)));
        assert_eq!(h.bytecode("min", &floats).unwrap(), Value::Float(a.min(b)));
    }
}

#[test]
fn test_mixed_operands_widen_to_float() {
    let h = Harness::standard();
    assert_eq!(
        h.bytecode("max", &[int(2), float(2.5)]).unwrap(),
        Value::Float(2.5)
    );
    assert_eq!(
        h.bytecode("min", &[int(2), float(2.5)]).unwrap(),
        Value::Float(2.0)
    );
}

#[test]
fn test_text() {
    let h = Harness::standard();
    let types = [SemanticType::Int, SemanticType::Int];
    let (text, _) = h
        .js("max", &types, vec![JsExpr::atomic("a"), JsExpr::atomic("b")])
        .unwrap();
    assert_eq!(text, "Math.max(a, b)");
    let (text, _) = h
        .python("min", &types, vec![PyExpr::atomic("a"), PyExpr::atomic("b")])
        .unwrap();
    assert_eq!(text, "min(a, b)");
}

#[test]
fn test_result_type_follows_operands() {
    let h = Harness::standard();
    let lower = |a: (Repr, SemanticType), b: (Repr, SemanticType)| {
        let types = [a.1.clone(), b.1.clone()];
        let args = vec![TypedExpr::arg(0, a.0, a.1), TypedExpr::arg(1, b.0, b.1)];
        let artifact = h.lower("max", &types, BackendArgs::Bytecode(args)).unwrap();
        artifact.as_expression().unwrap().clone()
    };

    let int = || (Repr::Int64, SemanticType::Int);
    let ints = lower(int(), int());
    assert_eq!(ints.repr(), Repr::Int64);
    assert_eq!(ints.ty, SemanticType::Int);

    let float = || (Repr::Float64, SemanticType::Float);
    let floats = lower(float(), float());
    assert_eq!(floats.ty, SemanticType::Float);

    let mixed = lower(int(), float());
    assert_eq!(mixed.ty, SemanticType::Number);
}
