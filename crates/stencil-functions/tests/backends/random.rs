//! randomInt

use stencil_functions::build_registry;
use stencil_plugin::text::py;
use stencil_plugin::{JsExpr, LoweringConfig, PyExpr};
use stencil_runtime::{RoutineTable, Value};
use stencil_types::SemanticType;

use crate::harness::*;

#[test]
fn test_results_stay_in_bounds() {
    let h = Harness::standard();
    for n in [1, 2, 10, 1000] {
        for _ in 0..50 {
            match h.bytecode("randomInt", &[int(n)]).unwrap() {
                Value::Int(v) => assert!((0..n).contains(&v), "randomInt({}) = {}", n, v),
                other => panic!("randomInt returned {:?}", other),
            }
        }
    }
}

#[test]
fn test_seeded_runtime_is_deterministic() {
    let registry = build_registry(LoweringConfig::default(), &RoutineTable::standard()).unwrap();
    let bytecode = Harness::with_registry(&registry, 42);
    let generic = Harness::with_registry(&registry, 42);
    for _ in 0..20 {
        assert_eq!(
            bytecode.bytecode("randomInt", &[int(1 << 20)]).unwrap(),
            generic.generic("randomInt", &[int(1 << 20)]).unwrap()
        );
    }
}

#[test]
fn test_literal_bound_checked() {
    let h = Harness::standard();
    assert_diagnostic(h.bytecode("randomInt", &[int(0).literal()]), "L0008");
    assert_diagnostic(h.generic("randomInt", &[int(-3).literal()]), "L0008");
}

#[test]
fn test_text() {
    let h = Harness::standard();
    let types = [SemanticType::Int];
    let (text, libraries) = h.js("randomInt", &types, vec![JsExpr::atomic("n")]).unwrap();
    assert_eq!(text, "Math.floor(Math.random() * n)");
    assert!(libraries.is_empty());

    let doubled = py::binary(&py::op::TIMES, &PyExpr::atomic("n"), &py::integer(2));
    let (text, modules) = h.python("randomInt", &types, vec![doubled]).unwrap();
    assert_eq!(text, "random.randint(0, n * 2 - 1)");
    assert_eq!(modules, vec!["random"]);
}
