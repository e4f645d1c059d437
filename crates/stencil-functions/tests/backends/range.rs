//! range

use stencil_plugin::text::js;
use stencil_plugin::{JsExpr, PyExpr, VmError};
use stencil_runtime::{RuntimeError, Value};
use stencil_types::SemanticType;

use crate::harness::*;

fn list(items: &[i64]) -> Value {
    Value::int_list(items.iter().copied())
}

#[test]
fn test_range_formulas() {
    let h = Harness::standard();
    let cases: Vec<(Vec<Arg>, Value)> = vec![
        (vec![int(5)], list(&[0, 1, 2, 3, 4])),
        (vec![int(2), int(5)], list(&[2, 3, 4])),
        (vec![int(2), int(8), int(3)], list(&[2, 5])),
        (vec![int(5), int(2), int(-1)], list(&[5, 4, 3])),
        (vec![int(0)], list(&[])),
        (vec![int(4), int(1)], list(&[])),
    ];
    for (args, expected) in cases {
        assert_eq!(h.bytecode("range", &args).unwrap(), expected, "{:?}", args);
        assert_eq!(h.generic("range", &args).unwrap(), expected, "{:?}", args);
    }
}

#[test]
fn test_range_arities_are_equivalent() {
    let h = Harness::standard();
    for n in -2..7 {
        let one = h.bytecode("range", &[int(n)]).unwrap();
        let two = h.bytecode("range", &[int(0), int(n)]).unwrap();
        let three = h.bytecode("range", &[int(0), int(n), int(1)]).unwrap();
        assert_eq!(one, two, "range({}) vs range(0, {})", n, n);
        assert_eq!(one, three, "range({}) vs range(0, {}, 1)", n, n);
    }
    for (a, b) in [(-3, 2), (4, 9), (5, 5)] {
        assert_eq!(
            h.bytecode("range", &[int(a), int(b)]).unwrap(),
            h.bytecode("range", &[int(a), int(b), int(1)]).unwrap()
        );
    }
}

#[test]
fn test_range_of_boxed_numbers() {
    let h = Harness::standard();
    let end = boxed(Value::Int(3), SemanticType::Number);
    assert_eq!(
        h.bytecode("range", &[end.clone()]).unwrap(),
        list(&[0, 1, 2])
    );
    assert_eq!(h.generic("range", &[end]).unwrap(), list(&[0, 1, 2]));
}

#[test]
fn test_literal_zero_step_fails_at_compile_time() {
    let h = Harness::standard();
    let args = [int(1), int(5), int(0).literal()];
    assert_diagnostic(h.bytecode("range", &args), "L0008");
    assert_diagnostic(h.generic("range", &args), "L0008");

    let types = [SemanticType::Int, SemanticType::Int, SemanticType::Int];
    let js_args = vec![js::integer(1), js::integer(5), js::integer(0)];
    assert_diagnostic(h.js("range", &types, js_args), "L0008");
    let py_args = vec![
        PyExpr::atomic("1"),
        PyExpr::atomic("5"),
        PyExpr::atomic("0"),
    ];
    assert_diagnostic(h.python("range", &types, py_args), "L0008");
}

#[test]
fn test_dynamic_zero_step_fails_at_render_time() {
    let h = Harness::standard();
    let args = [int(1), int(5), int(0)];
    for result in [h.bytecode("range", &args), h.generic("range", &args)] {
        match result {
            Err(Failure::Render(VmError::Runtime(RuntimeError::InvalidArgument { .. }))) => {}
            other => panic!("expected a render-time invalid argument, got {:?}", other),
        }
    }

    let types = [SemanticType::Int, SemanticType::Int, SemanticType::Int];
    let args = vec![JsExpr::atomic("a"), JsExpr::atomic("b"), JsExpr::atomic("step")];
    let (text, libraries) = h.js("range", &types, args).unwrap();
    assert_eq!(
        text,
        "goog.array.range(a, b, stencil.runtime.checkedStep(step))"
    );
    assert_eq!(libraries, vec!["goog.array", "stencil.runtime"]);
}

#[test]
fn test_range_text() {
    let h = Harness::standard();
    let types = [SemanticType::Int];
    let (text, libraries) = h.js("range", &types, vec![JsExpr::atomic("n")]).unwrap();
    assert_eq!(text, "goog.array.range(n)");
    assert_eq!(libraries, vec!["goog.array"]);

    let types = [SemanticType::Int, SemanticType::Int, SemanticType::Int];
    let args = vec![PyExpr::atomic("a"), PyExpr::atomic("b"), PyExpr::atomic("-1")];
    let (text, modules) = h.python("range", &types, args).unwrap();
    assert_eq!(text, "list(range(a, b, -1))");
    assert!(modules.is_empty());
}

#[test]
fn test_range_arity_four_is_reported() {
    let h = Harness::standard();
    let args = [int(1), int(2), int(3), int(4)];
    assert_diagnostic(h.bytecode("range", &args), "L0003");
    assert_diagnostic(h.generic("range", &args), "L0003");
}
