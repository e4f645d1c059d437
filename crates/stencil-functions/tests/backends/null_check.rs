//! isNull / isNonnull

use stencil_plugin::text::js;
use stencil_plugin::{JsExpr, PyExpr};
use stencil_runtime::Value;
use stencil_types::SemanticType;

use crate::harness::*;

#[test]
fn test_boxed_values() {
    let h = Harness::standard();
    let cases = [
        (Value::Null, true),
        (Value::Undefined, true),
        (Value::Int(0), false),
        (Value::String("".to_string()), false),
    ];
    for (value, is_null) in cases {
        let arg = boxed(value.clone(), SemanticType::Any);
        assert_eq!(
            h.bytecode("isNull", &[arg.clone()]).unwrap(),
            Value::Bool(is_null),
            "isNull({:?})",
            value
        );
        assert_eq!(
            h.generic("isNull", &[arg.clone()]).unwrap(),
            Value::Bool(is_null)
        );
        assert_eq!(
            h.bytecode("isNonnull", &[arg]).unwrap(),
            Value::Bool(!is_null),
            "isNonnull({:?})",
            value
        );
    }
}

#[test]
fn test_unboxed_values_are_never_null() {
    let h = Harness::standard();
    assert_eq!(h.bytecode("isNull", &[int(3)]).unwrap(), Value::Bool(false));
    assert_eq!(
        h.bytecode("isNull", &[float(0.0)]).unwrap(),
        Value::Bool(false)
    );
    assert_eq!(
        h.bytecode("isNonnull", &[int(3)]).unwrap(),
        Value::Bool(true)
    );
}

#[test]
fn test_is_nonnull_has_no_generic_call() {
    let h = Harness::standard();
    let arg = boxed(Value::Null, SemanticType::Any);
    assert_diagnostic(h.generic("isNonnull", &[arg]), "L0007");
}

#[test]
fn test_text_precedence() {
    let h = Harness::standard();
    let types = [SemanticType::Any];

    let either = js::binary(&js::op::OR, &JsExpr::atomic("a"), &JsExpr::atomic("b"));
    let (text, _) = h.js("isNull", &types, vec![either]).unwrap();
    assert_eq!(text, "(a || b) == null");

    let (text, _) = h.python("isNonnull", &types, vec![PyExpr::atomic("x")]).unwrap();
    assert_eq!(text, "x is not None");
}
