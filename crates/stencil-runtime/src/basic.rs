//! Portable runtime helpers for the basic function library
//!
//! These are the fallback implementations used when a value's representation
//! is only known at render time. Native fast paths emitted by the compiler must
//! agree with them for every finite input.

use crate::error::{RuntimeError, RuntimeResult};
use crate::value::Value;

/// Ceiling of a boxed number, as a boxed integer
///
/// Integers are returned unchanged; floats are rounded up and truncated into
/// the integer range.
pub fn ceil(value: &Value) -> RuntimeResult<Value> {
    match value {
        Value::Int(v) => Ok(Value::Int(*v)),
        other => Ok(Value::Int(other.as_f64()?.ceil() as i64)),
    }
}

/// Floor of a boxed number, as a boxed integer
pub fn floor(value: &Value) -> RuntimeResult<Value> {
    match value {
        Value::Int(v) => Ok(Value::Int(*v)),
        other => Ok(Value::Int(other.as_f64()?.floor() as i64)),
    }
}

/// `range(end)`: `0, 1, ..., end - 1`
pub fn range_to(end: i64) -> RuntimeResult<Value> {
    range(0, end, 1)
}

/// `range(start, end)` with a step of one
pub fn range_between(start: i64, end: i64) -> RuntimeResult<Value> {
    range(start, end, 1)
}

/// `range(start, end, step)`
///
/// Produces `start, start + step, ...` stopping before `end` is reached or
/// passed. A zero step is rejected instead of looping forever.
pub fn range(start: i64, end: i64, step: i64) -> RuntimeResult<Value> {
    if step == 0 {
        return Err(RuntimeError::InvalidArgument {
            routine: "range".to_string(),
            message: "step must be non-zero".to_string(),
        });
    }

    let mut items = Vec::new();
    let mut current = start;
    while (step > 0 && current < end) || (step < 0 && current > end) {
        items.push(current);
        match current.checked_add(step) {
            Some(next) => current = next,
            None => break,
        }
    }
    Ok(Value::int_list(items))
}

/// Larger of two boxed numbers; integers stay integers
pub fn max(a: &Value, b: &Value) -> RuntimeResult<Value> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Ok(Value::Int(*x.max(y))),
        (x, y) => Ok(Value::Float(x.as_f64()?.max(y.as_f64()?))),
    }
}

/// Smaller of two boxed numbers; integers stay integers
pub fn min(a: &Value, b: &Value) -> RuntimeResult<Value> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Ok(Value::Int(*x.min(y))),
        (x, y) => Ok(Value::Float(x.as_f64()?.min(y.as_f64()?))),
    }
}

/// Is the value `null` or `undefined`?
pub fn is_null(value: &Value) -> bool {
    value.is_nullish()
}
