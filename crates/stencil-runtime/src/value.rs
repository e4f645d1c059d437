//! Boxed dynamic values
//!
//! `Value` is what a template sees when the compiler could not prove a
//! cheaper representation. Numbers keep their int/float distinction so that
//! helpers can take the exact path for integers.

use std::fmt;

use crate::error::{RuntimeError, RuntimeResult};

/// A boxed render-time value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing value
    Undefined,
    /// Explicit null
    Null,
    /// Boolean
    Bool(bool),
    /// 64-bit integer
    Int(i64),
    /// Double-precision float
    Float(f64),
    /// String
    String(String),
    /// Ordered list
    List(Vec<Value>),
}

impl Value {
    /// Build a list of integers
    pub fn int_list(items: impl IntoIterator<Item = i64>) -> Self {
        Value::List(items.into_iter().map(Value::Int).collect())
    }

    /// Dynamic type name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
        }
    }

    /// Is this `null` or `undefined`?
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Null | Value::Undefined)
    }

    /// Read as a float, accepting both numeric variants
    pub fn as_f64(&self) -> RuntimeResult<f64> {
        match self {
            Value::Int(v) => Ok(*v as f64),
            Value::Float(v) => Ok(*v),
            other => Err(type_error("number", other)),
        }
    }

    /// Read as an integer; floats are truncated toward zero
    pub fn as_i64(&self) -> RuntimeResult<i64> {
        match self {
            Value::Int(v) => Ok(*v),
            Value::Float(v) => Ok(*v as i64),
            other => Err(type_error("number", other)),
        }
    }

    /// Read as a boolean
    pub fn as_bool(&self) -> RuntimeResult<bool> {
        match self {
            Value::Bool(v) => Ok(*v),
            other => Err(type_error("bool", other)),
        }
    }
}

fn type_error(expected: &str, actual: &Value) -> RuntimeError {
    RuntimeError::Type {
        expected: expected.to_string(),
        actual: actual.type_name().to_string(),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::String(s) => write!(f, "{}", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}
