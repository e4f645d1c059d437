//! Physical representations
//!
//! A `Slot` is one entry on the evaluation stack. Its `Repr` is known
//! statically by the compiler, which is what lets the numeric specializer skip
//! boxing when it can prove an int or a float.

use std::fmt;

use crate::error::{RuntimeError, RuntimeResult};
use crate::value::Value;

/// Static representation of an expression or routine parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Repr {
    /// Unboxed 64-bit integer
    Int64,
    /// Unboxed IEEE 754 double
    Float64,
    /// Unboxed boolean
    Bool,
    /// Boxed dynamic [`Value`]
    Boxed,
}

impl Repr {
    /// Is this one of the unboxed numeric representations?
    pub fn is_native_numeric(self) -> bool {
        matches!(self, Repr::Int64 | Repr::Float64)
    }
}

impl fmt::Display for Repr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Repr::Int64 => write!(f, "i64"),
            Repr::Float64 => write!(f, "f64"),
            Repr::Bool => write!(f, "bool"),
            Repr::Boxed => write!(f, "value"),
        }
    }
}

/// A runtime stack entry
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    /// Unboxed integer
    Int64(i64),
    /// Unboxed float
    Float64(f64),
    /// Unboxed boolean
    Bool(bool),
    /// Boxed value
    Boxed(Value),
}

impl Slot {
    /// Representation of this slot
    pub fn repr(&self) -> Repr {
        match self {
            Slot::Int64(_) => Repr::Int64,
            Slot::Float64(_) => Repr::Float64,
            Slot::Bool(_) => Repr::Bool,
            Slot::Boxed(_) => Repr::Boxed,
        }
    }

    /// Wrap into a boxed value; boxed slots are returned unchanged
    pub fn into_value(self) -> Value {
        match self {
            Slot::Int64(v) => Value::Int(v),
            Slot::Float64(v) => Value::Float(v),
            Slot::Bool(v) => Value::Bool(v),
            Slot::Boxed(v) => v,
        }
    }

    /// Box this slot
    pub fn boxed(self) -> Slot {
        Slot::Boxed(self.into_value())
    }

    /// Unbox a boxed slot into the requested native representation
    pub fn unbox(self, to: Repr) -> RuntimeResult<Slot> {
        let value = match self {
            Slot::Boxed(value) => value,
            native => return native.convert(to),
        };
        match to {
            Repr::Int64 => Ok(Slot::Int64(value.as_i64()?)),
            Repr::Float64 => Ok(Slot::Float64(value.as_f64()?)),
            Repr::Bool => Ok(Slot::Bool(value.as_bool()?)),
            Repr::Boxed => Ok(Slot::Boxed(value)),
        }
    }

    /// Numeric conversion between native representations
    ///
    /// Float to int truncates toward zero and saturates at the i64 bounds.
    pub fn convert(self, to: Repr) -> RuntimeResult<Slot> {
        match (self, to) {
            (slot, to) if slot.repr() == to => Ok(slot),
            (Slot::Int64(v), Repr::Float64) => Ok(Slot::Float64(v as f64)),
            (Slot::Float64(v), Repr::Int64) => Ok(Slot::Int64(v as i64)),
            (slot, Repr::Boxed) => Ok(slot.boxed()),
            (slot @ Slot::Boxed(_), to) => slot.unbox(to),
            (slot, to) => Err(RuntimeError::Type {
                expected: to.to_string(),
                actual: slot.repr().to_string(),
            }),
        }
    }

    /// Read an unboxed integer
    pub fn as_i64(&self) -> RuntimeResult<i64> {
        match self {
            Slot::Int64(v) => Ok(*v),
            Slot::Boxed(v) => v.as_i64(),
            other => Err(RuntimeError::Type {
                expected: Repr::Int64.to_string(),
                actual: other.repr().to_string(),
            }),
        }
    }

    /// Read an unboxed float
    pub fn as_f64(&self) -> RuntimeResult<f64> {
        match self {
            Slot::Float64(v) => Ok(*v),
            Slot::Boxed(v) => v.as_f64(),
            other => Err(RuntimeError::Type {
                expected: Repr::Float64.to_string(),
                actual: other.repr().to_string(),
            }),
        }
    }

    /// Read a boolean
    pub fn as_bool(&self) -> RuntimeResult<bool> {
        match self {
            Slot::Bool(v) => Ok(*v),
            Slot::Boxed(v) => v.as_bool(),
            other => Err(RuntimeError::Type {
                expected: Repr::Bool.to_string(),
                actual: other.repr().to_string(),
            }),
        }
    }

    /// Borrow the boxed value, if boxed
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Slot::Boxed(v) => Some(v),
            _ => None,
        }
    }
}
