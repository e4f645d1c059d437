//! Stencil Basic Functions
//!
//! The function library every template can call, lowered for all four
//! backends:
//!
//! | Function | Signature | Notes |
//! |----------|-----------|-------|
//! | `ceiling`, `floor` | `number -> int` | numeric specialization by representation |
//! | `range` | `number{1,3} -> list<int>` | one routine per arity, zero step rejected |
//! | `isNull`, `isNonnull` | `any -> bool` | unboxed values are never null |
//! | `max`, `min` | `number, number -> number` | inline select for matching native operands |
//! | `randomInt` | `number -> int` | impure, instance routine on `RandomRuntime` |
//!
//! Most callers only need [`standard_registry`] and [`runtime_instances`].

#![warn(rust_2018_idioms)]

mod args;
pub mod extrema;
pub mod null_check;
pub mod random;
pub mod range;
pub mod registry;
pub mod rounding;

pub use extrema::ExtremumFunction;
pub use null_check::NullCheck;
pub use random::RandomIntFunction;
pub use range::RangeFunction;
pub use registry::{build_registry, register_basic_functions, runtime_instances, standard_registry};
pub use rounding::RoundingFunction;
