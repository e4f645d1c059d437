//! Cross-backend tests for the basic function library
//!
//! Every function is lowered for each backend it supports; bytecode and
//! generic-call results are executed and must agree with each other.

mod harness;

mod concurrency;
mod extrema;
mod null_check;
mod random;
mod range;
mod rounding;

pub use harness::*;
