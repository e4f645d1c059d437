//! Stencil Semantic Types
//!
//! The compile-time type vocabulary used to declare plugin function
//! signatures. Nothing in this crate is carried at render time: types exist
//! only so that call sites can be validated before any backend lowers them.

#![warn(missing_docs)]

pub mod error;
pub mod signature;
pub mod ty;

pub use error::{TypeError, TypeResult};
pub use signature::{Overload, Purity, Signature};
pub use ty::SemanticType;
