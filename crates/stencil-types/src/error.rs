//! Signature and type errors

use thiserror::Error;

/// Result alias for type operations
pub type TypeResult<T> = Result<T, TypeError>;

/// Errors raised while declaring signatures or checking argument types
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TypeError {
    /// Two overloads of one function share a parameter count
    #[error("Function '{name}' declares more than one overload with {arity} parameter(s)")]
    DuplicateArity {
        /// Function name
        name: String,
        /// The repeated arity
        arity: usize,
    },

    /// A signature was declared without any overload
    #[error("Function '{name}' declares no overloads")]
    NoOverloads {
        /// Function name
        name: String,
    },

    /// An argument is not assignable to the declared parameter type
    #[error("Argument {index} has type {actual}, expected {expected}")]
    Mismatch {
        /// Zero-based argument position
        index: usize,
        /// Declared parameter type
        expected: String,
        /// Type found at the call site
        actual: String,
    },

    /// Argument count does not equal the overload's parameter count
    #[error("Expected {expected} argument(s), got {actual}")]
    ArgumentCount {
        /// Declared parameter count
        expected: usize,
        /// Count found at the call site
        actual: usize,
    },

    /// A type annotation string could not be parsed
    #[error("Cannot parse type '{input}'")]
    Parse {
        /// The offending annotation
        input: String,
    },
}
