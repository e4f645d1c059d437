//! Runtime errors

use thiserror::Error;

/// Result alias for runtime operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Errors raised by runtime helpers and routine dispatch
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RuntimeError {
    /// A helper received a value outside its domain (e.g. a zero range step)
    #[error("Invalid argument to {routine}: {message}")]
    InvalidArgument {
        /// Routine that rejected the argument
        routine: String,
        /// What was wrong
        message: String,
    },

    /// A value had the wrong dynamic type
    #[error("Type error: expected {expected}, got {actual}")]
    Type {
        /// Expected type name
        expected: String,
        /// Actual type name
        actual: String,
    },

    /// A routine was called with the wrong number of slots
    #[error("Routine {routine} takes {expected} argument(s), got {actual}")]
    ArgumentCount {
        /// Routine display name
        routine: String,
        /// Declared parameter count
        expected: usize,
        /// Supplied count
        actual: usize,
    },

    /// The same routine was registered twice
    #[error("Routine {owner}.{name} is already registered with these parameters")]
    DuplicateRoutine {
        /// Owning class/module
        owner: String,
        /// Routine name
        name: String,
    },

    /// An instance routine was invoked without its runtime object
    #[error("No runtime instance registered for {owner}")]
    MissingReceiver {
        /// Owner whose instance is missing
        owner: String,
    },
}
