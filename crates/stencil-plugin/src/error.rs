//! Lowering errors
//!
//! Every error belongs to one of three classes. Configuration errors abort
//! startup or the affected compilation, user errors become diagnostics with a
//! placeholder result, and internal errors are compiler bugs.

use thiserror::Error;

use crate::capability::Backend;

/// Result alias for lowering operations
pub type LowerResult<T> = Result<T, LowerError>;

/// How an error is handled by the surrounding compiler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Broken plugin setup; fatal, never retried
    Configuration,
    /// Problem in the template; reported, compilation continues
    User,
    /// Framework invariant violated; fatal
    Internal,
}

/// Errors raised while declaring or lowering plugin functions
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LowerError {
    #[error("Function '{name}' is already registered")]
    DuplicateFunction { name: String },

    #[error("Unknown function '{name}'")]
    UnknownFunction { name: String },

    #[error("Function '{name}' called with {actual} argument(s), expected {expected}")]
    ArityMismatch {
        name: String,
        expected: String,
        actual: usize,
    },

    #[error("Argument {index} of '{name}' has type {actual}, expected {expected}")]
    TypeMismatch {
        name: String,
        index: usize,
        expected: String,
        actual: String,
    },

    #[error("Plugin configuration error: {message}")]
    PluginConfiguration { message: String },

    #[error("Function '{function}' has no runtime registered for {owner}")]
    UnregisteredRuntime { function: String, owner: String },

    #[error("Function '{function}' is not supported by the {backend} backend")]
    UnsupportedBackend { function: String, backend: Backend },

    #[error("Invalid argument to '{function}': {message}")]
    InvalidArgument { function: String, message: String },

    #[error("Internal lowering error: {message}")]
    Internal { message: String },
}

impl LowerError {
    /// Handling class of this error
    pub fn class(&self) -> ErrorClass {
        match self {
            LowerError::DuplicateFunction { .. }
            | LowerError::PluginConfiguration { .. }
            | LowerError::UnregisteredRuntime { .. } => ErrorClass::Configuration,
            LowerError::UnknownFunction { .. }
            | LowerError::ArityMismatch { .. }
            | LowerError::TypeMismatch { .. }
            | LowerError::UnsupportedBackend { .. }
            | LowerError::InvalidArgument { .. } => ErrorClass::User,
            LowerError::Internal { .. } => ErrorClass::Internal,
        }
    }

    /// Shorthand for an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        LowerError::Internal {
            message: message.into(),
        }
    }

    /// Shorthand for a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        LowerError::PluginConfiguration {
            message: message.into(),
        }
    }

    /// Shorthand for an invalid argument error
    pub fn invalid_argument(function: &str, message: impl Into<String>) -> Self {
        LowerError::InvalidArgument {
            function: function.to_string(),
            message: message.into(),
        }
    }
}
