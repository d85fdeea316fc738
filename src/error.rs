//! Error types for the coverage and time-accounting core.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur in the core.

use thiserror::Error;

/// The main error type for the coverage and time-accounting core.
///
/// All operations in the core return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use roster_core::error::CoreError;
///
/// let error = CoreError::NotFound {
///     entity: "schedule block".to_string(),
///     id: "b3b6f1c2".to_string(),
/// };
/// assert_eq!(error.to_string(), "schedule block not found: b3b6f1c2");
/// ```
#[derive(Debug, Error)]
pub enum CoreError {
    /// A required field was missing or a supplied value was malformed.
    #[error("Validation error: {message}")]
    Validation {
        /// A description of what failed validation.
        message: String,
    },

    /// An entity was absent, or its clinic did not match the requesting
    /// clinic. Tenant mismatches deliberately surface as not-found rather
    /// than revealing that the entity exists elsewhere.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity that was not found.
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// The operation conflicts with current state (duplicate clock-in,
    /// filled block deletion, illegal status transition target, ...).
    #[error("Conflict: {message}")]
    Conflict {
        /// A description of the conflicting state.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed or failed validation.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParse {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse or validation error.
        message: String,
    },

    /// The underlying store failed.
    #[error("Store error: {message}")]
    Store {
        /// A description of the store failure.
        message: String,
    },
}

impl CoreError {
    /// Creates a validation error from any displayable message.
    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::Validation {
            message: message.into(),
        }
    }

    /// Creates a not-found error for an entity kind and id.
    pub fn not_found(entity: impl Into<String>, id: impl std::fmt::Display) -> Self {
        CoreError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Creates a conflict error from any displayable message.
    pub fn conflict(message: impl Into<String>) -> Self {
        CoreError::Conflict {
            message: message.into(),
        }
    }
}

/// A type alias for Results that return CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
