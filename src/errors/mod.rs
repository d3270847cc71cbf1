//! # Error Handling
//!
//! This module provides error handling for the docplane documentation engine.
//! It defines custom error types using `thiserror` covering the two failure
//! classes the engine distinguishes: construction-time configuration errors,
//! which make the engine unusable, and per-exchange validation errors, which
//! reject a single exchange while leaving the accumulated document untouched.

use crate::openapi::ParameterLocation;

/// Custom result type for docplane operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the documentation engine
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The configured config-schema version is missing or belongs to an
    /// unsupported major version
    #[error("Unsupported config version '{found}', expected major version {expected}")]
    UnsupportedConfigVersion { found: String, expected: u32 },

    /// The configured driver identifier does not name a known driver
    #[error("Unknown documentation driver '{0}'")]
    UnknownDriver(String),

    /// The configured security mode is not one of the supported modes
    #[error("Invalid security mode '{0}', expected one of: none, jwt, laravel")]
    InvalidSecurityMode(String),

    /// Two parameters of one operation share the same location and name
    #[error("Validation failed. Found multiple {location} parameters named '{name}'.")]
    DuplicatedParameter { location: ParameterLocation, name: String },

    /// Storage driver I/O errors
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Serialization/deserialization of the accumulated document failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic validation errors
    #[error("Validation error: {0}")]
    Validation(String),
}

impl Error {
    /// Create a new unknown-driver error
    pub fn unknown_driver<S: Into<String>>(name: S) -> Self {
        Self::UnknownDriver(name.into())
    }

    /// Create a new invalid-security-mode error
    pub fn invalid_security_mode<S: Into<String>>(mode: S) -> Self {
        Self::InvalidSecurityMode(mode.into())
    }

    /// Create a new duplicated-parameter error
    pub fn duplicated_parameter<S: Into<String>>(location: ParameterLocation, name: S) -> Self {
        Self::DuplicatedParameter { location, name: name.into() }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    /// Whether this error was detected at construction time. Construction
    /// errors are fatal to the engine instance; per-exchange errors are not.
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedConfigVersion { .. }
                | Error::UnknownDriver(_)
                | Error::InvalidSecurityMode(_)
        )
    }
}
