//! Error types for rendering and serving the GUI configuration.
//!
//! - [`RenderError`] - Rendering and parsing of the `juju_config` script
//! - [`ParamsError`] - Assembling deployment parameters from their sources
//! - [`ValidationError`] - Checking a rendered script against the schema
//! - [`ServerError`] - HTTP server failures
//!
//! Conversions are `From` based so `?` works across module boundaries.

use thiserror::Error;

// =============================================================================
// Render Errors
// =============================================================================

/// Errors produced while rendering or parsing a configuration script.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A required substitution value is empty or absent.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// The text is not a rendered configuration script.
    #[error("Malformed configuration script: {0}")]
    Malformed(String),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Parameter Errors
// =============================================================================

/// Errors while loading or merging deployment parameters.
#[derive(Debug, Error)]
pub enum ParamsError {
    /// No source provided a value for this field.
    #[error("Missing required parameter: {0}")]
    MissingField(&'static str),

    /// Failed to read a parameter file.
    #[error("Failed to read parameters: {0}")]
    Io(#[from] std::io::Error),

    /// Parameter file is not valid JSON or has unknown keys.
    #[error("Invalid parameter file: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors while checking a rendered script.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The script could not be parsed back.
    #[error("{0}")]
    Render(#[from] RenderError),

    /// The parsed object does not match the configuration schema.
    #[error("Validation failed: {errors:?}")]
    SchemaError { errors: Vec<String> },
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Rendering failed.
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Binding or serving failed.
    #[error("Server IO error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Result type for parameter loading.
pub type ParamsResult<T> = Result<T, ParamsError>;

/// Result type for validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
