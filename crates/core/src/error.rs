//! Error types for the Draftsmith content pipeline.
//!
//! This module defines a unified error enum that covers all error categories
//! in the application: configuration, I/O, validation, LLM providers,
//! knowledge retrieval, and prompt rendering.

use thiserror::Error;

/// Unified error type for the Draftsmith pipeline.
///
/// All functions in the application return `Result<T, AppError>`.
/// We never panic; errors must be represented and propagated.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or invalid request parameters
    #[error("Validation error: {0}")]
    Validation(String),

    /// Completion provider errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Embedding and vector index errors
    #[error("Knowledge error: {0}")]
    Knowledge(String),

    /// Prompt template rendering errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
