/*!
 * Error types for the lingostore application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors surfaced by the translation store and service layers
#[derive(Error, Debug)]
pub enum StoreError {
    /// A translation with the given key already exists
    #[error("translation key already exists: {0}")]
    DuplicateKey(String),

    /// No translation with the given id
    #[error("translation not found: {0}")]
    NotFound(i64),

    /// Malformed or missing required fields
    #[error("validation failed: {0}")]
    Validation(String),

    /// A tag label could not be resolved to a slug
    #[error("tag resolution failed: {0}")]
    TagResolution(String),

    /// Record store connectivity or SQL failure; not retried by this layer
    #[error("record store unavailable: {0}")]
    Unavailable(#[source] anyhow::Error),
}

impl StoreError {
    /// Validation error for an empty content map
    pub fn empty_content() -> Self {
        StoreError::Validation("content must contain at least one locale".to_string())
    }

    /// Validation error for a missing or blank key
    pub fn missing_key() -> Self {
        StoreError::Validation("key must not be empty".to_string())
    }
}

// Database closures run with anyhow::Result; domain errors raised inside them
// are recovered by downcast, everything else becomes Unavailable.
impl From<anyhow::Error> for StoreError {
    fn from(error: anyhow::Error) -> Self {
        match error.downcast::<StoreError>() {
            Ok(domain) => domain,
            Err(other) => StoreError::Unavailable(other),
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(error: rusqlite::Error) -> Self {
        StoreError::Unavailable(error.into())
    }
}
