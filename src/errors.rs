/*!
 * Error types for the hanzi-annotator library.
 *
 * This module contains custom error types for the different layers of the
 * annotation engine, using the thiserror crate for ergonomic error definitions.
 *
 * Lookup failures are recovered per token by the assembler, so only
 * `AnnotationError` ever reaches callers of the engine facade.
 */

use thiserror::Error;

/// Errors that can occur when a lexicon provider resolves a unit
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// The unit is not present in the provider's dictionary
    #[error("No lexicon entry for '{0}'")]
    NotFound(String),

    /// Error when making a request to a remote provider fails
    #[error("Lookup request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing a provider response fails
    #[error("Failed to parse lexicon response: {0}")]
    ParseError(String),

    /// Error returned by the remote service itself
    #[error("Lexicon service responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the service
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The lookup did not complete in time
    #[error("Lookup timed out: {0}")]
    Timeout(String),
}

impl ProviderError {
    /// Whether this failure means the provider could not answer at all,
    /// as opposed to the unit simply having no entry.
    ///
    /// An unparseable reply counts: a provider that never answers in the
    /// expected format is as unusable as one that cannot be reached.
    pub fn is_unavailable(&self) -> bool {
        !matches!(self, Self::NotFound(_))
    }
}

/// Errors that can occur while building an idiom catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// An explicitly supplied idiom was empty after trimming
    #[error("Empty idiom entry at position {position}")]
    EmptyIdiom {
        /// Zero-based position of the offending entry
        position: usize,
    },

    /// Error reading a catalog file
    #[error("Failed to read idiom catalog: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors returned by the annotation engine facade
#[derive(Error, Debug)]
pub enum AnnotationError {
    /// Every lookup of the call failed because the provider was unreachable
    #[error("Lexicon provider unavailable ({failures} failed lookups): {message}")]
    ProviderUnavailable {
        /// Number of failed lookups
        failures: usize,
        /// Message of the first failure observed
        message: String,
    },

    /// The call was cancelled before it completed
    #[error("Annotation cancelled")]
    Cancelled,

    /// The provider failed its connection check
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error building the idiom catalog
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the annotation engine
    #[error("Annotation error: {0}")]
    Annotation(#[from] AnnotationError),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
