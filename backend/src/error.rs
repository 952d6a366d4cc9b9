//! Error types for the Withle catalog pipeline and API proxies.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`CsvError`] - CSV decoding/parsing errors
//! - [`CatalogError`] - Catalog pipeline errors
//! - [`ChatError`] - Generative-language proxy errors
//! - [`TripoError`] - 3D-generation proxy errors
//! - [`ServerError`] - HTTP server errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.
//!
//! A failed load is a typed error, never an empty record list, so callers
//! can always tell "no listings" from "load failed".

use thiserror::Error;

// =============================================================================
// CSV Errors
// =============================================================================

/// Errors during CSV reading and parsing.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read the source file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Header row is missing or unusable.
    #[error("No headers found in CSV")]
    NoHeaders,
}

// =============================================================================
// Catalog Errors (pipeline top level)
// =============================================================================

/// Top-level catalog pipeline errors.
///
/// This is the main error type returned by [`crate::catalog::load_catalog`].
#[derive(Debug, Error)]
pub enum CatalogError {
    /// CSV reading or parsing error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Profile could not map any required column.
    #[error("Profile '{profile}' matched no known columns in header")]
    UnmappedHeader { profile: String },
}

// =============================================================================
// Chat Proxy Errors
// =============================================================================

/// Errors from the generative-language proxy client.
#[derive(Debug, Error)]
pub enum ChatError {
    /// No API key configured in the environment.
    #[error("Missing API key (set GEMINI_API_KEY, GOOGLE_API_KEY or API_KEY)")]
    MissingApiKey,

    /// Empty user message.
    #[error("Message is required")]
    EmptyMessage,

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    /// Upstream returned an error payload.
    #[error("Upstream API error: {0}")]
    ApiError(String),

    /// Response did not contain a usable reply.
    #[error("Invalid upstream response: {0}")]
    InvalidResponse(String),
}

// =============================================================================
// Tripo Proxy Errors
// =============================================================================

/// Errors from the 3D-generation proxy client.
#[derive(Debug, Error)]
pub enum TripoError {
    /// No API key configured in the environment.
    #[error("Server Config Error: TRIPO_API_KEY missing")]
    MissingApiKey,

    /// Request body did not name a known action.
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// Malformed payload for the requested action.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    /// Upstream returned a non-zero business code.
    #[error("Upstream API error (code {code}): {message}")]
    ApiError { code: i64, message: String },

    /// The account has no generation credits left (upstream code 2010).
    /// Callers fall back to the canned demo asset.
    #[error("Insufficient generation credits")]
    InsufficientCredits,

    /// Generation task ended in the failed state.
    #[error("Generation failed: {0}")]
    TaskFailed(String),

    /// Polling ran out of attempts without a terminal state.
    #[error("Generation timed out after {0} attempts")]
    PollTimeout(u32),
}

impl TripoError {
    /// Classify an upstream error payload, special-casing the known
    /// "insufficient credit" code so callers can fall back to the demo asset.
    pub fn from_upstream(code: i64, message: String) -> Self {
        if code == 2010 || message.to_lowercase().contains("credit") {
            TripoError::InsufficientCredits
        } else {
            TripoError::ApiError { code, message }
        }
    }
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Catalog pipeline error.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Chat proxy error.
    #[error("Chat error: {0}")]
    Chat(#[from] ChatError),

    /// Tripo proxy error.
    #[error("Tripo error: {0}")]
    Tripo(#[from] TripoError),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Server internal error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Result type for chat proxy operations.
pub type ChatResult<T> = Result<T, ChatError>;

/// Result type for tripo proxy operations.
pub type TripoResult<T> = Result<T, TripoError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // CsvError -> CatalogError
        let csv_err = CsvError::NoHeaders;
        let catalog_err: CatalogError = csv_err.into();
        assert!(catalog_err.to_string().contains("No headers"));

        // CatalogError -> ServerError
        let server_err: ServerError = catalog_err.into();
        assert!(server_err.to_string().contains("Catalog error"));
    }

    #[test]
    fn test_credit_classification() {
        assert!(matches!(
            TripoError::from_upstream(2010, "whatever".into()),
            TripoError::InsufficientCredits
        ));
        assert!(matches!(
            TripoError::from_upstream(1004, "Not enough credit balance".into()),
            TripoError::InsufficientCredits
        ));
        let other = TripoError::from_upstream(1001, "bad token".into());
        assert!(other.to_string().contains("code 1001"));
    }
}
