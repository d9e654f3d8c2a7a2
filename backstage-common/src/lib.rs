//! Common types and utilities shared across Backstage crates.
//!
//! This crate defines the caller-facing error taxonomy and the observability helpers used
//! by every binary in the workspace. It is intentionally lightweight so that all crates can
//! depend on it without introducing heavy transitive costs.
//!
//! # Overview
//!
//! - [`observability`]: Centralised tracing/logging initialisation
//! - [`BackstageError`] and [`Result`]: Errors as seen by the outer surface
//!
//! # Examples
//!
//! Internal failure detail never reaches the caller:
//!
//! ```rust
//! use backstage_common::{BackstageError, GENERIC_FAILURE_MESSAGE};
//!
//! let err = BackstageError::Extract("ytInitialData marker not found".into());
//! assert_eq!(err.public_message(), GENERIC_FAILURE_MESSAGE);
//! ```

pub mod observability;

/// Shown when the page could not be fetched or its embedded data could not be processed.
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to process YouTube community data.";

/// Shown when the input is not a usable channel URL.
pub const INVALID_URL_MESSAGE: &str = "La URL debe ser una cadena de texto válida.";

/// Shown when the page was processed but carried no community post.
pub const NO_POST_MESSAGE: &str =
    "No se pudo encontrar ninguna publicación de la comunidad en la URL proporcionada.";

/// Error types surfaced by the Backstage binaries.
///
/// Library crates keep their own detailed error enums; this type is what they collapse
/// into at the boundary, where [`BackstageError::public_message`] decides what the caller
/// is allowed to see.
#[derive(thiserror::Error, Debug)]
pub enum BackstageError {
    /// The input could not be interpreted as a page URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The page fetcher failed (network, status, decoding).
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// The page was fetched but the embedded data could not be processed.
    #[error("Extraction error: {0}")]
    Extract(String),

    /// Extraction succeeded but no community post was present.
    #[error("No community post found")]
    NoPost,

    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl BackstageError {
    /// Caller-facing message with internal structural detail removed.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::InvalidUrl(_) => INVALID_URL_MESSAGE,
            Self::NoPost => NO_POST_MESSAGE,
            Self::Fetch(_) | Self::Extract(_) | Self::Config(_) => GENERIC_FAILURE_MESSAGE,
        }
    }
}

/// Convenient alias for results that use [`BackstageError`].
pub type Result<T> = std::result::Result<T, BackstageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_and_extract_failures_share_generic_message() {
        let fetch = BackstageError::Fetch("server returned error 503".into());
        let extract = BackstageError::Extract("tab collection missing".into());
        assert_eq!(fetch.public_message(), GENERIC_FAILURE_MESSAGE);
        assert_eq!(extract.public_message(), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn invalid_url_and_missing_post_have_dedicated_messages() {
        assert_eq!(
            BackstageError::InvalidUrl("ftp://x".into()).public_message(),
            INVALID_URL_MESSAGE
        );
        assert_eq!(BackstageError::NoPost.public_message(), NO_POST_MESSAGE);
    }

    #[test]
    fn display_keeps_internal_detail_for_logs() {
        let err = BackstageError::Extract("could not parse ytInitialData".into());
        assert_eq!(
            err.to_string(),
            "Extraction error: could not parse ytInitialData"
        );
    }
}
