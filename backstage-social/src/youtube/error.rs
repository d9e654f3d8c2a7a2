use thiserror::Error;

/// Terminal failures of one extraction call. None of them are retried.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// No inline script mentions the marker; not a page with the expected blob.
    #[error("could not find {marker} script")]
    NotFound { marker: &'static str },

    /// The marker is present but no JSON object could be read after it.
    #[error("could not parse ytInitialData content: {0}")]
    Parse(String),

    /// The blob parsed but the tab collection is unusable even with the fallback.
    #[error("community content structure not found in ytInitialData: {0}")]
    Structure(String),
}
