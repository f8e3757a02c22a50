//! Error types for the parsing layer.
//!
//! [`BackendError`] is the working error of this crate, derived with
//! [`thiserror`]. It converts losslessly into the public
//! [`ExtractError`] kinds.

use textplace_core::ExtractError;
use thiserror::Error;

/// Errors raised while parsing documents and content streams.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Reading the source failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document structure below the content-stream level is broken
    /// (xref, object resolution, stream filters).
    #[error("malformed PDF: {0}")]
    Malformed(String),

    /// Content-stream tokenization failed.
    #[error("content stream parse error: {0}")]
    Parse(String),

    /// A font subtype or encoding the decoder does not handle.
    #[error("unsupported font: {0}")]
    Font(String),

    /// Form XObject nesting exceeded the configured limit.
    #[error("form XObject nesting exceeded limit of {limit}")]
    RecursionLimit {
        /// The configured maximum nesting depth.
        limit: usize,
    },
}

impl From<BackendError> for ExtractError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Io(e) => ExtractError::Io(e.to_string()),
            BackendError::Malformed(msg) => ExtractError::MalformedPdf(msg),
            BackendError::Parse(msg) => ExtractError::Parse(msg),
            BackendError::Font(msg) => ExtractError::UnsupportedFont(msg),
            BackendError::RecursionLimit { limit } => ExtractError::RecursionLimit { limit },
        }
    }
}
