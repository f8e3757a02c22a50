//! Error, warning, and option types for placement extraction.
//!
//! Provides [`ExtractError`] for fatal conditions, [`ExtractWarning`] for
//! non-fatal issues that allow best-effort continuation, and
//! [`ExtractOptions`] for resource limits.

use std::fmt;

/// Fatal error kinds for placement extraction.
///
/// Only [`Io`](ExtractError::Io) aborts a whole document; the other kinds
/// are scoped to a page or a stream and the surrounding driver recovers
/// from them.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractError {
    /// The source could not be read. Fatal — extraction aborts.
    Io(String),
    /// Structural failure below the content-stream level (xref, objects,
    /// stream filters). Recoverable per page.
    MalformedPdf(String),
    /// Content-stream tokenization failure. Aborts the current stream;
    /// sibling streams and pages continue.
    Parse(String),
    /// A font subtype or encoding the decoder does not handle.
    UnsupportedFont(String),
    /// Form XObject nesting exceeded the configured depth limit.
    /// Aborts the current page, keeping placements gathered so far.
    RecursionLimit {
        /// The configured maximum nesting depth.
        limit: usize,
    },
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::Io(msg) => write!(f, "I/O error: {msg}"),
            ExtractError::MalformedPdf(msg) => write!(f, "malformed PDF: {msg}"),
            ExtractError::Parse(msg) => write!(f, "content stream parse error: {msg}"),
            ExtractError::UnsupportedFont(msg) => write!(f, "unsupported font: {msg}"),
            ExtractError::RecursionLimit { limit } => {
                write!(f, "form XObject nesting exceeded limit of {limit}")
            }
        }
    }
}

impl std::error::Error for ExtractError {}

impl From<std::io::Error> for ExtractError {
    fn from(err: std::io::Error) -> Self {
        ExtractError::Io(err.to_string())
    }
}

/// Machine-readable category for a non-fatal extraction warning.
#[derive(Debug, Clone, PartialEq)]
pub enum WarningCode {
    /// A font named by `Tf` or an ExtGState was not found in resources.
    MissingFont,
    /// An XObject named by `Do` was missing or broken.
    MissingXObject,
    /// An operator had too few or wrongly-typed operands and was skipped.
    MalformedOperator,
    /// Text decoding fell back to a weaker translation method.
    EncodingFallback,
    /// Form XObject nesting hit the depth limit; the page was truncated.
    RecursionLimit,
    /// Anything else.
    Other(String),
}

impl WarningCode {
    /// Stable string tag for this code.
    pub fn as_str(&self) -> &str {
        match self {
            WarningCode::MissingFont => "MISSING_FONT",
            WarningCode::MissingXObject => "MISSING_XOBJECT",
            WarningCode::MalformedOperator => "MALFORMED_OPERATOR",
            WarningCode::EncodingFallback => "ENCODING_FALLBACK",
            WarningCode::RecursionLimit => "RECURSION_LIMIT",
            WarningCode::Other(_) => "OTHER",
        }
    }
}

impl fmt::Display for WarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal issue encountered during extraction.
///
/// Warnings are the observability channel of the pipeline: malformed
/// operators, missing resources, and encoding fallbacks are reported here
/// and extraction continues. There is no global logger.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractWarning {
    /// Machine-readable category.
    pub code: WarningCode,
    /// Human-readable description.
    pub message: String,
    /// 0-indexed page number, when known.
    pub page: Option<usize>,
    /// Font resource name involved, when applicable.
    pub font: Option<String>,
}

impl ExtractWarning {
    /// Create a warning with a code and message.
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            page: None,
            font: None,
        }
    }

    /// Attach a font resource name.
    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = Some(font.into());
        self
    }

    /// Attach a page number.
    pub fn on_page(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }
}

impl fmt::Display for ExtractWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(page) = self.page {
            write!(f, " (page {page})")?;
        }
        Ok(())
    }
}

/// Resource limits for extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    /// Maximum Form XObject nesting depth. Exceeding it aborts the page
    /// with [`ExtractError::RecursionLimit`].
    pub max_xobject_depth: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            max_xobject_depth: 32,
        }
    }
}
