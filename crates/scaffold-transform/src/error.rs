//! Error types for the transform engine
//!
//! Every failure aborts the whole transform; no partial output is produced.

use scaffold_csf::{IdentityError, ParseError};

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure raised by a caller-supplied body or setup strategy
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct StrategyError {
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl StrategyError {
    /// Create error from a message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Create error wrapping an underlying cause
    pub fn with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Error message without the source chain
    #[inline]
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Main transform error type
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// Source is not a valid story module
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Title or story name cannot form a story id
    #[error("identity error: {0}")]
    Identity(#[from] IdentityError),

    /// A story context was requested without a title
    #[error("story '{export_key}' has no title to build a test context from")]
    MissingTitle {
        /// Story that needed the title
        export_key: String,
    },

    /// The test body strategy failed for a story
    #[error("test body strategy failed for story '{export_key}': {source}")]
    Strategy {
        /// Story whose body failed
        export_key: String,
        /// Strategy failure
        #[source]
        source: StrategyError,
    },

    /// The module setup strategy failed
    #[error("module setup strategy failed: {0}")]
    Setup(#[source] StrategyError),
}

impl TransformError {
    /// Create body strategy error for a story
    pub fn strategy(export_key: impl Into<String>, source: StrategyError) -> Self {
        Self::Strategy {
            export_key: export_key.into(),
            source,
        }
    }

    /// Check if the error came from a caller-supplied strategy
    #[inline]
    #[must_use]
    pub fn is_strategy_error(&self) -> bool {
        matches!(self, Self::Strategy { .. } | Self::Setup(_))
    }
}

/// Result type alias for transform operations
pub type TransformResult<T> = Result<T, TransformError>;
