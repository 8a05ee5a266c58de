//! Error types for CSF parsing and story identity
//!
//! - [`ParseError`]: source text is not a valid story module
//! - [`IdentityError`]: a title or story name cannot form a story id

/// Errors while turning source text into a [`crate::StoryModule`]
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The tree-sitter grammar could not be loaded
    #[error("parser initialization failed: {0}")]
    ParserInit(String),

    /// The parser produced no tree (cancelled or timed out)
    #[error("parser produced no syntax tree")]
    ParseFailed,

    /// Syntax error in the source
    #[error("syntax error at {line}:{column}: {message}")]
    Syntax {
        /// 1-based line
        line: usize,
        /// 1-based column
        column: usize,
        /// Offending snippet or missing token
        message: String,
    },

    /// No `export default` meta declaration
    #[error("CSF: missing default export")]
    MissingDefaultExport,

    /// Default export does not resolve to an object literal
    #[error("CSF: default export must be an object, found {0}")]
    InvalidMeta(String),

    /// `includeStories` / `excludeStories` holds something other than a list or regex
    #[error("CSF: unsupported {property} value: {found}")]
    InvalidStoryFilter {
        /// Meta property name
        property: &'static str,
        /// Node kind or regex error
        found: String,
    },
}

impl ParseError {
    /// Create syntax error from a zero-based tree-sitter position
    pub fn syntax(row: usize, column: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line: row + 1,
            column: column + 1,
            message: message.into(),
        }
    }
}

/// Which half of a story id failed to sanitize
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdPart {
    /// The module title
    Kind,
    /// The story display name
    Name,
}

impl std::fmt::Display for IdPart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdPart::Kind => f.write_str("kind"),
            IdPart::Name => f.write_str("name"),
        }
    }
}

/// Errors while deriving a story id
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    /// Sanitizing left nothing behind
    #[error("invalid {part} '{value}', must include alphanumeric characters")]
    Unsanitizable {
        /// Which input was rejected
        part: IdPart,
        /// The raw input
        value: String,
    },
}
