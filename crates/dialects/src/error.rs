use thiserror::Error;

/// Result type for dialect operations
pub type Result<T> = std::result::Result<T, DialectError>;

/// Errors that can occur while extracting features from a file
#[derive(Error, Debug)]
pub enum DialectError {
    /// The source contains syntax the dialect grammar rejects
    #[error("Syntax error in {path} at line {line}: {message}")]
    Syntax {
        path: String,
        line: usize,
        message: String,
    },

    /// A grammar required by the dialect failed to load
    #[error("Grammar unavailable: {0}")]
    GrammarUnavailable(String),

    /// Tree-sitter error
    #[error("Tree-sitter error: {0}")]
    TreeSitterError(String),
}

impl DialectError {
    /// Create a syntax error
    pub fn syntax(path: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    /// Create a grammar-unavailable error
    pub fn grammar_unavailable(name: impl Into<String>) -> Self {
        Self::GrammarUnavailable(name.into())
    }

    /// Create a tree-sitter error
    pub fn tree_sitter(msg: impl Into<String>) -> Self {
        Self::TreeSitterError(msg.into())
    }

    /// Short classification used in scan logs
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Syntax { .. } => "syntax-error",
            Self::GrammarUnavailable(_) => "grammar-unavailable",
            Self::TreeSitterError(_) => "parser-error",
        }
    }
}
