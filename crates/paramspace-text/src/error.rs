//! Error types for parameter-text ingestion and persistence.

use std::fmt;

use paramspace_core::TreeError;

/// Errors arising while reading or writing the parameter-text dialect.
#[derive(Clone, Debug, PartialEq)]
pub enum TextError {
    /// The tokenizer hit a character sequence it does not recognize.
    Lex {
        /// 1-based source line.
        line: usize,
        /// 1-based source column.
        column: usize,
        /// The unrecognized input fragment.
        snippet: String,
    },
    /// The token stream does not form a valid parameter tree.
    Parse {
        /// 1-based source line.
        line: usize,
        /// 1-based source column.
        column: usize,
        /// What the parser expected or found.
        message: String,
    },
    /// Filesystem access failed.
    Io {
        /// The path being read or written.
        path: String,
        /// The underlying I/O error, rendered.
        message: String,
    },
    /// Assembling the parsed entries into a tree failed, e.g. a
    /// reserved key name or an unsupported operand combination in a
    /// constant-folded expression.
    Tree(TreeError),
}

impl fmt::Display for TextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lex {
                line,
                column,
                snippet,
            } => write!(f, "{line}:{column}: unrecognized input '{snippet}'"),
            Self::Parse {
                line,
                column,
                message,
            } => write!(f, "{line}:{column}: {message}"),
            Self::Io { path, message } => write!(f, "i/o error on '{path}': {message}"),
            Self::Tree(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for TextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Tree(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TreeError> for TextError {
    fn from(e: TreeError) -> Self {
        Self::Tree(e)
    }
}
