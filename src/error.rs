//! Error types for the PlusPlus interpreter

use thiserror::Error;

/// PlusPlus interpreter errors
///
/// Every error is fatal: the pipeline stops at the first one it meets. The
/// only error that reports more than one fault is [`Error::UnclosedBlocks`],
/// which lists every brace still open at end of file.
#[derive(Error, Debug)]
pub enum Error {
    // Lex errors
    /// `number` not followed by a word starting with a letter
    ///
    /// **Triggered by:** `number 5x;`, `number ;`, or `number` at end of line
    #[error("Error on line {line}: Invalid variable declaration after 'number'")]
    InvalidDeclaration {
        /// Line of the `number` keyword
        line: usize,
    },

    /// Identifier used before (or without) its `number` declaration
    ///
    /// **Triggered by:** `x := 1;` with no earlier `number x;`
    /// **Prevention:** Declare every variable on an earlier line, or earlier on the same line
    #[error("Error on line {line}: Undeclared variable '{name}'")]
    UndeclaredVariable {
        /// Offending word
        name: String,
        /// Line where it was used
        line: usize,
    },

    /// `}` with no open `{`
    #[error("Error on line {line}: Closing block without opening block")]
    UnmatchedBlockClose {
        /// Line of the stray `}`
        line: usize,
    },

    /// One or more `{` never closed before end of file
    #[error("{}", unclosed_blocks_message(.lines))]
    UnclosedBlocks {
        /// Opening line of every unclosed block, outermost first
        lines: Vec<usize>,
    },

    /// String literal without a closing `"` on the same line
    #[error("Error on line {line}: String literal not closed with '\"'")]
    UnclosedString {
        /// Line where the literal starts
        line: usize,
    },

    /// Comment opened with `*` and not closed on the same line
    #[error("Error on line {line}: Comment block is not closed")]
    UnclosedComment {
        /// Line where the comment was opened
        line: usize,
    },

    // Parse errors
    /// Operand missing or of the wrong kind
    ///
    /// **Triggered by:** `repeat times ...`, `x += ;`, `x -= "a";`
    #[error("Error on line {line}: Expected number or variable after '{after}'")]
    MissingOperand {
        /// Keyword or operator the operand should follow
        after: &'static str,
        /// Line of the offending token
        line: usize,
    },

    /// Identifier expected but something else found
    #[error("Error on line {line}: Expected identifier after '{after}'")]
    ExpectedIdentifier {
        /// Keyword the identifier should follow
        after: &'static str,
        /// Line of the offending token
        line: usize,
    },

    // Runtime errors
    /// 64-bit cell overflowed during `+=` or `-=`
    #[error("Error on line {line}: Arithmetic overflow")]
    ArithmeticOverflow {
        /// Line of the update statement
        line: usize,
    },

    /// Loop count above the configured iteration ceiling
    #[error("Error on line {line}: Too many iterations (limit: {limit})")]
    TooManyIterations {
        /// Maximum allowed iterations per loop
        limit: usize,
        /// Line of the `repeat`
        line: usize,
    },

    // Resource errors
    /// A configured soft limit was reached
    ///
    /// **Triggered by:** more tokens, names, cells, children or nesting than [`crate::Limits`] allows
    /// **Recovery:** Raise the limit via `PPP_CONFIG` or the matching `PPP_MAX_*` variable
    #[error("Error on line {line}: Limit exceeded: {what} (max: {limit})")]
    LimitExceeded {
        /// Name of the limit
        what: &'static str,
        /// Configured ceiling
        limit: usize,
        /// Line being processed when the limit was hit
        line: usize,
    },

    /// Configuration could not be read or parsed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Writing program output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Pipeline phase an error belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPhase {
    /// Raised while scanning source lines
    Lex,
    /// Raised while building the tree
    Parse,
    /// Raised while executing the tree
    Runtime,
    /// A configured ceiling was reached
    Limit,
    /// Configuration loading failed
    Config,
    /// Output could not be written
    Io,
}

impl Error {
    /// Create a limit error
    pub fn limit(what: &'static str, limit: usize, line: usize) -> Self {
        Error::LimitExceeded { what, limit, line }
    }

    /// Create a configuration error with a message
    pub fn config(msg: impl Into<String>) -> Self {
        Error::InvalidConfig(msg.into())
    }

    /// Classify the phase that raised the error
    pub fn phase(&self) -> ErrorPhase {
        match self {
            Error::InvalidDeclaration { .. }
            | Error::UndeclaredVariable { .. }
            | Error::UnmatchedBlockClose { .. }
            | Error::UnclosedBlocks { .. }
            | Error::UnclosedString { .. }
            | Error::UnclosedComment { .. } => ErrorPhase::Lex,

            Error::MissingOperand { .. } | Error::ExpectedIdentifier { .. } => ErrorPhase::Parse,

            Error::ArithmeticOverflow { .. } | Error::TooManyIterations { .. } => {
                ErrorPhase::Runtime
            }

            Error::LimitExceeded { .. } => ErrorPhase::Limit,
            Error::InvalidConfig(_) => ErrorPhase::Config,
            Error::Io(_) => ErrorPhase::Io,
        }
    }

    /// Source line the error points at, if any
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::InvalidDeclaration { line }
            | Error::UndeclaredVariable { line, .. }
            | Error::UnmatchedBlockClose { line }
            | Error::UnclosedString { line }
            | Error::UnclosedComment { line }
            | Error::MissingOperand { line, .. }
            | Error::ExpectedIdentifier { line, .. }
            | Error::ArithmeticOverflow { line }
            | Error::TooManyIterations { line, .. }
            | Error::LimitExceeded { line, .. } => Some(*line),
            Error::UnclosedBlocks { lines } => lines.first().copied(),
            Error::InvalidConfig(_) | Error::Io(_) => None,
        }
    }
}

fn unclosed_blocks_message(lines: &[usize]) -> String {
    lines
        .iter()
        .map(|line| format!("Error: Unclosed block opened on line {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Result type for PlusPlus operations
pub type Result<T> = std::result::Result<T, Error>;
