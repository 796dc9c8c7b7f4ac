//! Lexical analysis for PlusPlus
//!
//! Converts source text into a stream of tokens, one physical line at a time.

mod line_scanner;
mod token;

pub use line_scanner::{is_number_literal, normalize_separators, LineScanner, SEPARATORS};
pub use token::{Keyword, Operator, Token, TokenKind};
