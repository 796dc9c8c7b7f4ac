use serde::{Deserialize, Serialize};
use std::fmt;

/// A single token from the source code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The type of token
    pub kind: TokenKind,
    /// Source text of the token; string literals hold their joined contents
    pub text: String,
    /// Line number where token appears (1-indexed)
    pub line: usize,
}

impl Token {
    /// Creates a new token with the given properties
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize) -> Self {
        Token {
            kind,
            text: text.into(),
            line,
        }
    }

    /// End-of-input marker placed after the last real token
    pub fn eof(line: usize) -> Self {
        Token::new(TokenKind::Eof, "", line)
    }

    /// Returns true if this is the given keyword
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.kind == TokenKind::Keyword(keyword)
    }
}

/// All possible token types in PlusPlus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    /// One of the reserved words
    Keyword(Keyword),
    /// Declared variable name
    Identifier,
    /// Numeric literal, text kept verbatim
    Number,
    /// Contents of a `"..."` literal
    String,
    /// `:=`, `+=` or `-=`
    Operator(Operator),
    /// `;`
    Semicolon,
    /// `{`
    BlockOpen,
    /// `}`
    BlockClose,
    /// End of input
    Eof,
}

/// Reserved words
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Keyword {
    /// `number` - variable declaration
    Number,
    /// `repeat` - loop head
    Repeat,
    /// `times` - follows the loop count
    Times,
    /// `write` - print statement
    Write,
    /// `and` - optional separator between write items
    And,
    /// `newline` - line break write item
    Newline,
}

impl Keyword {
    /// Every keyword, in declaration order
    pub const ALL: [Keyword; 6] = [
        Keyword::Number,
        Keyword::Repeat,
        Keyword::Times,
        Keyword::Write,
        Keyword::And,
        Keyword::Newline,
    ];

    /// Source spelling
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Number => "number",
            Keyword::Repeat => "repeat",
            Keyword::Times => "times",
            Keyword::Write => "write",
            Keyword::And => "and",
            Keyword::Newline => "newline",
        }
    }

    /// Looks up a keyword by its spelling
    pub fn from_word(word: &str) -> Option<Keyword> {
        Keyword::ALL.into_iter().find(|k| k.as_str() == word)
    }
}

/// Assignment-style operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// `:=`
    Assign,
    /// `+=`
    AddAssign,
    /// `-=`
    SubAssign,
}

impl Operator {
    /// Source spelling
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Assign => ":=",
            Operator::AddAssign => "+=",
            Operator::SubAssign => "-=",
        }
    }

    /// Looks up an operator by its spelling
    pub fn from_word(word: &str) -> Option<Operator> {
        match word {
            ":=" => Some(Operator::Assign),
            "+=" => Some(Operator::AddAssign),
            "-=" => Some(Operator::SubAssign),
            _ => None,
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Keyword(k) => write!(f, "keyword `{}`", k),
            TokenKind::Identifier => f.write_str("identifier"),
            TokenKind::Number => f.write_str("number"),
            TokenKind::String => f.write_str("string"),
            TokenKind::Operator(op) => write!(f, "operator `{}`", op),
            TokenKind::Semicolon => f.write_str("`;`"),
            TokenKind::BlockOpen => f.write_str("`{`"),
            TokenKind::BlockClose => f.write_str("`}`"),
            TokenKind::Eof => f.write_str("end of file"),
        }
    }
}
