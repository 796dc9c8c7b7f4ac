use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

use super::token::{Keyword, Operator, Token, TokenKind};
use crate::config::Limits;
use crate::error::{Error, Result};

/// Symbols that need no surrounding whitespace, in normalization order
pub const SEPARATORS: [&str; 6] = [":=", "-=", "+=", ";", "*", "\""];

const COMMENT_DELIMITER: &str = "*";
const STRING_DELIMITER: &str = "\"";

lazy_static! {
    /// Integer or decimal literal, optional sign and exponent, nothing trailing
    static ref NUMBER_LITERAL: Regex =
        Regex::new(r"^[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?$").unwrap();
}

/// Surrounds every separator occurrence with single spaces
///
/// Separators are handled one after another in [`SEPARATORS`] order, so
/// `x:=5;` becomes `x := 5 ; ` and can be split on whitespace.
pub fn normalize_separators(line: &str) -> String {
    SEPARATORS.iter().fold(line.to_string(), |acc, sep| {
        acc.replace(sep, &format!(" {} ", sep))
    })
}

/// Returns true if the word is a complete numeric literal
pub fn is_number_literal(word: &str) -> bool {
    NUMBER_LITERAL.is_match(word)
}

/// Line-oriented scanner for PlusPlus source
///
/// Besides classifying words, the scanner enforces two rules while it reads:
/// identifiers must have been introduced by an earlier `number` declaration,
/// and braces must balance.
pub struct LineScanner<'a> {
    /// Source code
    source: &'a str,
    /// Soft capacity limits
    limits: Limits,
    /// Accumulated tokens
    tokens: Vec<Token>,
    /// Names introduced by `number` so far
    declared: HashSet<String>,
    /// Opening line of every unclosed `{`
    open_blocks: Vec<usize>,
    /// Line the active comment was opened on
    comment_opened: Option<usize>,
    /// Current line number (1-indexed)
    line: usize,
}

impl<'a> LineScanner<'a> {
    /// Creates a scanner with default limits
    pub fn new(source: &'a str) -> Self {
        Self::with_limits(source, Limits::default())
    }

    /// Creates a scanner with explicit limits
    pub fn with_limits(source: &'a str, limits: Limits) -> Self {
        LineScanner {
            source,
            limits,
            tokens: Vec::new(),
            declared: HashSet::new(),
            open_blocks: Vec::new(),
            comment_opened: None,
            line: 0,
        }
    }

    /// Scans all tokens from source code and returns them as a vector
    ///
    /// The returned vector always ends with a single [`TokenKind::Eof`].
    pub fn scan_tokens(&mut self) -> Result<Vec<Token>> {
        let source = self.source;
        for (index, text) in source.lines().enumerate() {
            if let Some(opened) = self.comment_opened {
                return Err(Error::UnclosedComment { line: opened });
            }
            self.line = index + 1;
            self.scan_line(text)?;
        }

        if !self.open_blocks.is_empty() {
            return Err(Error::UnclosedBlocks {
                lines: self.open_blocks.clone(),
            });
        }

        tracing::debug!(
            tokens = self.tokens.len(),
            lines = self.line,
            declared = self.declared.len(),
            "lexing finished"
        );

        let mut tokens = std::mem::take(&mut self.tokens);
        tokens.push(Token::eof(self.line.max(1)));
        Ok(tokens)
    }

    fn scan_line(&mut self, text: &str) -> Result<()> {
        let normalized = normalize_separators(text);
        let mut words = normalized.split_whitespace();

        while let Some(word) = words.next() {
            if word == COMMENT_DELIMITER {
                self.comment_opened = match self.comment_opened {
                    Some(_) => None,
                    None => Some(self.line),
                };
                continue;
            }
            if self.comment_opened.is_some() {
                continue;
            }

            if word == STRING_DELIMITER {
                self.scan_string(&mut words)?;
            } else if word == ";" {
                self.add_token(TokenKind::Semicolon, word)?;
            } else if let Some(op) = Operator::from_word(word) {
                self.add_token(TokenKind::Operator(op), word)?;
            } else if is_number_literal(word) {
                self.add_token(TokenKind::Number, word)?;
            } else {
                self.scan_word(word, &mut words)?;
            }
        }

        Ok(())
    }

    /// Collects words up to the closing `"` on this line
    fn scan_string<'w>(&mut self, words: &mut impl Iterator<Item = &'w str>) -> Result<()> {
        let mut parts = Vec::new();
        for word in words.by_ref() {
            if word == STRING_DELIMITER {
                return self.add_token(TokenKind::String, parts.join(" "));
            }
            parts.push(word);
        }
        Err(Error::UnclosedString { line: self.line })
    }

    /// Keywords, braces and identifiers
    fn scan_word<'w>(
        &mut self,
        word: &str,
        words: &mut impl Iterator<Item = &'w str>,
    ) -> Result<()> {
        match Keyword::from_word(word) {
            Some(Keyword::Number) => {
                self.add_token(TokenKind::Keyword(Keyword::Number), word)?;
                match words.next() {
                    Some(name) if name.starts_with(|c: char| c.is_ascii_alphabetic()) => {
                        self.add_token(TokenKind::Identifier, name)?;
                        self.declare(name)
                    }
                    _ => Err(Error::InvalidDeclaration { line: self.line }),
                }
            }
            Some(keyword) => self.add_token(TokenKind::Keyword(keyword), word),
            None if word == "{" => {
                self.open_blocks.push(self.line);
                Limits::check(
                    self.limits.max_block_depth,
                    self.open_blocks.len(),
                    "block depth",
                    self.line,
                )?;
                self.add_token(TokenKind::BlockOpen, word)
            }
            None if word == "}" => {
                if self.open_blocks.pop().is_none() {
                    return Err(Error::UnmatchedBlockClose { line: self.line });
                }
                self.add_token(TokenKind::BlockClose, word)
            }
            None => {
                if !self.declared.contains(word) {
                    return Err(Error::UndeclaredVariable {
                        name: word.to_string(),
                        line: self.line,
                    });
                }
                self.add_token(TokenKind::Identifier, word)
            }
        }
    }

    fn declare(&mut self, name: &str) -> Result<()> {
        if self.declared.insert(name.to_string()) {
            Limits::check(
                self.limits.max_declared_names,
                self.declared.len(),
                "declared names",
                self.line,
            )?;
        }
        Ok(())
    }

    fn add_token(&mut self, kind: TokenKind, text: impl Into<String>) -> Result<()> {
        Limits::check(
            self.limits.max_tokens,
            self.tokens.len() + 1,
            "tokens",
            self.line,
        )?;
        self.tokens.push(Token::new(kind, text, self.line));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(source: &str) -> Result<Vec<Token>> {
        LineScanner::new(source).scan_tokens()
    }

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_normalize_separators() {
        assert_eq!(normalize_separators("x:=5;").split_whitespace().collect::<Vec<_>>(), vec!["x", ":=", "5", ";"]);
        assert_eq!(
            normalize_separators("a+=b-=c").split_whitespace().collect::<Vec<_>>(),
            vec!["a", "+=", "b", "-=", "c"]
        );
        assert_eq!(normalize_separators("*note*"), " * note * ");
    }

    #[test]
    fn test_number_literals() {
        for word in ["5", "007", "3.5", "-2", "+4", ".5", "5.", "1e3", "2.5E-1"] {
            assert!(is_number_literal(word), "{} should be a number", word);
        }
        for word in ["inf", "nan", "0x1F", "5a", "1.2.3", "", "-", "e5"] {
            assert!(!is_number_literal(word), "{} should not be a number", word);
        }
    }

    #[test]
    fn test_declaration_and_assignment() {
        let tokens = scan("number x;\nx:=5;").unwrap();
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Keyword(Keyword::Number),
                TokenKind::Identifier,
                TokenKind::Semicolon,
                TokenKind::Identifier,
                TokenKind::Operator(Operator::Assign),
                TokenKind::Number,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
        assert_eq!(tokens[3].line, 2);
        assert_eq!(tokens[5].text, "5");
    }

    #[test]
    fn test_number_text_kept_verbatim() {
        let tokens = scan("number x; x := 007.50;").unwrap();
        assert_eq!(tokens[5].text, "007.50");
    }

    #[test]
    fn test_string_words_joined_with_single_space() {
        let tokens = scan("write \"hello    big   world\";").unwrap();
        assert_eq!(tokens[1].kind, TokenKind::String);
        assert_eq!(tokens[1].text, "hello big world");
    }

    #[test]
    fn test_string_adjacent_quotes() {
        let tokens = scan("write \"a;b\";").unwrap();
        assert_eq!(tokens[1].text, "a ; b");
        assert_eq!(tokens[2].kind, TokenKind::Semicolon);
    }

    #[test]
    fn test_empty_string() {
        let tokens = scan("write \"\";").unwrap();
        assert_eq!(tokens[1].kind, TokenKind::String);
        assert_eq!(tokens[1].text, "");
    }

    #[test]
    fn test_unclosed_string() {
        let err = scan("write \"oops;\nwrite \"x\";").unwrap_err();
        assert!(matches!(err, Error::UnclosedString { line: 1 }));
    }

    #[test]
    fn test_comment_skipped() {
        let tokens = scan("* undeclared words here * number x;").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Keyword(Keyword::Number));
        assert_eq!(tokens.len(), 4);
    }

    #[test]
    fn test_comment_must_close_on_same_line() {
        let err = scan("number x; * open\nx := 1; *").unwrap_err();
        assert!(matches!(err, Error::UnclosedComment { line: 1 }));
    }

    #[test]
    fn test_comment_open_on_last_line_is_accepted() {
        // No further line is fetched, so the open comment is never carried over
        let tokens = scan("number x;\nx := 2;\nwrite x; * trailing note").unwrap();
        assert_eq!(tokens.len(), 11);
        assert_eq!(tokens[9].kind, TokenKind::Semicolon);
        assert_eq!(tokens[10].kind, TokenKind::Eof);
        assert_eq!(tokens[10].line, 3);
    }

    #[test]
    fn test_undeclared_variable() {
        let err = scan("number x;\ny := 1;").unwrap_err();
        match err {
            Error::UndeclaredVariable { name, line } => {
                assert_eq!(name, "y");
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_use_before_declaration_line() {
        let err = scan("x := 1;\nnumber x;").unwrap_err();
        assert!(matches!(err, Error::UndeclaredVariable { line: 1, .. }));
    }

    #[test]
    fn test_invalid_declaration() {
        assert!(matches!(scan("number 5x;").unwrap_err(), Error::InvalidDeclaration { line: 1 }));
        assert!(matches!(scan("number ;").unwrap_err(), Error::InvalidDeclaration { line: 1 }));
        assert!(matches!(scan("\nnumber").unwrap_err(), Error::InvalidDeclaration { line: 2 }));
    }

    #[test]
    fn test_braces() {
        let tokens = scan("repeat 2 times {\n}").unwrap();
        assert_eq!(tokens[3].kind, TokenKind::BlockOpen);
        assert_eq!(tokens[4].kind, TokenKind::BlockClose);
        assert_eq!(tokens[4].line, 2);
    }

    #[test]
    fn test_unmatched_close() {
        let err = scan("number x;\n}").unwrap_err();
        assert!(matches!(err, Error::UnmatchedBlockClose { line: 2 }));
    }

    #[test]
    fn test_unclosed_blocks_reports_all() {
        let err = scan("repeat 2 times {\nrepeat 3 times {\n{ }").unwrap_err();
        match err {
            Error::UnclosedBlocks { lines } => assert_eq!(lines, vec![1, 2]),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_keywords() {
        let tokens = scan("repeat times write and newline").unwrap();
        assert!(tokens[0].is_keyword(Keyword::Repeat));
        assert!(tokens[1].is_keyword(Keyword::Times));
        assert!(tokens[2].is_keyword(Keyword::Write));
        assert!(tokens[3].is_keyword(Keyword::And));
        assert!(tokens[4].is_keyword(Keyword::Newline));
    }

    #[test]
    fn test_empty_source() {
        let tokens = scan("").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
    }

    #[test]
    fn test_token_limit() {
        let limits = Limits {
            max_tokens: Some(3),
            ..Limits::default()
        };
        let err = LineScanner::with_limits("number x; number y;", limits)
            .scan_tokens()
            .unwrap_err();
        assert!(matches!(err, Error::LimitExceeded { what: "tokens", limit: 3, .. }));
    }

    #[test]
    fn test_declared_name_limit() {
        let limits = Limits {
            max_declared_names: Some(1),
            ..Limits::default()
        };
        // redeclaring the same name does not count twice
        assert!(LineScanner::with_limits("number x; number x;", limits.clone())
            .scan_tokens()
            .is_ok());
        let err = LineScanner::with_limits("number x; number y;", limits)
            .scan_tokens()
            .unwrap_err();
        assert!(matches!(err, Error::LimitExceeded { what: "declared names", .. }));
    }

    #[test]
    fn test_block_depth_limit() {
        let limits = Limits {
            max_block_depth: Some(1),
            ..Limits::default()
        };
        let err = LineScanner::with_limits("{ {\n} }", limits)
            .scan_tokens()
            .unwrap_err();
        assert!(matches!(err, Error::LimitExceeded { what: "block depth", line: 1, .. }));
    }
}
