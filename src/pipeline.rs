//! End-to-end pipeline: source text to program output
//!
//! Lexing completes before parsing starts, and parsing completes before
//! anything executes. Nothing is written unless lexing and parsing both
//! succeed.

use std::io::Write;
use std::path::PathBuf;

use crate::config::Config;
use crate::error::Result;
use crate::lexer::{LineScanner, Token};
use crate::parser::{Program, StatementParser};
use crate::runtime::Evaluator;

/// Extension appended to the module name given on the command line
pub const SOURCE_EXTENSION: &str = "ppp";

/// Heading printed before the parse tree dump
pub const PARSE_TREE_HEADING: &str = "=== PARSE TREE ===";

/// Heading printed before the program's own output
pub const PROGRAM_OUTPUT_HEADING: &str = "=== PROGRAM OUTPUT ===";

/// Source file for a module name: `demo` becomes `demo.ppp`
pub fn source_path(module: &str) -> PathBuf {
    PathBuf::from(format!("{}.{}", module, SOURCE_EXTENSION))
}

/// Tokenizes source text
pub fn tokenize(source: &str, config: &Config) -> Result<Vec<Token>> {
    LineScanner::with_limits(source, config.limits.clone()).scan_tokens()
}

/// Tokenizes and parses source text
pub fn parse_source(source: &str, config: &Config) -> Result<Program> {
    let tokens = tokenize(source, config)?;
    StatementParser::with_limits(tokens, config.limits.clone()).parse()
}

/// Runs a program and writes the full process output to `out`
///
/// Output is the parse tree heading and dump, a blank line, the program
/// output heading, then whatever the program writes.
pub fn run_source<W: Write>(source: &str, config: &Config, out: &mut W) -> Result<()> {
    let program = parse_source(source, config)?;

    writeln!(out, "{}", PARSE_TREE_HEADING)?;
    write!(out, "{}", program)?;
    writeln!(out)?;
    writeln!(out, "{}", PROGRAM_OUTPUT_HEADING)?;

    let mut evaluator = Evaluator::with_limits(config.limits.clone());
    evaluator.execute(&program, out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_source_path() {
        assert_eq!(source_path("demo"), PathBuf::from("demo.ppp"));
        assert_eq!(source_path("dir/prog"), PathBuf::from("dir/prog.ppp"));
    }

    #[test]
    fn test_run_source_layout() {
        let mut out = Vec::new();
        run_source("number n;\nn := 2;\nwrite n;", &Config::default(), &mut out).unwrap();
        let expected = "\
=== PARSE TREE ===
PROGRAM
  DECLARATION
    VARIABLE(n)
  ASSIGNMENT
    VARIABLE(n)
    NUMBER(2)
  WRITE
    VARIABLE(n)

=== PROGRAM OUTPUT ===
2";
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn test_lex_error_writes_nothing() {
        let mut out = Vec::new();
        let err = run_source("x := 1;", &Config::default(), &mut out).unwrap_err();
        assert!(matches!(err, Error::UndeclaredVariable { .. }));
        assert!(out.is_empty());
    }
}
