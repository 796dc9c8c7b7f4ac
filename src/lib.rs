//! # PlusPlus - A Small Imperative Teaching Language
//!
//! A tree-walking interpreter for PlusPlus, a teaching language with integer
//! variables, a fixed-count loop and a print statement.
//!
//! ## Quick Start
//!
//! ```rust
//! use plusplus::{Evaluator, Parser, Scanner};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let code = r#"
//!     number total;
//!     number step;
//!     step := 5;
//!     repeat 4 times total += step;
//!     write "total:" and total and newline;
//! "#;
//!
//! // Tokenize (scan)
//! let mut scanner = Scanner::new(code);
//! let tokens = scanner.scan_tokens()?;
//!
//! // Parse into AST
//! let mut parser = Parser::new(tokens);
//! let program = parser.parse()?;
//!
//! // Execute
//! let mut evaluator = Evaluator::new();
//! let mut output = Vec::new();
//! evaluator.execute(&program, &mut output)?;
//!
//! assert_eq!(String::from_utf8(output)?, "total:20\n");
//! # Ok(())
//! # }
//! ```
//!
//! ## Language Overview
//!
//! ```text
//! number x;                     * declare x, initialised to 0 *
//! x := 5;                       * assign a literal or another variable *
//! x += 2;  x -= y;              * update an existing variable *
//! repeat x times { ... }        * run a block (or one statement) x times *
//! write "x is " and x newline;  * print strings, variables and line breaks *
//! ```
//!
//! - Comments sit between two standalone `*` and must close on the line they open on.
//! - String literals must close on the line they open on.
//! - Every variable must be declared with `number` before it is used.
//! - Numeric literals with a fractional part truncate toward zero.
//!
//! ## Architecture
//!
//! ```text
//! Source Code → Scanner → Tokens → Parser → AST → Evaluator → Output
//! ```
//!
//! - [`Scanner`] - Tokenizes source lines, checking declarations and braces
//! - [`Parser`] - Builds the [`Program`] tree by recursive descent
//! - [`Evaluator`] - Walks the tree and writes program output
//! - [`VariableStore`] - Named 64-bit integer cells
//! - [`Config`] - Soft capacity limits from `PPP_CONFIG` / `PPP_MAX_*`
//!
//! ## Error Handling
//!
//! Every error is fatal and carries the offending line:
//!
//! ```rust
//! # use plusplus::{Error, Scanner};
//! let mut scanner = Scanner::new("number x;\ny := 1;");
//! match scanner.scan_tokens() {
//!     Ok(_) => panic!("Should have failed"),
//!     Err(e) => {
//!         assert!(matches!(e, Error::UndeclaredVariable { line: 2, .. }));
//!         assert_eq!(e.to_string(), "Error on line 2: Undeclared variable 'y'");
//!     }
//! }
//! ```

/// Version of the PlusPlus interpreter
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod pipeline;
pub mod runtime;

// Re-export main types
pub use config::{Config, Limits};
pub use error::{Error, ErrorPhase, Result};
pub use lexer::{Keyword, LineScanner, Operator, Token, TokenKind};
pub use parser::{Block, LoopBody, NodeKind, Operand, Program, Statement, StatementParser, WriteItem};
pub use pipeline::{parse_source, run_source, source_path, tokenize};
pub use runtime::{Evaluator, VariableStore};

/// Type alias for the line scanner (lexer).
/// Converts raw source text into tokens for the parser.
pub type Scanner<'a> = LineScanner<'a>;

/// Type alias for the statement parser.
/// Converts tokens into an abstract syntax tree (AST).
pub type Parser = StatementParser;
