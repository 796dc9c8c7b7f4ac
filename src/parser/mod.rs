//! PlusPlus Parser Module
//!
//! Builds the syntax tree from the token stream by recursive descent.

mod ast;
mod statement_parser;

pub use ast::{Block, LoopBody, NodeKind, Operand, Program, Statement, WriteItem};
pub use statement_parser::StatementParser;
