use serde::{Deserialize, Serialize};
use std::fmt;

/// Complete PlusPlus program
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Program {
    /// Top-level statements in source order
    pub statements: Vec<Statement>,
}

/// Statements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Statement {
    /// Variable declaration: `number x;`
    Declaration {
        /// Declared name
        name: String,
        /// Line of the `number` keyword
        line: usize,
    },

    /// Assignment: `x := operand;`
    Assignment {
        /// Cell being written
        target: String,
        /// Value to store
        value: Operand,
        /// Line of the target
        line: usize,
    },

    /// Increment: `x += operand;`
    Increment {
        /// Cell being updated
        target: String,
        /// Amount to add
        amount: Operand,
        /// Line of the target
        line: usize,
    },

    /// Decrement: `x -= operand;`
    Decrement {
        /// Cell being updated
        target: String,
        /// Amount to subtract
        amount: Operand,
        /// Line of the target
        line: usize,
    },

    /// Print statement: `write "a" and x and newline;`
    Write {
        /// Items printed in order
        items: Vec<WriteItem>,
        /// Line of the `write` keyword
        line: usize,
    },

    /// Fixed-count loop: `repeat n times body`
    Loop {
        /// Iteration count, evaluated once on entry
        count: Operand,
        /// Loop body; `None` when the body statement was skipped
        body: Option<Box<LoopBody>>,
        /// Line of the `repeat` keyword
        line: usize,
    },
}

/// Body of a `repeat` loop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoopBody {
    /// `{ ... }`
    Block(Block),
    /// A single statement with no braces
    Statement(Statement),
}

/// Brace-delimited statement sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Statements in source order
    pub statements: Vec<Statement>,
    /// Line of the opening `{`
    pub line: usize,
}

/// Number literal or variable reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operand {
    /// Numeric literal with its source text
    Number {
        /// Literal text, kept verbatim
        text: String,
        /// Source line
        line: usize,
    },
    /// Variable reference
    Variable {
        /// Variable name
        name: String,
        /// Source line
        line: usize,
    },
}

/// Item of a `write` statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WriteItem {
    /// String literal printed verbatim
    String {
        /// Literal contents
        text: String,
        /// Source line
        line: usize,
    },
    /// Variable printed as a decimal integer
    Variable {
        /// Variable name
        name: String,
        /// Source line
        line: usize,
    },
    /// Line break
    Newline {
        /// Source line
        line: usize,
    },
}

/// Kinds of nodes in the parse tree dump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Program,
    Declaration,
    Assignment,
    Increment,
    Decrement,
    Write,
    Loop,
    Block,
    Variable,
    Number,
    String,
    Newline,
}

impl NodeKind {
    /// Label used in the tree dump
    pub fn label(self) -> &'static str {
        match self {
            NodeKind::Program => "PROGRAM",
            NodeKind::Declaration => "DECLARATION",
            NodeKind::Assignment => "ASSIGNMENT",
            NodeKind::Increment => "INCREMENT",
            NodeKind::Decrement => "DECREMENT",
            NodeKind::Write => "WRITE",
            NodeKind::Loop => "LOOP",
            NodeKind::Block => "BLOCK",
            NodeKind::Variable => "VARIABLE",
            NodeKind::Number => "NUMBER",
            NodeKind::String => "STRING",
            NodeKind::Newline => "NEWLINE",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Statement {
    /// Node kind of this statement
    pub fn kind(&self) -> NodeKind {
        match self {
            Statement::Declaration { .. } => NodeKind::Declaration,
            Statement::Assignment { .. } => NodeKind::Assignment,
            Statement::Increment { .. } => NodeKind::Increment,
            Statement::Decrement { .. } => NodeKind::Decrement,
            Statement::Write { .. } => NodeKind::Write,
            Statement::Loop { .. } => NodeKind::Loop,
        }
    }

    /// Source line of this statement
    pub fn line(&self) -> usize {
        match self {
            Statement::Declaration { line, .. }
            | Statement::Assignment { line, .. }
            | Statement::Increment { line, .. }
            | Statement::Decrement { line, .. }
            | Statement::Write { line, .. }
            | Statement::Loop { line, .. } => *line,
        }
    }

    fn write_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write_node(f, depth, self.kind(), None)?;
        match self {
            Statement::Declaration { name, .. } => {
                write_node(f, depth + 1, NodeKind::Variable, Some(name))
            }
            Statement::Assignment { target, value: operand, .. }
            | Statement::Increment { target, amount: operand, .. }
            | Statement::Decrement { target, amount: operand, .. } => {
                write_node(f, depth + 1, NodeKind::Variable, Some(target))?;
                operand.write_tree(f, depth + 1)
            }
            Statement::Write { items, .. } => {
                for item in items {
                    item.write_tree(f, depth + 1)?;
                }
                Ok(())
            }
            Statement::Loop { count, body, .. } => {
                count.write_tree(f, depth + 1)?;
                match body.as_deref() {
                    Some(LoopBody::Block(block)) => block.write_tree(f, depth + 1),
                    Some(LoopBody::Statement(stmt)) => stmt.write_tree(f, depth + 1),
                    None => Ok(()),
                }
            }
        }
    }
}

impl Block {
    fn write_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write_node(f, depth, NodeKind::Block, None)?;
        for stmt in &self.statements {
            stmt.write_tree(f, depth + 1)?;
        }
        Ok(())
    }
}

impl Operand {
    /// Source line of the operand
    pub fn line(&self) -> usize {
        match self {
            Operand::Number { line, .. } | Operand::Variable { line, .. } => *line,
        }
    }

    fn write_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        match self {
            Operand::Number { text, .. } => write_node(f, depth, NodeKind::Number, Some(text)),
            Operand::Variable { name, .. } => write_node(f, depth, NodeKind::Variable, Some(name)),
        }
    }
}

impl WriteItem {
    fn write_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        match self {
            WriteItem::String { text, .. } => write_node(f, depth, NodeKind::String, Some(text)),
            WriteItem::Variable { name, .. } => {
                write_node(f, depth, NodeKind::Variable, Some(name))
            }
            WriteItem::Newline { .. } => write_node(f, depth, NodeKind::Newline, None),
        }
    }
}

/// One dump line: two spaces per depth level, label, optional `(payload)`
fn write_node(
    f: &mut fmt::Formatter<'_>,
    depth: usize,
    kind: NodeKind,
    payload: Option<&str>,
) -> fmt::Result {
    write!(f, "{:width$}{}", "", kind, width = depth * 2)?;
    if let Some(payload) = payload {
        write!(f, "({})", payload)?;
    }
    writeln!(f)
}

/// Renders the parse tree, one node per line
impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_node(f, 0, NodeKind::Program, None)?;
        for stmt in &self.statements {
            stmt.write_tree(f, 1)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_dump_layout() {
        let program = Program {
            statements: vec![
                Statement::Declaration {
                    name: "n".to_string(),
                    line: 1,
                },
                Statement::Loop {
                    count: Operand::Number {
                        text: "2".to_string(),
                        line: 2,
                    },
                    body: Some(Box::new(LoopBody::Block(Block {
                        statements: vec![Statement::Write {
                            items: vec![
                                WriteItem::String {
                                    text: "hi".to_string(),
                                    line: 2,
                                },
                                WriteItem::Newline { line: 2 },
                            ],
                            line: 2,
                        }],
                        line: 2,
                    }))),
                    line: 2,
                },
            ],
        };

        let expected = "\
PROGRAM
  DECLARATION
    VARIABLE(n)
  LOOP
    NUMBER(2)
    BLOCK
      WRITE
        STRING(hi)
        NEWLINE
";
        assert_eq!(program.to_string(), expected);
    }

    #[test]
    fn test_empty_program_dump() {
        assert_eq!(Program::default().to_string(), "PROGRAM\n");
    }

    #[test]
    fn test_statement_kind_and_line() {
        let stmt = Statement::Decrement {
            target: "x".to_string(),
            amount: Operand::Variable {
                name: "y".to_string(),
                line: 9,
            },
            line: 9,
        };
        assert_eq!(stmt.kind(), NodeKind::Decrement);
        assert_eq!(stmt.line(), 9);
    }
}
