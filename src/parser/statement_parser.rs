use super::ast::{Block, LoopBody, Operand, Program, Statement, WriteItem};
use crate::config::Limits;
use crate::error::{Error, Result};
use crate::lexer::{Keyword, Operator, Token, TokenKind};

/// Recursive descent parser with one token of lookahead
///
/// Statements are dispatched on the current token. A token that cannot start
/// a statement is consumed and dropped rather than reported, so stray words
/// between statements never stop the parse.
pub struct StatementParser {
    tokens: Vec<Token>,
    current: usize,
    limits: Limits,
    depth: usize,
}

impl StatementParser {
    /// Creates a new parser with default limits
    pub fn new(tokens: Vec<Token>) -> Self {
        Self::with_limits(tokens, Limits::default())
    }

    /// Creates a new parser with explicit limits
    pub fn with_limits(mut tokens: Vec<Token>, limits: Limits) -> Self {
        if !matches!(tokens.last(), Some(t) if t.kind == TokenKind::Eof) {
            let line = tokens.last().map_or(1, |t| t.line);
            tokens.push(Token::eof(line));
        }
        StatementParser {
            tokens,
            current: 0,
            limits,
            depth: 0,
        }
    }

    /// Parses the tokens into an AST
    pub fn parse(&mut self) -> Result<Program> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            if let Some(stmt) = self.parse_statement()? {
                self.push_child(&mut statements, stmt)?;
            }
        }

        tracing::debug!(statements = statements.len(), "parsing finished");
        Ok(Program { statements })
    }

    fn parse_statement(&mut self) -> Result<Option<Statement>> {
        let kind = self.peek().kind;
        match kind {
            TokenKind::Keyword(Keyword::Number) => self.parse_declaration().map(Some),
            TokenKind::Keyword(Keyword::Write) => self.parse_write().map(Some),
            TokenKind::Keyword(Keyword::Repeat) => self.parse_loop().map(Some),
            TokenKind::Identifier => {
                let next = self.peek_next().kind;
                match next {
                    TokenKind::Operator(op) => self.parse_update(op).map(Some),
                    _ => Ok(self.skip_unknown()),
                }
            }
            _ => Ok(self.skip_unknown()),
        }
    }

    /// `number name ;`
    fn parse_declaration(&mut self) -> Result<Statement> {
        let line = self.advance().line;
        let name = self.expect_identifier("number")?;
        self.finish_statement();
        Ok(Statement::Declaration { name, line })
    }

    /// `name := operand ;`, `name += operand ;`, `name -= operand ;`
    fn parse_update(&mut self, op: Operator) -> Result<Statement> {
        let target = self.advance();
        self.advance();
        let operand = self.parse_operand(op.as_str())?;
        self.finish_statement();

        let line = target.line;
        let target = target.text;
        Ok(match op {
            Operator::Assign => Statement::Assignment {
                target,
                value: operand,
                line,
            },
            Operator::AddAssign => Statement::Increment {
                target,
                amount: operand,
                line,
            },
            Operator::SubAssign => Statement::Decrement {
                target,
                amount: operand,
                line,
            },
        })
    }

    /// `write item (and? item)* ;`
    fn parse_write(&mut self) -> Result<Statement> {
        let line = self.advance().line;
        let mut items = Vec::new();

        while !matches!(
            self.peek().kind,
            TokenKind::Semicolon | TokenKind::BlockClose | TokenKind::Eof
        ) {
            let token = self.advance();
            let item = match token.kind {
                TokenKind::String => Some(WriteItem::String {
                    text: token.text,
                    line: token.line,
                }),
                TokenKind::Identifier => Some(WriteItem::Variable {
                    name: token.text,
                    line: token.line,
                }),
                TokenKind::Keyword(Keyword::Newline) => {
                    Some(WriteItem::Newline { line: token.line })
                }
                _ => None,
            };
            if let Some(item) = item {
                self.push_child(&mut items, item)?;
            }

            if self.peek().is_keyword(Keyword::And) {
                self.advance();
            }
        }

        self.finish_statement();
        Ok(Statement::Write { items, line })
    }

    /// `repeat operand times (block | statement)`
    fn parse_loop(&mut self) -> Result<Statement> {
        let line = self.advance().line;
        let count = self.parse_operand("repeat")?;

        if self.peek().is_keyword(Keyword::Times) {
            self.advance();
        } else {
            tracing::warn!(line = self.peek().line, found = %self.peek().kind, "expected 'times' after loop count");
        }

        self.depth += 1;
        let body = Limits::check(self.limits.max_nesting, self.depth, "nesting depth", line)
            .and_then(|_| self.parse_loop_body());
        self.depth -= 1;

        Ok(Statement::Loop {
            count,
            body: body?.map(Box::new),
            line,
        })
    }

    fn parse_loop_body(&mut self) -> Result<Option<LoopBody>> {
        match self.peek().kind {
            TokenKind::BlockOpen => self.parse_block().map(|b| Some(LoopBody::Block(b))),
            TokenKind::BlockClose | TokenKind::Eof => Ok(None),
            _ => Ok(self.parse_statement()?.map(LoopBody::Statement)),
        }
    }

    /// `{ statement* }`
    fn parse_block(&mut self) -> Result<Block> {
        let line = self.advance().line;
        let mut statements = Vec::new();

        while !matches!(self.peek().kind, TokenKind::BlockClose | TokenKind::Eof) {
            if let Some(stmt) = self.parse_statement()? {
                self.push_child(&mut statements, stmt)?;
            }
        }
        if self.peek().kind == TokenKind::BlockClose {
            self.advance();
        }

        Ok(Block { statements, line })
    }

    /// `number | identifier`
    fn parse_operand(&mut self, after: &'static str) -> Result<Operand> {
        let token = self.peek();
        let operand = match token.kind {
            TokenKind::Number => Operand::Number {
                text: token.text.clone(),
                line: token.line,
            },
            TokenKind::Identifier => Operand::Variable {
                name: token.text.clone(),
                line: token.line,
            },
            _ => {
                return Err(Error::MissingOperand {
                    after,
                    line: token.line,
                })
            }
        };
        self.advance();
        Ok(operand)
    }

    fn expect_identifier(&mut self, after: &'static str) -> Result<String> {
        let token = self.peek();
        if token.kind == TokenKind::Identifier {
            Ok(self.advance().text)
        } else {
            Err(Error::ExpectedIdentifier {
                after,
                line: token.line,
            })
        }
    }

    /// Consumes the statement terminator
    ///
    /// Whatever follows a statement is taken as its terminator, except `}`
    /// and end of input, which belong to the enclosing construct.
    fn finish_statement(&mut self) {
        let token = self.peek();
        match token.kind {
            TokenKind::Semicolon => {}
            TokenKind::BlockClose | TokenKind::Eof => {
                tracing::warn!(line = token.line, "missing ';' at end of statement");
                return;
            }
            _ => {
                tracing::warn!(line = token.line, found = %token.kind, text = %token.text, "expected ';', consuming token");
            }
        }
        self.advance();
    }

    fn skip_unknown(&mut self) -> Option<Statement> {
        let token = self.advance();
        tracing::debug!(line = token.line, token = %token.kind, text = %token.text, "skipping token");
        None
    }

    fn push_child<T>(&self, children: &mut Vec<T>, child: T) -> Result<()> {
        Limits::check(
            self.limits.max_children,
            children.len() + 1,
            "children per node",
            self.peek().line,
        )?;
        children.push(child);
        Ok(())
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn peek_next(&self) -> &Token {
        let index = (self.current + 1).min(self.tokens.len() - 1);
        &self.tokens[index]
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.current].clone();
        if !self.is_at_end() {
            self.current += 1;
        }
        token
    }
}
