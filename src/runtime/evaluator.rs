use std::io::Write;

use super::store::VariableStore;
use crate::config::Limits;
use crate::error::{Error, Result};
use crate::parser::{Block, LoopBody, Operand, Program, Statement, WriteItem};

/// Tree-walking evaluator
///
/// Executes statements in order against a [`VariableStore`] and writes
/// `write` output to the given sink:
/// - `number x;` - create or reset `x` to zero
/// - `x := v;` - store `v`, creating `x` if needed
/// - `x += v;` / `x -= v;` - update `x` only if it exists
/// - `repeat n times body` - run `body` `n` times, `n` fixed on entry
pub struct Evaluator {
    /// Runtime cells
    store: VariableStore,
    /// Soft capacity limits
    limits: Limits,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    /// Creates a new evaluator with default limits
    pub fn new() -> Self {
        Self::with_limits(Limits::default())
    }

    /// Creates a new evaluator with explicit limits
    pub fn with_limits(limits: Limits) -> Self {
        Evaluator {
            store: VariableStore::with_limit(limits.max_cells),
            limits,
        }
    }

    /// Runtime cells after (or during) execution
    pub fn store(&self) -> &VariableStore {
        &self.store
    }

    /// Executes a program, writing its output to `out`
    pub fn execute<W: Write>(&mut self, program: &Program, out: &mut W) -> Result<()> {
        for stmt in &program.statements {
            self.execute_statement(stmt, out)?;
        }
        tracing::debug!(cells = self.store.len(), "execution finished");
        Ok(())
    }

    fn execute_statement<W: Write>(&mut self, stmt: &Statement, out: &mut W) -> Result<()> {
        tracing::trace!(line = stmt.line(), kind = %stmt.kind(), "executing");

        match stmt {
            Statement::Declaration { name, line } => self.store.declare(name, *line),

            Statement::Assignment {
                target,
                value,
                line,
            } => {
                let value = self.evaluate_operand(value);
                self.store.assign(target, value, *line)
            }

            Statement::Increment {
                target,
                amount,
                line,
            } => {
                let amount = self.evaluate_operand(amount);
                if !self.store.add(target, amount, *line)? {
                    tracing::debug!(line, target = %target, "increment of missing cell ignored");
                }
                Ok(())
            }

            Statement::Decrement {
                target,
                amount,
                line,
            } => {
                let amount = self.evaluate_operand(amount);
                if !self.store.subtract(target, amount, *line)? {
                    tracing::debug!(line, target = %target, "decrement of missing cell ignored");
                }
                Ok(())
            }

            Statement::Write { items, .. } => {
                for item in items {
                    match item {
                        WriteItem::String { text, .. } => write!(out, "{}", text)?,
                        WriteItem::Variable { name, .. } => {
                            write!(out, "{}", self.store.value_of(name))?
                        }
                        WriteItem::Newline { .. } => writeln!(out)?,
                    }
                }
                Ok(())
            }

            Statement::Loop { count, body, line } => {
                let iterations = self.evaluate_operand(count);
                if iterations <= 0 {
                    return Ok(());
                }
                if let Some(limit) = self.limits.max_loop_iterations {
                    if iterations as u64 > limit as u64 {
                        return Err(Error::TooManyIterations { limit, line: *line });
                    }
                }

                match body.as_deref() {
                    Some(LoopBody::Block(block)) if !block.statements.is_empty() => {
                        for _ in 0..iterations {
                            self.execute_block(block, out)?;
                        }
                    }
                    Some(LoopBody::Statement(body)) => {
                        for _ in 0..iterations {
                            self.execute_statement(body, out)?;
                        }
                    }
                    _ => {}
                }
                Ok(())
            }
        }
    }

    fn execute_block<W: Write>(&mut self, block: &Block, out: &mut W) -> Result<()> {
        for stmt in &block.statements {
            self.execute_statement(stmt, out)?;
        }
        Ok(())
    }

    fn evaluate_operand(&self, operand: &Operand) -> i64 {
        match operand {
            Operand::Number { text, .. } => literal_value(text),
            Operand::Variable { name, .. } => self.store.value_of(name),
        }
    }
}

/// Integer value of a numeric literal
///
/// Only the sign and the leading digits count: everything from the first
/// `.` or exponent marker on is ignored, so `7.9` is `7`, `-2.5` is `-2` and
/// `1e3` is `1`. Values outside the `i64` range saturate.
pub fn literal_value(text: &str) -> i64 {
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, digit| {
            let digit = i64::from(digit - b'0');
            if negative {
                acc.saturating_mul(10).saturating_sub(digit)
            } else {
                acc.saturating_mul(10).saturating_add(digit)
            }
        })
}
