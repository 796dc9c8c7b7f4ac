use std::collections::HashMap;

use crate::config::Limits;
use crate::error::{Error, Result};

/// Runtime storage: one signed 64-bit cell per name
///
/// Cells are created by declarations and assignments and never removed.
/// Reading a missing cell yields zero.
#[derive(Debug, Clone, Default)]
pub struct VariableStore {
    /// Cell values by name
    cells: HashMap<String, i64>,
    /// Ceiling on the number of cells
    max_cells: Option<usize>,
}

impl VariableStore {
    /// Creates an empty, unbounded store
    pub fn new() -> Self {
        VariableStore::default()
    }

    /// Creates an empty store holding at most `max_cells` cells
    pub fn with_limit(max_cells: Option<usize>) -> Self {
        VariableStore {
            cells: HashMap::new(),
            max_cells,
        }
    }

    /// Creates the cell, or resets an existing one, to zero
    pub fn declare(&mut self, name: &str, line: usize) -> Result<()> {
        self.assign(name, 0, line)
    }

    /// Stores a value, creating the cell if absent
    pub fn assign(&mut self, name: &str, value: i64, line: usize) -> Result<()> {
        if let Some(cell) = self.cells.get_mut(name) {
            *cell = value;
            return Ok(());
        }
        Limits::check(self.max_cells, self.cells.len() + 1, "runtime cells", line)?;
        self.cells.insert(name.to_string(), value);
        Ok(())
    }

    /// Adds `delta` to an existing cell
    ///
    /// Returns `Ok(false)` without creating anything when the cell is absent.
    pub fn add(&mut self, name: &str, delta: i64, line: usize) -> Result<bool> {
        self.update(name, line, |v| v.checked_add(delta))
    }

    /// Subtracts `delta` from an existing cell
    ///
    /// Returns `Ok(false)` without creating anything when the cell is absent.
    pub fn subtract(&mut self, name: &str, delta: i64, line: usize) -> Result<bool> {
        self.update(name, line, |v| v.checked_sub(delta))
    }

    fn update<F>(&mut self, name: &str, line: usize, op: F) -> Result<bool>
    where
        F: FnOnce(i64) -> Option<i64>,
    {
        match self.cells.get_mut(name) {
            Some(cell) => {
                *cell = op(*cell).ok_or(Error::ArithmeticOverflow { line })?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Value of a cell, if it exists
    pub fn get(&self, name: &str) -> Option<i64> {
        self.cells.get(name).copied()
    }

    /// Value of a cell, zero if it does not exist
    pub fn value_of(&self, name: &str) -> i64 {
        self.get(name).unwrap_or(0)
    }

    /// Checks if a cell exists
    pub fn exists(&self, name: &str) -> bool {
        self.cells.contains_key(name)
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if no cell was created yet
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declare_creates_zero_and_resets() {
        let mut store = VariableStore::new();
        store.declare("x", 1).unwrap();
        assert_eq!(store.get("x"), Some(0));
        store.assign("x", 9, 2).unwrap();
        store.declare("x", 3).unwrap();
        assert_eq!(store.get("x"), Some(0));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_missing_cell_reads_zero() {
        let store = VariableStore::new();
        assert_eq!(store.get("ghost"), None);
        assert_eq!(store.value_of("ghost"), 0);
    }

    #[test]
    fn test_update_absent_is_noop() {
        let mut store = VariableStore::new();
        assert!(!store.add("x", 5, 1).unwrap());
        assert!(!store.subtract("x", 5, 1).unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn test_update_existing() {
        let mut store = VariableStore::new();
        store.declare("x", 1).unwrap();
        assert!(store.add("x", 5, 2).unwrap());
        assert!(store.subtract("x", 7, 3).unwrap());
        assert_eq!(store.value_of("x"), -2);
    }

    #[test]
    fn test_overflow_is_an_error() {
        let mut store = VariableStore::new();
        store.assign("x", i64::MAX, 1).unwrap();
        let err = store.add("x", 1, 4).unwrap_err();
        assert!(matches!(err, Error::ArithmeticOverflow { line: 4 }));
        assert_eq!(store.value_of("x"), i64::MAX);
    }

    #[test]
    fn test_cell_limit() {
        let mut store = VariableStore::with_limit(Some(1));
        store.declare("a", 1).unwrap();
        store.assign("a", 3, 2).unwrap();
        let err = store.declare("b", 3).unwrap_err();
        assert!(matches!(err, Error::LimitExceeded { what: "runtime cells", limit: 1, line: 3 }));
    }
}
