//! Interpreter configuration
//!
//! All capacities in the interpreter are unbounded by default. [`Limits`]
//! turns any of them into a soft ceiling that fails with
//! [`Error::LimitExceeded`] instead of silently dropping input.
//!
//! Configuration is layered: built-in defaults, then the JSON file named by
//! `PPP_CONFIG`, then individual `PPP_MAX_*` environment variables.

use std::fs;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable naming a JSON configuration file
pub const CONFIG_PATH_VAR: &str = "PPP_CONFIG";

/// Default nesting ceiling for loop bodies and blocks
pub const DEFAULT_MAX_NESTING: usize = 256;

/// Top-level interpreter configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Soft capacity limits
    pub limits: Limits,
}

/// Soft capacity limits; `None` means unbounded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Limits {
    /// Tokens produced by the lexer (end-of-input excluded)
    pub max_tokens: Option<usize>,
    /// Distinct names introduced by `number`
    pub max_declared_names: Option<usize>,
    /// Simultaneously open `{` braces
    pub max_block_depth: Option<usize>,
    /// Statements in the program or a block, items in a `write`
    pub max_children: Option<usize>,
    /// Runtime variable cells
    pub max_cells: Option<usize>,
    /// Nested statements while parsing (loop inside loop inside ...)
    pub max_nesting: Option<usize>,
    /// Iterations of a single `repeat` loop
    pub max_loop_iterations: Option<usize>,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_tokens: None,
            max_declared_names: None,
            max_block_depth: None,
            max_children: None,
            max_cells: None,
            max_nesting: Some(DEFAULT_MAX_NESTING),
            max_loop_iterations: None,
        }
    }
}

impl Limits {
    /// Limits with every ceiling removed
    pub fn unbounded() -> Self {
        Limits {
            max_nesting: None,
            ..Limits::default()
        }
    }

    /// Fails with [`Error::LimitExceeded`] when `count` would go past `limit`
    pub(crate) fn check(
        limit: Option<usize>,
        count: usize,
        what: &'static str,
        line: usize,
    ) -> Result<()> {
        match limit {
            Some(max) if count > max => Err(Error::limit(what, max, line)),
            _ => Ok(()),
        }
    }
}

impl Config {
    /// Parses a configuration from JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::config(e.to_string()))
    }

    /// Loads the configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads the configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(CONFIG_PATH_VAR) {
            Some(path) => {
                let text = fs::read_to_string(&path)
                    .map_err(|e| Error::config(format!("cannot read '{}': {}", path, e)))?;
                tracing::debug!(path = %path, "loaded configuration file");
                Self::from_json(&text)?
            }
            None => Config::default(),
        };

        let limits = &mut config.limits;
        let overrides: [(&str, &mut Option<usize>); 7] = [
            ("PPP_MAX_TOKENS", &mut limits.max_tokens),
            ("PPP_MAX_DECLARED_NAMES", &mut limits.max_declared_names),
            ("PPP_MAX_BLOCK_DEPTH", &mut limits.max_block_depth),
            ("PPP_MAX_CHILDREN", &mut limits.max_children),
            ("PPP_MAX_CELLS", &mut limits.max_cells),
            ("PPP_MAX_NESTING", &mut limits.max_nesting),
            ("PPP_MAX_LOOP_ITERATIONS", &mut limits.max_loop_iterations),
        ];
        for (key, slot) in overrides {
            if let Some(raw) = lookup(key) {
                let value = raw.trim().parse::<usize>().map_err(|_| {
                    Error::config(format!("{} must be a non-negative integer, got '{}'", key, raw))
                })?;
                *slot = Some(value);
            }
        }

        Ok(config)
    }
}
