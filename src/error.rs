//! Error types for configuration validation and invariant enforcement.
//!
//! Two kinds of failure are distinguished per the design's error-handling
//! model: a [`ConfigError`] is a caller mistake, reported once before any
//! work is done; a [`SimError::InvariantViolation`] is a programmer error
//! in the engine itself and aborts the run with no partial results.

use thiserror::Error;

/// A single configuration field failed its constraint check.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("configuration invalid: field `{field}` = `{value}` ({reason})")]
pub struct ConfigError {
    pub field: &'static str,
    pub value: String,
    pub reason: &'static str,
}

impl ConfigError {
    pub fn new(field: &'static str, value: impl ToString, reason: &'static str) -> Self {
        Self {
            field,
            value: value.to_string(),
            reason,
        }
    }
}

/// Top-level error returned by the simulation entry points.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// One of the invariants in spec §8 (I1–I5 plus the row/cluster
    /// bounds) failed to hold at the end of a run. This indicates a bug
    /// in the engine, not a bad configuration; no partial statistics are
    /// returned alongside it.
    #[error("internal invariant violated: {invariant} ({detail})")]
    InvariantViolation {
        invariant: &'static str,
        detail: String,
    },
}
