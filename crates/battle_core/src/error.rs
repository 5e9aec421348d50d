//! Error types for the battle simulation.
//!
//! The simulation loop itself never fails: missing targets and rejected
//! placements are ordinary `None` results. Errors come from loading
//! data and configuration, and from roster self-checks.

use thiserror::Error;

/// Result type alias using [`BattleError`].
pub type Result<T> = std::result::Result<T, BattleError>;

/// Top-level error type for the battle core.
#[derive(Debug, Error)]
pub enum BattleError {
    /// Data document parsing error.
    #[error("Failed to parse {what}: {message}")]
    DataParseError {
        /// What was being parsed (e.g. "unit catalog").
        what: String,
        /// Error message.
        message: String,
    },

    /// Configuration value out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Roster broke one of its own invariants.
    #[error("Invalid roster state: {0}")]
    InvalidState(String),

    /// Unit catalog is missing an entry the battle needs.
    #[error("Unit catalog has no entry for '{0}'")]
    MissingUnitData(String),
}

impl BattleError {
    /// Wrap a RON parse failure.
    pub(crate) fn parse(what: &str, err: impl std::fmt::Display) -> Self {
        Self::DataParseError {
            what: what.to_string(),
            message: err.to_string(),
        }
    }
}
