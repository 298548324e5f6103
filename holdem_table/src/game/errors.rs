//! Table error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::entities::{Chips, Position};

/// Coarse classification of a rejected event.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidMove,
    InconsistentState,
    NotFound,
    Closed,
}

/// Errors returned when an event cannot be applied. A rejected event never
/// changes the table.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum TableError {
    /// The move is not legal right now (wrong turn, wrong status, bad amount)
    #[error("invalid move: {0}")]
    InvalidMove(String),

    /// The event contradicts the table state (duplicate join, exhausted deck)
    #[error("inconsistent state: {0}")]
    InconsistentState(String),

    /// Unknown player, or no seat available
    #[error("not found: {0}")]
    NotFound(String),

    /// The table actor has shut down
    #[error("table is closed")]
    Closed,
}

impl TableError {
    pub fn invalid_move(reason: impl Into<String>) -> Self {
        Self::InvalidMove(reason.into())
    }

    pub fn inconsistent(reason: impl Into<String>) -> Self {
        Self::InconsistentState(reason.into())
    }

    pub fn not_found(reason: impl Into<String>) -> Self {
        Self::NotFound(reason.into())
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidMove(_) => ErrorKind::InvalidMove,
            Self::InconsistentState(_) => ErrorKind::InconsistentState,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Closed => ErrorKind::Closed,
        }
    }
}

/// A structural property a snapshot failed to satisfy. These indicate a bug
/// in the state machine, not a bad event.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum InvariantViolation {
    #[error("chips not conserved: expected {expected}, found {found}")]
    ChipsNotConserved { expected: Chips, found: Chips },

    #[error("pot {pot} does not match committed chips {committed}")]
    PotMismatch { pot: Chips, committed: Chips },

    #[error("position {position} held by more than one player")]
    DuplicatePosition { position: Position },

    #[error("current player index {0} does not point at a player who can act")]
    BadCurrentPlayer(usize),
}
