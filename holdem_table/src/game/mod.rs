//! Poker game engine - the pure table state machine.
//!
//! This module provides:
//! - Cards, deck and the injectable shuffle source
//! - Hand evaluation and comparison
//! - Seat positions and turn order
//! - Move validation and blind posting
//! - Side-pot settlement
//! - Round and game lifecycle

pub mod betting;
pub mod constants;
pub mod entities;
pub mod errors;
pub mod functional;
pub mod positions;
pub mod random;
pub mod settlement;
pub mod state_machine;

pub use entities::GameSettings;
pub use errors::{ErrorKind, InvariantViolation, TableError};
pub use state_machine::{Table, TableEvent, check_invariants, process_event};
