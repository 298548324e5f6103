//! # Holdem Table
//!
//! A single Texas Hold'em table implemented as a deterministic, replayable
//! state machine that also settles chip balances.
//!
//! Every inbound event (a player joining, a player move, an explicit
//! `next_round`, or a scheduled tick) is applied to an immutable
//! [`TableState`] snapshot and produces a new snapshot. Transitions are
//! all-or-nothing: a rejected event leaves the previous snapshot untouched.
//!
//! ## Core Modules
//!
//! - [`game`]: cards, hand evaluation, positions, betting, pot settlement and
//!   the round/table state machine
//! - [`table`]: the per-table actor that serializes events and scheduled ticks
//!
//! ## Example
//!
//! ```
//! use holdem_table::{GameSettings, Table, TableEvent, TableId, TableStatus};
//! use holdem_table::random::RngSource;
//!
//! let mut table = Table::new(
//!     TableId::new(),
//!     GameSettings::default(),
//!     Box::new(RngSource::from_seed(7)),
//! );
//! table.process_event(TableEvent::join("alice", "Alice")).unwrap();
//! let state = table.process_event(TableEvent::join("bob", "Bob")).unwrap();
//! assert_eq!(state.table_status, TableStatus::Playing);
//! ```

/// Core game logic, entities, and state machine.
pub mod game;
pub use game::{
    ErrorKind, GameSettings, InvariantViolation, Table, TableError, TableEvent,
    constants::{self, MAX_PLAYERS, MIN_PLAYERS},
    entities::{
        self, Action, Card, Chips, Move, Player, PlayerId, PlayerStatus, Position, Street,
        Suit, TableId, TableState, TableStatus,
    },
    functional, random,
};

/// Per-table actor with a single-writer event queue.
pub mod table;
pub use table::{TableActor, TableConfig, TableHandle};
