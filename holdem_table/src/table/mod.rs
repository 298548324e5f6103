//! Table module running a table as an async actor.
//!
//! This module implements:
//! - TableActor: async actor owning a single table's snapshot
//! - TableHandle: cloneable sender plus a lock-free snapshot reader
//! - Scheduled ticks for the round-over delay and auto-restart
//! - Table configuration and validation
//!
//! ## Architecture
//!
//! Each table runs in a separate Tokio task with an mpsc message inbox.
//! Timers are small tasks that sleep and then post a tokenized message to
//! the same inbox, so a tick is applied exactly like any other event. A
//! newer snapshot supersedes the pending tick.
//!
//! ## Example
//!
//! ```
//! use holdem_table::{TableActor, TableConfig, TableEvent, TableStatus};
//! use holdem_table::random::RngSource;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let handle = TableActor::spawn(TableConfig::default(), Box::new(RngSource::from_seed(1)))
//!     .expect("default config is valid");
//! handle.process_event(TableEvent::join("alice", "Alice")).await.unwrap();
//! let state = handle.process_event(TableEvent::join("bob", "Bob")).await.unwrap();
//! assert_eq!(state.table_status, TableStatus::Playing);
//! assert_eq!(handle.current_state().round.round_number, 1);
//! # }
//! ```

pub mod actor;
pub mod config;
pub mod messages;

pub use actor::{TableActor, TableHandle};
pub use config::{ConfigError, TableConfig};
pub use messages::{EventResponse, TableMessage};
