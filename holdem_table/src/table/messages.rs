//! Table actor message types.

use crate::game::{TableError, TableEvent, entities::TableState};
use std::sync::Arc;
use tokio::sync::oneshot;

/// Reply to an event: the snapshot it produced, or why it was rejected
pub type EventResponse = Result<Arc<TableState>, TableError>;

/// Messages that can be sent to a TableActor
#[derive(Debug)]
pub enum TableMessage {
    /// Apply an event from outside the table
    Event {
        event: TableEvent,
        response: oneshot::Sender<EventResponse>,
    },

    /// A timer fired. Ignored unless `token` is still the pending one.
    Scheduled { token: u64, event: TableEvent },

    /// Stop the actor after replying
    Close { response: oneshot::Sender<()> },
}
