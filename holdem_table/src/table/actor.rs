//! Table actor implementation with async message handling.
//!
//! The actor is the only writer of its table. Events from handles and
//! timer ticks all arrive through the same inbox and are applied one at a
//! time; readers get the latest snapshot from a `watch` channel without
//! going through the inbox.

use super::{
    config::{ConfigError, TableConfig},
    messages::{EventResponse, TableMessage},
};
use crate::game::{
    TableError, TableEvent,
    entities::{TableId, TableState, TableStatus},
    process_event,
    random::RandomSource,
};
use std::sync::Arc;
use tokio::{
    sync::{mpsc, oneshot, watch},
    task::JoinHandle,
    time::Duration,
};

const INBOX_CAPACITY: usize = 100;

/// Table actor handle for sending messages
#[derive(Clone, Debug)]
pub struct TableHandle {
    sender: mpsc::Sender<TableMessage>,
    snapshots: watch::Receiver<Arc<TableState>>,
    table_id: TableId,
}

impl TableHandle {
    /// Get table ID
    pub fn table_id(&self) -> TableId {
        self.table_id
    }

    /// Queue an event and wait for the snapshot it produced
    pub async fn process_event(&self, event: TableEvent) -> EventResponse {
        let (response, reply) = oneshot::channel();
        self.sender
            .send(TableMessage::Event { event, response })
            .await
            .map_err(|_| TableError::Closed)?;
        reply.await.map_err(|_| TableError::Closed)?
    }

    /// Latest committed snapshot. Never waits on the actor.
    pub fn current_state(&self) -> Arc<TableState> {
        self.snapshots.borrow().clone()
    }

    /// Receiver that sees every snapshot the actor commits from now on
    pub fn subscribe(&self) -> watch::Receiver<Arc<TableState>> {
        self.snapshots.clone()
    }

    /// Stop the actor. Pending timers are dropped.
    pub async fn close(&self) -> Result<(), TableError> {
        let (response, reply) = oneshot::channel();
        self.sender
            .send(TableMessage::Close { response })
            .await
            .map_err(|_| TableError::Closed)?;
        reply.await.map_err(|_| TableError::Closed)
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Timer that will deliver a scheduled event unless superseded first
struct PendingTick {
    token: u64,
    task: JoinHandle<()>,
}

/// Table actor managing a single poker table
pub struct TableActor {
    /// Table configuration
    config: TableConfig,

    /// Latest committed snapshot
    state: Arc<TableState>,

    /// Shuffle source for every deal
    rng: Box<dyn RandomSource>,

    /// Message inbox
    inbox: mpsc::Receiver<TableMessage>,

    /// Lets timers post to the inbox without keeping the actor alive
    scheduler: mpsc::WeakSender<TableMessage>,

    /// Publishes snapshots to handles
    snapshots: watch::Sender<Arc<TableState>>,

    /// Tick currently waiting to fire, if any
    pending: Option<PendingTick>,

    next_token: u64,
}

impl TableActor {
    /// Create a new table actor
    ///
    /// # Errors
    ///
    /// Returns the first configuration problem found by
    /// [`TableConfig::validate`].
    pub fn new(
        config: TableConfig,
        rng: Box<dyn RandomSource>,
    ) -> Result<(Self, TableHandle), ConfigError> {
        config.validate()?;

        let table_id = TableId::new();
        let (sender, inbox) = mpsc::channel(INBOX_CAPACITY);
        let state = Arc::new(TableState::new(table_id, config.settings()));
        let (snapshots, snapshot_rx) = watch::channel(state.clone());

        let actor = Self {
            config,
            state,
            rng,
            inbox,
            scheduler: sender.downgrade(),
            snapshots,
            pending: None,
            next_token: 0,
        };
        let handle = TableHandle {
            sender,
            snapshots: snapshot_rx,
            table_id,
        };
        Ok((actor, handle))
    }

    /// Create the actor and run it on the current tokio runtime
    pub fn spawn(
        config: TableConfig,
        rng: Box<dyn RandomSource>,
    ) -> Result<TableHandle, ConfigError> {
        let (actor, handle) = Self::new(config, rng)?;
        tokio::spawn(actor.run());
        Ok(handle)
    }

    /// Run the table actor event loop
    pub async fn run(mut self) {
        log::info!("Table {} '{}' starting", self.state.table_id, self.config.name);

        while let Some(message) = self.inbox.recv().await {
            if !self.handle_message(message) {
                break;
            }
        }
        self.cancel_pending();

        log::info!("Table {} '{}' closed", self.state.table_id, self.config.name);
    }

    /// Handle a table message. Returns false once the actor should stop.
    fn handle_message(&mut self, message: TableMessage) -> bool {
        match message {
            TableMessage::Event { event, response } => {
                let result = self.apply(event);
                let _ = response.send(result);
            }

            TableMessage::Scheduled { token, event } => {
                if self.pending.as_ref().is_none_or(|p| p.token != token) {
                    log::debug!("Table {}: ignoring stale tick {token}", self.state.table_id);
                    return true;
                }
                self.pending = None;
                if let Err(e) = self.apply(event) {
                    log::warn!("Table {}: scheduled event rejected: {e}", self.state.table_id);
                }
            }

            TableMessage::Close { response } => {
                let _ = response.send(());
                return false;
            }
        }
        true
    }

    /// Apply an event, publish the snapshot and re-arm the timers
    fn apply(&mut self, event: TableEvent) -> EventResponse {
        let next = process_event(&self.state, event, self.rng.as_mut())?;
        self.state = Arc::new(next);
        self.snapshots.send_replace(self.state.clone());
        self.reschedule();
        Ok(self.state.clone())
    }

    /// Arms the timer the new snapshot calls for. Any earlier timer is
    /// superseded.
    fn reschedule(&mut self) {
        match self.state.table_status {
            TableStatus::RoundOver => {
                self.schedule(TableEvent::NextRound, self.config.round_over_delay());
            }
            TableStatus::GameOver if self.config.auto_restart_enabled => {
                self.schedule(TableEvent::Restart, self.config.auto_restart_delay());
            }
            _ => self.cancel_pending(),
        }
    }

    fn schedule(&mut self, event: TableEvent, delay: Duration) {
        self.cancel_pending();
        let token = self.next_token;
        self.next_token += 1;
        log::debug!(
            "Table {}: {event:?} scheduled in {delay:?} (tick {token})",
            self.state.table_id
        );

        let scheduler = self.scheduler.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(sender) = scheduler.upgrade() {
                let _ = sender.send(TableMessage::Scheduled { token, event }).await;
            }
        });
        self.pending = Some(PendingTick { token, task });
    }

    fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.task.abort();
        }
    }
}
