//! Survey events
//!
//! Emitted by the service layer after the ledger returns, never by the
//! ledger itself, and fanned out to SSE subscribers through [`EventBus`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::model::{Answer, RespondentId, Tally};

/// Survey event types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SurveyEvent {
    /// A vote was accepted
    VoteRecorded {
        identity: RespondentId,
        question: usize,
        answer: Answer,
        /// Tally of `question` right after this vote
        tally: Tally,
        timestamp: DateTime<Utc>,
    },

    /// Ledger was reset by an administrator
    LedgerReset {
        /// Epoch in effect after the reset
        epoch_id: Uuid,
        requested_by: RespondentId,
        timestamp: DateTime<Utc>,
    },
}

impl SurveyEvent {
    /// Get event type as string for SSE event names
    pub fn event_type(&self) -> &str {
        match self {
            SurveyEvent::VoteRecorded { .. } => "VoteRecorded",
            SurveyEvent::LedgerReset { .. } => "LedgerReset",
        }
    }
}

/// Broadcast channel for survey events
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<SurveyEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus buffering up to `capacity` events per subscriber
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<SurveyEvent> {
        self.tx.subscribe()
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: SurveyEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
