//! Progress rules layered on the ledger
//!
//! Next-question selection is a strictly ascending scan over the catalog:
//! every respondent sees questions in the same canonical order regardless of
//! what they answered.

use std::sync::Arc;

use crate::{Ledger, RespondentId};

/// Stateless view over a shared [`Ledger`]
#[derive(Debug, Clone)]
pub struct ProgressEngine {
    ledger: Arc<Ledger>,
}

impl ProgressEngine {
    pub fn new(ledger: Arc<Ledger>) -> Self {
        Self { ledger }
    }

    pub fn ledger(&self) -> &Arc<Ledger> {
        &self.ledger
    }

    pub fn is_privileged(&self, identity: &RespondentId) -> bool {
        self.ledger.gate().is_privileged(identity)
    }

    /// Smallest unanswered question index, or `None` when all are answered
    ///
    /// Privileged identities always get `None`.
    pub fn next_question(&self, identity: &RespondentId) -> Option<usize> {
        if self.is_privileged(identity) {
            return None;
        }
        let answered = self.ledger.progress_of(identity);
        (0..self.ledger.catalog().question_count()).find(|index| !answered.contains(index))
    }

    /// All questions answered by a non-privileged respondent
    ///
    /// An identity that never voted is not complete: with N >= 1 its next
    /// question is always index 0.
    pub fn is_complete(&self, identity: &RespondentId) -> bool {
        !self.is_privileged(identity) && self.next_question(identity).is_none()
    }

    /// Completion as a percentage in `[0, 100]`, unrounded
    pub fn completion_percent(&self, identity: &RespondentId) -> f64 {
        self.ledger.last_completed_fraction(identity) * 100.0
    }
}
