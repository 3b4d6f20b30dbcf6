//! Survey ledger
//!
//! Owns all mutable survey state for one epoch: per-question tallies and
//! per-respondent progress, answer history and metadata. Every mutation and
//! every consistent read goes through a single `RwLock` over the epoch, so:
//! - a vote's "already answered?" check and its update happen under one write guard
//! - a snapshot sees exactly one epoch and only fully applied votes
//! - a reset replaces the whole epoch while holding the write guard
//!
//! No operation performs I/O or suspends; guards are never held across `.await`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};
use uuid::Uuid;

use crate::model::{Answer, AnswerLogEntry, RespondentId, Tally, VoteOutcome};
use crate::{AdminGate, Error, QuestionCatalog, Result};

/// Progress, history and metadata for one respondent
#[derive(Debug, Clone)]
struct RespondentRecord {
    identity: RespondentId,
    progress: BTreeMap<usize, Answer>,
    answer_log: Vec<AnswerLogEntry>,
    display_name: String,
    last_active: DateTime<Utc>,
}

/// State between one reset and the next
#[derive(Debug)]
struct Epoch {
    id: Uuid,
    started_at: DateTime<Utc>,
    tallies: Vec<Tally>,
    /// Respondents in order of first accepted vote
    respondents: Vec<RespondentRecord>,
    positions: HashMap<RespondentId, usize>,
}

impl Epoch {
    fn new(question_count: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            tallies: vec![Tally::default(); question_count],
            respondents: Vec::new(),
            positions: HashMap::new(),
        }
    }

    fn record(&self, identity: &RespondentId) -> Option<&RespondentRecord> {
        self.positions.get(identity).map(|&pos| &self.respondents[pos])
    }

    fn is_empty(&self) -> bool {
        self.respondents.is_empty() && self.tallies.iter().all(|t| t.total() == 0)
    }
}

/// Per-respondent line of a snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RespondentSummary {
    pub identity: RespondentId,
    pub display_name: String,
    pub answered_count: usize,
    /// answered_count / N, in `[0, 1]`
    pub completion: f64,
    pub last_active: DateTime<Utc>,
}

/// Immutable copy of one epoch's aggregate state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerSnapshot {
    pub epoch_id: Uuid,
    pub epoch_started_at: DateTime<Utc>,
    pub taken_at: DateTime<Utc>,
    pub question_count: usize,
    pub tallies: Vec<Tally>,
    pub respondent_count: usize,
    pub total_votes: u64,
    /// Respondents in order of first accepted vote
    pub respondents: Vec<RespondentSummary>,
}

/// In-memory survey ledger
///
/// Constructed once by the process entry point and shared by `Arc`.
#[derive(Debug)]
pub struct Ledger {
    catalog: Arc<QuestionCatalog>,
    gate: Arc<AdminGate>,
    epoch: RwLock<Epoch>,
}

impl Ledger {
    pub fn new(catalog: Arc<QuestionCatalog>, gate: Arc<AdminGate>) -> Self {
        let epoch = Epoch::new(catalog.question_count());
        Self {
            catalog,
            gate,
            epoch: RwLock::new(epoch),
        }
    }

    pub fn catalog(&self) -> &Arc<QuestionCatalog> {
        &self.catalog
    }

    pub fn gate(&self) -> &Arc<AdminGate> {
        &self.gate
    }

    // Guards recover from poisoning: all checks run before any field is
    // touched, so a panicking holder cannot leave a half-applied vote.
    fn read(&self) -> RwLockReadGuard<'_, Epoch> {
        self.epoch.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Epoch> {
        self.epoch.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record one vote; the display name defaults to the identity itself
    pub fn record_vote(&self, identity: &RespondentId, question: usize, token: &str) -> VoteOutcome {
        self.record_vote_as(identity, None, question, token)
    }

    /// Record one vote, refreshing the respondent's display name
    ///
    /// Checks run in order: privileged identity, question index, answer
    /// token, already answered. Only `Accepted` changes state.
    pub fn record_vote_as(
        &self,
        identity: &RespondentId,
        display_name: Option<&str>,
        question: usize,
        token: &str,
    ) -> VoteOutcome {
        if self.gate.is_privileged(identity) {
            return VoteOutcome::RejectedPrivileged;
        }
        if !self.catalog.contains(question) {
            return VoteOutcome::RejectedInvalidIndex;
        }
        let answer: Answer = match token.parse() {
            Ok(answer) => answer,
            Err(_) => return VoteOutcome::RejectedInvalidAnswer,
        };

        let mut guard = self.write();
        let epoch = &mut *guard;
        // Read the clock under the guard so answer_log stays time-ordered
        let mut now = Utc::now();

        let pos = match epoch.positions.get(identity).copied() {
            Some(pos) => {
                let record = &epoch.respondents[pos];
                if record.progress.contains_key(&question) {
                    return VoteOutcome::RejectedAlreadyAnswered;
                }
                // Wall clock may step backwards; last_active never does
                now = now.max(record.last_active);
                pos
            }
            None => {
                let pos = epoch.respondents.len();
                epoch.respondents.push(RespondentRecord {
                    identity: identity.clone(),
                    progress: BTreeMap::new(),
                    answer_log: Vec::new(),
                    display_name: identity.to_string(),
                    last_active: now,
                });
                epoch.positions.insert(identity.clone(), pos);
                pos
            }
        };

        epoch.tallies[question].add(answer);

        let record = &mut epoch.respondents[pos];
        record.progress.insert(question, answer);
        record.answer_log.push(AnswerLogEntry {
            question,
            answer,
            timestamp: now,
        });
        if let Some(name) = display_name {
            record.display_name = name.to_string();
        }
        record.last_active = now;

        debug!(
            "Vote accepted: respondent={} question={} answer={} answered={}",
            identity,
            question,
            answer,
            record.progress.len()
        );

        VoteOutcome::Accepted
    }

    /// Answered question indices in ascending order
    ///
    /// Empty for unknown and privileged identities.
    pub fn progress_of(&self, identity: &RespondentId) -> BTreeSet<usize> {
        if self.gate.is_privileged(identity) {
            return BTreeSet::new();
        }
        self.read()
            .record(identity)
            .map(|r| r.progress.keys().copied().collect())
            .unwrap_or_default()
    }

    /// answeredCount / N in `[0, 1]`; privileged identities yield 0
    pub fn last_completed_fraction(&self, identity: &RespondentId) -> f64 {
        let answered = self.progress_of(identity).len();
        answered as f64 / self.catalog.question_count() as f64
    }

    /// The respondent's recorded answer for one question, if any
    pub fn answer_of(&self, identity: &RespondentId, question: usize) -> Option<Answer> {
        self.read()
            .record(identity)
            .and_then(|r| r.progress.get(&question).copied())
    }

    /// Accepted votes of one respondent in the order they were recorded
    pub fn history(&self, identity: &RespondentId) -> Vec<AnswerLogEntry> {
        self.read()
            .record(identity)
            .map(|r| r.answer_log.clone())
            .unwrap_or_default()
    }

    /// Current counts for one question
    pub fn tally(&self, question: usize) -> Result<Tally> {
        let epoch = self.read();
        epoch.tallies.get(question).copied().ok_or(Error::OutOfRange {
            index: question,
            count: epoch.tallies.len(),
        })
    }

    pub fn epoch_id(&self) -> Uuid {
        self.read().id
    }

    /// Consistent copy of the current epoch
    pub fn snapshot(&self) -> LedgerSnapshot {
        let question_count = self.catalog.question_count();
        let epoch = self.read();

        let respondents: Vec<RespondentSummary> = epoch
            .respondents
            .iter()
            .map(|r| RespondentSummary {
                identity: r.identity.clone(),
                display_name: r.display_name.clone(),
                answered_count: r.progress.len(),
                completion: r.progress.len() as f64 / question_count as f64,
                last_active: r.last_active,
            })
            .collect();

        LedgerSnapshot {
            epoch_id: epoch.id,
            epoch_started_at: epoch.started_at,
            taken_at: Utc::now(),
            question_count,
            tallies: epoch.tallies.clone(),
            respondent_count: respondents.len(),
            total_votes: epoch.tallies.iter().map(Tally::total).sum(),
            respondents,
        }
    }

    /// Discard all tallies and respondent records, starting a new epoch
    ///
    /// Resetting an empty ledger changes nothing and keeps the current epoch.
    /// Returns the id of the epoch in effect afterwards.
    pub fn reset(&self) -> Uuid {
        let mut epoch = self.write();
        if epoch.is_empty() {
            debug!("Reset on empty ledger (epoch {}), nothing to discard", epoch.id);
            return epoch.id;
        }

        let discarded_respondents = epoch.respondents.len();
        let discarded_votes: u64 = epoch.tallies.iter().map(Tally::total).sum();
        let previous = epoch.id;

        *epoch = Epoch::new(self.catalog.question_count());

        info!(
            "Ledger reset: epoch {} -> {} (discarded {} respondents, {} votes)",
            previous, epoch.id, discarded_respondents, discarded_votes
        );
        epoch.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> Ledger {
        let catalog = Arc::new(QuestionCatalog::new(["q0", "q1", "q2"]).unwrap());
        let gate = Arc::new(AdminGate::new(["admin1"]));
        Ledger::new(catalog, gate)
    }

    #[test]
    fn test_rejection_order() {
        let ledger = ledger();
        let admin = RespondentId::from("admin1");
        let alice = RespondentId::from("alice");

        // Privileged wins over every other problem with the input
        assert_eq!(ledger.record_vote(&admin, 99, "maybe"), VoteOutcome::RejectedPrivileged);
        // Index checked before token
        assert_eq!(ledger.record_vote(&alice, 3, "maybe"), VoteOutcome::RejectedInvalidIndex);
        assert_eq!(ledger.record_vote(&alice, 0, "maybe"), VoteOutcome::RejectedInvalidAnswer);

        // Nothing was created by rejected votes
        assert_eq!(ledger.snapshot().respondent_count, 0);
    }

    #[test]
    fn test_display_name_and_history() {
        let ledger = ledger();
        let alice = RespondentId::from(7i64);

        assert!(ledger.record_vote(&alice, 1, "no").is_accepted());
        assert_eq!(ledger.snapshot().respondents[0].display_name, "7");

        assert!(ledger.record_vote_as(&alice, Some("Alice"), 0, "yes").is_accepted());
        let snapshot = ledger.snapshot();
        assert_eq!(snapshot.respondents[0].display_name, "Alice");
        assert_eq!(snapshot.respondents[0].answered_count, 2);

        let history = ledger.history(&alice);
        assert_eq!(history.len(), 2);
        assert_eq!((history[0].question, history[0].answer), (1, Answer::No));
        assert_eq!((history[1].question, history[1].answer), (0, Answer::Yes));
        assert!(history[0].timestamp <= history[1].timestamp);

        assert_eq!(ledger.answer_of(&alice, 1), Some(Answer::No));
        assert_eq!(ledger.answer_of(&alice, 2), None);
    }

    #[test]
    fn test_last_active_refreshed() {
        let ledger = ledger();
        let alice = RespondentId::from("alice");

        ledger.record_vote(&alice, 0, "yes");
        let first = ledger.snapshot().respondents[0].last_active;
        ledger.record_vote(&alice, 1, "yes");
        let second = ledger.snapshot().respondents[0].last_active;
        assert!(second >= first);

        // Rejected vote does not refresh metadata
        ledger.record_vote(&alice, 1, "no");
        assert_eq!(ledger.snapshot().respondents[0].last_active, second);
    }

    #[test]
    fn test_tally_out_of_range() {
        let ledger = ledger();
        assert!(matches!(ledger.tally(3), Err(Error::OutOfRange { index: 3, count: 3 })));
        assert_eq!(ledger.tally(0).unwrap(), Tally::default());
    }

    #[test]
    fn test_reset_starts_new_epoch_only_when_needed() {
        let ledger = ledger();
        let initial = ledger.epoch_id();

        // Empty ledger: no-op
        assert_eq!(ledger.reset(), initial);

        ledger.record_vote(&"alice".into(), 0, "yes");
        let next = ledger.reset();
        assert_ne!(next, initial);
        assert_eq!(ledger.epoch_id(), next);

        // Second reset is again a no-op
        assert_eq!(ledger.reset(), next);
    }

    #[test]
    fn test_respondents_in_first_vote_order() {
        let ledger = ledger();
        for id in ["carol", "alice", "bob"] {
            ledger.record_vote(&id.into(), 0, "yes");
        }
        ledger.record_vote(&"alice".into(), 1, "no");

        let order: Vec<String> = ledger
            .snapshot()
            .respondents
            .iter()
            .map(|r| r.identity.to_string())
            .collect();
        assert_eq!(order, vec!["carol", "alice", "bob"]);
    }
}
