//! Core survey value types
//!
//! Identities, answers, tallies and vote outcomes shared by every component.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Token accepted for a "yes" answer
pub const YES_TOKEN: &str = "yes";
/// Token accepted for a "no" answer
pub const NO_TOKEN: &str = "no";

/// Opaque, stable respondent identity supplied by the transport
///
/// Numeric transport ids are held by their decimal string form so that
/// `42` and `"42"` name the same respondent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RespondentId(String);

impl RespondentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RespondentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RespondentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RespondentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<i64> for RespondentId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<u64> for RespondentId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for RespondentId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Signed(i64),
            Unsigned(u64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => RespondentId(s),
            Raw::Signed(n) => RespondentId::from(n),
            Raw::Unsigned(n) => RespondentId::from(n),
        })
    }
}

/// A respondent's answer to one question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Answer {
    Yes,
    No,
}

impl Answer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Answer::Yes => YES_TOKEN,
            Answer::No => NO_TOKEN,
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Answer {
    type Err = Error;

    /// Exact match on the two recognized tokens; nothing else is accepted.
    fn from_str(token: &str) -> std::result::Result<Self, Self::Err> {
        match token {
            YES_TOKEN => Ok(Answer::Yes),
            NO_TOKEN => Ok(Answer::No),
            other => Err(Error::InvalidInput(format!("unrecognized answer token '{}'", other))),
        }
    }
}

/// Aggregate yes/no counters for one question within the current epoch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub yes: u64,
    pub no: u64,
}

impl Tally {
    pub fn total(&self) -> u64 {
        self.yes + self.no
    }

    pub(crate) fn add(&mut self, answer: Answer) {
        match answer {
            Answer::Yes => self.yes += 1,
            Answer::No => self.no += 1,
        }
    }
}

/// One accepted vote in a respondent's history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerLogEntry {
    pub question: usize,
    pub answer: Answer,
    pub timestamp: DateTime<Utc>,
}

/// Result of a `record_vote` call
///
/// Every rejection is an expected outcome of caller input and leaves the
/// ledger untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteOutcome {
    Accepted,
    RejectedPrivileged,
    RejectedInvalidIndex,
    RejectedInvalidAnswer,
    RejectedAlreadyAnswered,
}

impl VoteOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, VoteOutcome::Accepted)
    }
}

impl fmt::Display for VoteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VoteOutcome::Accepted => "accepted",
            VoteOutcome::RejectedPrivileged => "rejected_privileged",
            VoteOutcome::RejectedInvalidIndex => "rejected_invalid_index",
            VoteOutcome::RejectedInvalidAnswer => "rejected_invalid_answer",
            VoteOutcome::RejectedAlreadyAnswered => "rejected_already_answered",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_tokens_are_exact() {
        assert_eq!("yes".parse::<Answer>().unwrap(), Answer::Yes);
        assert_eq!("no".parse::<Answer>().unwrap(), Answer::No);
        assert!("YES".parse::<Answer>().is_err());
        assert!(" yes".parse::<Answer>().is_err());
        assert!("maybe".parse::<Answer>().is_err());
        assert!("".parse::<Answer>().is_err());
    }

    #[test]
    fn test_numeric_and_text_ids_match() {
        assert_eq!(RespondentId::from(42i64), RespondentId::from("42"));

        let from_number: RespondentId = serde_json::from_str("42").unwrap();
        let from_text: RespondentId = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(from_number, from_text);
    }

    #[test]
    fn test_tally_counts() {
        let mut tally = Tally::default();
        tally.add(Answer::Yes);
        tally.add(Answer::Yes);
        tally.add(Answer::No);
        assert_eq!(tally, Tally { yes: 2, no: 1 });
        assert_eq!(tally.total(), 3);
    }

    #[test]
    fn test_outcome_serializes_snake_case() {
        let json = serde_json::to_string(&VoteOutcome::RejectedAlreadyAnswered).unwrap();
        assert_eq!(json, "\"rejected_already_answered\"");
        assert_eq!(VoteOutcome::RejectedAlreadyAnswered.to_string(), "rejected_already_answered");
    }
}
