//! Admin gate
//!
//! Membership test against the privileged identity set configured at
//! startup. Privileged identities may reset and export but never vote.

use std::collections::HashSet;

use crate::RespondentId;

/// Immutable set of privileged identities
#[derive(Debug, Clone, Default)]
pub struct AdminGate {
    privileged: HashSet<RespondentId>,
}

impl AdminGate {
    pub fn new<I, T>(ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<RespondentId>,
    {
        Self {
            privileged: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_privileged(&self, identity: &RespondentId) -> bool {
        self.privileged.contains(identity)
    }

    pub fn len(&self) -> usize {
        self.privileged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.privileged.is_empty()
    }
}
