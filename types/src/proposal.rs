//! Proposals and their identifiers.

use crate::principal::Principal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable, 0-based proposal identifier. Equal to the proposal's position in
/// registration order within the current round, so it spans the same range
/// as a list index and never wraps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProposalId(pub usize);

impl ProposalId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Index into the proposal list.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A proposal as seen by callers: its registration data plus the current count.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    /// Free text; immutable after registration. Not required to be unique.
    pub description: String,
    /// The registered voter who submitted it.
    pub proposer: Principal,
    /// Ballots cast for this proposal.
    pub vote_count: u64,
}
