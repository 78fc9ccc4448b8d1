//! Ballot box: one ballot per voter, one counter per proposal.

use crate::error::ElectionError;
use ballot_types::{Principal, ProposalId};
use std::collections::HashMap;

/// Owns per-voter ballots and per-proposal counters.
///
/// The sum of all counters always equals the number of ballots.
#[derive(Debug, Default)]
pub struct BallotBox {
    ballots: HashMap<Principal, ProposalId>,
    counts: Vec<u64>,
}

impl BallotBox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a zeroed counter for a newly registered proposal.
    pub(crate) fn open_counter(&mut self) {
        self.counts.push(0);
    }

    /// Fail if `voter` already voted or `proposal_id` is outside `[0, count)`.
    pub fn check_vote(
        &self,
        voter: &Principal,
        proposal_id: ProposalId,
    ) -> Result<(), ElectionError> {
        if self.ballots.contains_key(voter) {
            return Err(ElectionError::AlreadyVoted(voter.clone()));
        }
        if proposal_id.index() >= self.counts.len() {
            return Err(ElectionError::UnknownProposal(proposal_id));
        }
        Ok(())
    }

    /// Record a ballot validated by [`BallotBox::check_vote`].
    pub(crate) fn record(&mut self, voter: Principal, proposal_id: ProposalId) {
        if let Some(count) = self.counts.get_mut(proposal_id.index()) {
            if self.ballots.insert(voter, proposal_id).is_none() {
                *count += 1;
            }
        }
    }

    pub fn ballot_of(&self, voter: &Principal) -> Option<ProposalId> {
        self.ballots.get(voter).copied()
    }

    pub fn count(&self, proposal_id: ProposalId) -> Option<u64> {
        self.counts.get(proposal_id.index()).copied()
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn ballots_cast(&self) -> usize {
        self.ballots.len()
    }

    /// Drop every ballot and counter.
    pub(crate) fn clear(&mut self) {
        self.ballots.clear();
        self.counts.clear();
    }
}
