//! Full-state snapshots of a session.

use crate::error::ElectionError;
use crate::tally::TallyEngine;
use ballot_types::{Phase, Principal, Proposal, ProposalId, Voter};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Everything an [`ElectionSession`](crate::ElectionSession) holds, minus
/// its listeners. Voter records are unmasked.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub administrator: Principal,
    pub round: u64,
    pub phase: Phase,
    /// Voters in registration order.
    pub voters: Vec<Voter>,
    /// Proposals in id order.
    pub proposals: Vec<Proposal>,
    pub winning_proposal_id: Option<ProposalId>,
}

impl SessionSnapshot {
    /// Serialize for persistence.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ElectionError> {
        bincode::serialize(self).map_err(|e| ElectionError::Snapshot(e.to_string()))
    }

    /// Decode bytes produced by [`SessionSnapshot::to_bytes`]. The decoded
    /// snapshot is checked before it is returned.
    pub fn from_bytes(data: &[u8]) -> Result<Self, ElectionError> {
        let snapshot: Self =
            bincode::deserialize(data).map_err(|e| ElectionError::Snapshot(e.to_string()))?;
        snapshot.check_invariants()?;
        Ok(snapshot)
    }

    /// Number of voters with a recorded ballot.
    pub fn ballots_cast(&self) -> usize {
        self.voters.iter().filter(|v| v.has_voted).count()
    }

    /// Verify the session invariants hold for this state.
    pub fn check_invariants(&self) -> Result<(), ElectionError> {
        let fail = |msg: String| Err(ElectionError::Snapshot(msg));

        let mut seen = HashSet::with_capacity(self.voters.len());
        for voter in &self.voters {
            if !voter.is_registered {
                return fail(format!("{} is on the roll but not registered", voter.principal));
            }
            if !seen.insert(&voter.principal) {
                return fail(format!("{} appears twice on the roll", voter.principal));
            }
            match voter.voted_proposal_id {
                Some(id) if id.index() >= self.proposals.len() => {
                    return fail(format!("{} voted for missing proposal {id}", voter.principal));
                }
                Some(_) if !voter.has_voted => {
                    return fail(format!("{} has a ballot but has_voted is false", voter.principal));
                }
                None if voter.has_voted => {
                    return fail(format!("{} has_voted without a ballot", voter.principal));
                }
                _ => {}
            }
        }

        let mut counts = vec![0u64; self.proposals.len()];
        for id in self.voters.iter().filter_map(|v| v.voted_proposal_id) {
            counts[id.index()] += 1;
        }
        for (index, proposal) in self.proposals.iter().enumerate() {
            if proposal.id.index() != index {
                return fail(format!("proposal at position {index} has id {}", proposal.id));
            }
            if proposal.vote_count != counts[index] {
                return fail(format!(
                    "proposal {} counts {} votes but {} ballots name it",
                    proposal.id, proposal.vote_count, counts[index]
                ));
            }
        }

        if self.phase < Phase::ProposalsRegistrationStarted && !self.proposals.is_empty() {
            return fail(format!("proposals exist during {}", self.phase));
        }
        if self.phase < Phase::VotingSessionStarted && self.ballots_cast() > 0 {
            return fail(format!("ballots exist during {}", self.phase));
        }

        let expected = if self.phase == Phase::VotesTallied {
            TallyEngine::new().tally(&counts).map(|outcome| outcome.winner)
        } else {
            None
        };
        if self.winning_proposal_id != expected {
            return fail(format!(
                "winner {:?} does not match expected {:?} in phase {}",
                self.winning_proposal_id, expected, self.phase
            ));
        }

        Ok(())
    }
}
