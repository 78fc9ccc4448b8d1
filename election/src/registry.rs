//! Voter roll and proposal list.

use crate::error::ElectionError;
use ballot_types::{Principal, ProposalId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A proposal's registration data. Counts live in the ballot box.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalEntry {
    pub description: String,
    pub proposer: Principal,
}

/// Owns the voter roll (insertion order preserved) and the proposal list
/// (index-addressed, registration order).
#[derive(Debug, Default)]
pub struct Registry {
    roll: Vec<Principal>,
    members: HashSet<Principal>,
    proposals: Vec<ProposalEntry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_registered(&self, principal: &Principal) -> bool {
        self.members.contains(principal)
    }

    pub fn require_registered(&self, principal: &Principal) -> Result<(), ElectionError> {
        if self.is_registered(principal) {
            Ok(())
        } else {
            Err(ElectionError::NotRegistered(principal.clone()))
        }
    }

    pub fn check_new_voter(&self, principal: &Principal) -> Result<(), ElectionError> {
        if self.is_registered(principal) {
            Err(ElectionError::AlreadyRegistered(principal.clone()))
        } else {
            Ok(())
        }
    }

    /// Validate a whole batch, reporting the first offending principal.
    pub fn check_new_voters(&self, principals: &[Principal]) -> Result<(), ElectionError> {
        let mut seen = HashSet::with_capacity(principals.len());
        for principal in principals {
            self.check_new_voter(principal)?;
            if !seen.insert(principal) {
                return Err(ElectionError::DuplicateInBatch(principal.clone()));
            }
        }
        Ok(())
    }

    /// Append to the roll. Callers validate with [`Registry::check_new_voter`] first.
    pub(crate) fn insert_voter(&mut self, principal: Principal) {
        if self.members.insert(principal.clone()) {
            self.roll.push(principal);
        }
    }

    /// Registered principals in registration order.
    pub fn roll(&self) -> &[Principal] {
        &self.roll
    }

    pub fn voter_count(&self) -> usize {
        self.roll.len()
    }

    /// Append a proposal and return its id (the next sequential index).
    pub(crate) fn add_proposal(
        &mut self,
        description: String,
        proposer: Principal,
    ) -> ProposalId {
        let id = ProposalId::new(self.proposals.len());
        self.proposals.push(ProposalEntry {
            description,
            proposer,
        });
        id
    }

    pub fn proposal(&self, id: ProposalId) -> Option<&ProposalEntry> {
        self.proposals.get(id.index())
    }

    pub fn proposals(&self) -> &[ProposalEntry] {
        &self.proposals
    }

    pub fn proposal_count(&self) -> usize {
        self.proposals.len()
    }

    /// Drop every proposal. The roll is untouched.
    pub(crate) fn clear_proposals(&mut self) {
        self.proposals.clear();
    }
}
