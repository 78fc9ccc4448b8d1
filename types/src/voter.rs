//! Voter records.

use crate::principal::Principal;
use crate::proposal::ProposalId;
use serde::{Deserialize, Serialize};

/// A voter's registration and ballot state.
///
/// `has_voted` is true exactly when `voted_proposal_id` is set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voter {
    pub principal: Principal,
    pub is_registered: bool,
    pub has_voted: bool,
    pub voted_proposal_id: Option<ProposalId>,
}

impl Voter {
    /// A freshly registered voter who has not voted.
    pub fn registered(principal: Principal) -> Self {
        Self {
            principal,
            is_registered: true,
            has_voted: false,
            voted_proposal_id: None,
        }
    }

    /// Same voter with the ballot fields hidden.
    pub fn masked(&self) -> Self {
        Self::registered(self.principal.clone())
    }
}
