//! The election workflow phases.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The six stages of an election, in workflow order.
///
/// Ordering follows the workflow, so `phase >= Phase::VotingSessionEnded`
/// reads as "voting has closed".
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Phase {
    /// The administrator is building the voter roll.
    #[default]
    RegisteringVoters,
    /// Registered voters may submit proposals.
    ProposalsRegistrationStarted,
    /// Proposal list is frozen; voting has not opened yet.
    ProposalsRegistrationEnded,
    /// Registered voters may cast their single ballot.
    VotingSessionStarted,
    /// Ballots are closed; results may be read but no winner is set.
    VotingSessionEnded,
    /// The winner has been computed. Terminal until a reset.
    VotesTallied,
}

impl Phase {
    /// Every phase in workflow order.
    pub const ALL: [Phase; 6] = [
        Self::RegisteringVoters,
        Self::ProposalsRegistrationStarted,
        Self::ProposalsRegistrationEnded,
        Self::VotingSessionStarted,
        Self::VotingSessionEnded,
        Self::VotesTallied,
    ];

    /// Position of this phase in the workflow (0-based).
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// The phase that follows this one, or `None` for the terminal phase.
    pub fn next(&self) -> Option<Phase> {
        Self::ALL.get(self.index() + 1).copied()
    }

    /// Whether no forward transition leaves this phase.
    pub fn is_terminal(&self) -> bool {
        self.next().is_none()
    }

    /// Snake-case name, used in config files and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RegisteringVoters => "registering_voters",
            Self::ProposalsRegistrationStarted => "proposals_registration_started",
            Self::ProposalsRegistrationEnded => "proposals_registration_ended",
            Self::VotingSessionStarted => "voting_session_started",
            Self::VotingSessionEnded => "voting_session_ended",
            Self::VotesTallied => "votes_tallied",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
