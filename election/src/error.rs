use ballot_types::{Phase, Principal, ProposalId};
use thiserror::Error;

/// Every way an election operation can be rejected.
///
/// All of these are detected before any mutation, so a failed call leaves
/// the session exactly as it was.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ElectionError {
    #[error("{caller} is not the administrator")]
    NotAuthorized { caller: Principal },

    #[error("operation requires phase {required}, current phase is {actual}")]
    WrongPhase { required: Phase, actual: Phase },

    #[error("voter {0} is already registered")]
    AlreadyRegistered(Principal),

    #[error("{0} is not a registered voter")]
    NotRegistered(Principal),

    #[error("voter {0} has already voted")]
    AlreadyVoted(Principal),

    #[error("proposal {0} does not exist")]
    UnknownProposal(ProposalId),

    #[error("voter {0} did not cast a vote")]
    NoVoteCast(Principal),

    #[error("not available before phase {earliest}, current phase is {actual}")]
    PhaseTooEarly { earliest: Phase, actual: Phase },

    #[error("no proposals were registered, there is no winner")]
    NoProposals,

    #[error("voter {0} appears more than once in the batch")]
    DuplicateInBatch(Principal),

    #[error("snapshot error: {0}")]
    Snapshot(String),
}
