//! Single-election voting workflow.
//!
//! An administrator opens voter registration, registered voters submit
//! proposals, each voter casts exactly one ballot, and the proposal with the
//! most votes wins (lowest id on a tie).
//!
//! Phases move strictly forward:
//! RegisteringVoters → ProposalsRegistrationStarted → ProposalsRegistrationEnded
//! → VotingSessionStarted → VotingSessionEnded → VotesTallied.
//! The only way back is an administrator reset.
//!
//! [`ElectionSession`] is the public surface; the other components are
//! exposed for inspection and testing.

pub mod ballot_box;
pub mod error;
pub mod event;
pub mod phase_gate;
pub mod registry;
pub mod session;
pub mod shared;
pub mod snapshot;
pub mod tally;

pub use ballot_box::BallotBox;
pub use error::ElectionError;
pub use event::{ElectionEvent, EventBus};
pub use phase_gate::PhaseGate;
pub use registry::{ProposalEntry, Registry};
pub use session::ElectionSession;
pub use shared::SharedSession;
pub use snapshot::SessionSnapshot;
pub use tally::{TallyEngine, TallyOutcome};
