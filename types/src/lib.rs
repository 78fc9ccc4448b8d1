//! Fundamental types for the ballot workflow.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! caller principals, proposal ids, the workflow phase, and the voter/proposal
//! records handed out by the election core.

pub mod error;
pub mod phase;
pub mod principal;
pub mod proposal;
pub mod voter;

pub use error::BallotError;
pub use phase::Phase;
pub use principal::Principal;
pub use proposal::{Proposal, ProposalId};
pub use voter::Voter;
