//! Shared handle for serving one session to many concurrent callers.

use crate::error::ElectionError;
use crate::event::ElectionEvent;
use crate::session::ElectionSession;
use crate::snapshot::SessionSnapshot;
use ballot_types::{Phase, Principal, Proposal, ProposalId, Voter};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Cloneable handle around one [`ElectionSession`].
///
/// Mutating calls take the write lock for their whole duration, so each runs
/// to completion before the next starts. Queries share the read lock and
/// never observe a half-applied call.
#[derive(Clone)]
pub struct SharedSession {
    inner: Arc<RwLock<ElectionSession>>,
}

impl SharedSession {
    pub fn new(session: ElectionSession) -> Self {
        Self {
            inner: Arc::new(RwLock::new(session)),
        }
    }

    /// Run `f` with exclusive access.
    pub async fn write<R>(&self, f: impl FnOnce(&mut ElectionSession) -> R) -> R {
        let mut session = self.inner.write().await;
        f(&mut *session)
    }

    /// Run `f` with shared access.
    pub async fn read<R>(&self, f: impl FnOnce(&ElectionSession) -> R) -> R {
        let session = self.inner.read().await;
        f(&*session)
    }

    pub async fn subscribe(&self, listener: Box<dyn Fn(&ElectionEvent) + Send + Sync>) {
        self.write(|s| s.subscribe(listener)).await
    }

    pub async fn register_voter(
        &self,
        caller: &Principal,
        voter: Principal,
    ) -> Result<(), ElectionError> {
        self.write(|s| s.register_voter(caller, voter)).await
    }

    pub async fn register_voters(
        &self,
        caller: &Principal,
        voters: &[Principal],
    ) -> Result<(), ElectionError> {
        self.write(|s| s.register_voters(caller, voters)).await
    }

    pub async fn register_proposal(
        &self,
        caller: &Principal,
        description: impl Into<String>,
    ) -> Result<ProposalId, ElectionError> {
        self.write(|s| s.register_proposal(caller, description)).await
    }

    /// Move one step forward from `from`, whichever transition that is.
    pub async fn advance(&self, caller: &Principal, from: Phase) -> Result<(), ElectionError> {
        self.write(|s| match from {
            Phase::RegisteringVoters => s.start_proposals_registration(caller),
            Phase::ProposalsRegistrationStarted => s.end_proposals_registration(caller),
            Phase::ProposalsRegistrationEnded => s.start_voting_session(caller),
            Phase::VotingSessionStarted => s.end_voting_session(caller),
            // the terminal phase has no successor
            Phase::VotingSessionEnded | Phase::VotesTallied => s.tally(caller).map(drop),
        })
        .await
    }

    pub async fn vote(
        &self,
        caller: &Principal,
        proposal_id: ProposalId,
    ) -> Result<(), ElectionError> {
        self.write(|s| s.vote(caller, proposal_id)).await
    }

    pub async fn tally(&self, caller: &Principal) -> Result<Option<ProposalId>, ElectionError> {
        self.write(|s| s.tally(caller)).await
    }

    pub async fn reset_all(&self, caller: &Principal) -> Result<(), ElectionError> {
        self.write(|s| s.reset_all(caller)).await
    }

    pub async fn current_phase(&self) -> Phase {
        self.read(|s| s.current_phase()).await
    }

    pub async fn vote_of(&self, voter: &Principal) -> Result<ProposalId, ElectionError> {
        self.read(|s| s.vote_of(voter)).await
    }

    pub async fn get_winner(&self) -> Result<ProposalId, ElectionError> {
        self.read(|s| s.get_winner()).await
    }

    pub async fn list_voters(&self) -> Vec<Voter> {
        self.read(|s| s.list_voters()).await
    }

    pub async fn list_proposals(&self) -> Result<Vec<Proposal>, ElectionError> {
        self.read(|s| s.list_proposals()).await
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.read(|s| s.snapshot()).await
    }
}
