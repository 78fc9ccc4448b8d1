//! The election session: the only surface callers talk to.
//!
//! Every operation runs a single check section (administrator, phase, then
//! registry/ballot state) before touching any state, so a rejected call
//! leaves the session unchanged and emits nothing.

use crate::ballot_box::BallotBox;
use crate::error::ElectionError;
use crate::event::{ElectionEvent, EventBus};
use crate::phase_gate::PhaseGate;
use crate::registry::Registry;
use crate::snapshot::SessionSnapshot;
use crate::tally::{TallyEngine, TallyOutcome};
use ballot_types::{Phase, Principal, Proposal, ProposalId, Voter};
use tracing::{debug, info, warn};

fn rejected<'a>(operation: &'static str, caller: &'a Principal) -> impl Fn(&ElectionError) + 'a {
    move |error| debug!(operation, %caller, %error, "call rejected")
}

/// One election, from voter registration to the tallied winner.
pub struct ElectionSession {
    administrator: Principal,
    /// Incremented by every reset; proposal ids are scoped to a round.
    round: u64,
    gate: PhaseGate,
    registry: Registry,
    ballots: BallotBox,
    engine: TallyEngine,
    outcome: Option<TallyOutcome>,
    events: EventBus,
}

impl ElectionSession {
    pub fn new(administrator: Principal) -> Self {
        Self {
            administrator,
            round: 0,
            gate: PhaseGate::new(),
            registry: Registry::new(),
            ballots: BallotBox::new(),
            engine: TallyEngine::new(),
            outcome: None,
            events: EventBus::new(),
        }
    }

    /// Rebuild a session from a snapshot. Listeners are not part of a
    /// snapshot and must be subscribed again.
    pub fn restore(snapshot: SessionSnapshot) -> Result<Self, ElectionError> {
        snapshot.check_invariants()?;

        let mut session = Self::new(snapshot.administrator);
        session.round = snapshot.round;
        session.gate = PhaseGate::restore(snapshot.phase);
        for proposal in snapshot.proposals {
            session
                .registry
                .add_proposal(proposal.description, proposal.proposer);
            session.ballots.open_counter();
        }
        for voter in snapshot.voters {
            if let Some(id) = voter.voted_proposal_id {
                session.ballots.record(voter.principal.clone(), id);
            }
            session.registry.insert_voter(voter.principal);
        }
        if snapshot.phase == Phase::VotesTallied {
            session.outcome = session.engine.tally(session.ballots.counts());
        }
        Ok(session)
    }

    /// Register an observer for every committed event.
    pub fn subscribe(&mut self, listener: Box<dyn Fn(&ElectionEvent) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    fn require_administrator(&self, caller: &Principal) -> Result<(), ElectionError> {
        if *caller == self.administrator {
            Ok(())
        } else {
            Err(ElectionError::NotAuthorized {
                caller: caller.clone(),
            })
        }
    }

    fn commit(&self, event: ElectionEvent) {
        self.events.emit(&event);
    }

    // ── Administration ─────────────────────────────────────────────────

    pub fn administrator(&self) -> &Principal {
        &self.administrator
    }

    /// Hand the administrator role to another principal. Allowed in any phase.
    pub fn transfer_administration(
        &mut self,
        caller: &Principal,
        new_administrator: Principal,
    ) -> Result<(), ElectionError> {
        self.require_administrator(caller)
            .inspect_err(rejected("transfer_administration", caller))?;

        let previous = std::mem::replace(&mut self.administrator, new_administrator.clone());
        info!(%previous, new = %new_administrator, "administrator transferred");
        self.commit(ElectionEvent::AdministratorTransferred {
            previous,
            new: new_administrator,
        });
        Ok(())
    }

    /// Return to `RegisteringVoters`, dropping proposals, ballots and the
    /// winner. The voter roll is kept. Allowed in any phase.
    pub fn reset_all(&mut self, caller: &Principal) -> Result<(), ElectionError> {
        self.require_administrator(caller)
            .inspect_err(rejected("reset_all", caller))?;

        let previous = self.gate.reset();
        self.registry.clear_proposals();
        self.ballots.clear();
        self.outcome = None;
        self.round += 1;

        info!(%previous, round = self.round, "session reset");
        self.commit(ElectionEvent::SessionReset {
            previous,
            round: self.round,
        });
        Ok(())
    }

    // ── Phase transitions ──────────────────────────────────────────────

    fn transition(
        &mut self,
        operation: &'static str,
        caller: &Principal,
        from: Phase,
    ) -> Result<(), ElectionError> {
        self.require_administrator(caller)
            .and_then(|()| self.gate.check_advance(from).map(drop))
            .inspect_err(rejected(operation, caller))?;

        let (previous, new) = self.gate.advance(from)?;
        info!(%previous, %new, "phase changed");
        self.commit(ElectionEvent::PhaseChanged { previous, new });
        Ok(())
    }

    pub fn start_proposals_registration(
        &mut self,
        caller: &Principal,
    ) -> Result<(), ElectionError> {
        self.transition(
            "start_proposals_registration",
            caller,
            Phase::RegisteringVoters,
        )
    }

    pub fn end_proposals_registration(&mut self, caller: &Principal) -> Result<(), ElectionError> {
        self.transition(
            "end_proposals_registration",
            caller,
            Phase::ProposalsRegistrationStarted,
        )
    }

    pub fn start_voting_session(&mut self, caller: &Principal) -> Result<(), ElectionError> {
        self.transition(
            "start_voting_session",
            caller,
            Phase::ProposalsRegistrationEnded,
        )
    }

    pub fn end_voting_session(&mut self, caller: &Principal) -> Result<(), ElectionError> {
        self.transition("end_voting_session", caller, Phase::VotingSessionStarted)
    }

    /// Compute the winner and move to `VotesTallied`.
    ///
    /// Returns `None` only when no proposal was ever registered.
    pub fn tally(&mut self, caller: &Principal) -> Result<Option<ProposalId>, ElectionError> {
        self.require_administrator(caller)
            .and_then(|()| self.gate.check_advance(Phase::VotingSessionEnded).map(drop))
            .inspect_err(rejected("tally", caller))?;

        let outcome = self.engine.tally(self.ballots.counts());
        let (previous, new) = self.gate.advance(Phase::VotingSessionEnded)?;
        match &outcome {
            Some(outcome) => info!(
                winner = %outcome.winner,
                votes = outcome.winning_votes,
                ties = outcome.tied_with.len(),
                "votes tallied"
            ),
            None => warn!("votes tallied with no proposals"),
        }
        let winner = outcome.as_ref().map(|o| o.winner);
        self.outcome = outcome;
        self.commit(ElectionEvent::PhaseChanged { previous, new });
        Ok(winner)
    }

    pub fn current_phase(&self) -> Phase {
        self.gate.current()
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    // ── Registration ───────────────────────────────────────────────────

    pub fn register_voter(
        &mut self,
        caller: &Principal,
        voter: Principal,
    ) -> Result<(), ElectionError> {
        self.require_administrator(caller)
            .and_then(|()| self.gate.require(Phase::RegisteringVoters))
            .and_then(|()| self.registry.check_new_voter(&voter))
            .inspect_err(rejected("register_voter", caller))?;

        self.registry.insert_voter(voter.clone());
        debug!(%voter, "voter registered");
        self.commit(ElectionEvent::VoterRegistered { voter });
        Ok(())
    }

    /// Register several voters in order. The batch is validated as a whole:
    /// on the first bad principal nothing is registered and that principal
    /// is reported.
    pub fn register_voters(
        &mut self,
        caller: &Principal,
        voters: &[Principal],
    ) -> Result<(), ElectionError> {
        self.require_administrator(caller)
            .and_then(|()| self.gate.require(Phase::RegisteringVoters))
            .and_then(|()| self.registry.check_new_voters(voters))
            .inspect_err(rejected("register_voters", caller))?;

        for voter in voters {
            self.registry.insert_voter(voter.clone());
            debug!(%voter, "voter registered");
            self.commit(ElectionEvent::VoterRegistered {
                voter: voter.clone(),
            });
        }
        Ok(())
    }

    /// Submit a proposal on behalf of a registered voter.
    pub fn register_proposal(
        &mut self,
        caller: &Principal,
        description: impl Into<String>,
    ) -> Result<ProposalId, ElectionError> {
        self.gate
            .require(Phase::ProposalsRegistrationStarted)
            .and_then(|()| self.registry.require_registered(caller))
            .inspect_err(rejected("register_proposal", caller))?;

        let proposal_id = self.registry.add_proposal(description.into(), caller.clone());
        self.ballots.open_counter();
        debug!(%caller, %proposal_id, "proposal registered");
        self.commit(ElectionEvent::ProposalRegistered { proposal_id });
        Ok(proposal_id)
    }

    // ── Voting ─────────────────────────────────────────────────────────

    /// Cast the caller's single ballot.
    pub fn vote(
        &mut self,
        caller: &Principal,
        proposal_id: ProposalId,
    ) -> Result<(), ElectionError> {
        self.gate
            .require(Phase::VotingSessionStarted)
            .and_then(|()| self.registry.require_registered(caller))
            .and_then(|()| self.ballots.check_vote(caller, proposal_id))
            .inspect_err(rejected("vote", caller))?;

        self.ballots.record(caller.clone(), proposal_id);
        debug!(%caller, %proposal_id, "vote recorded");
        self.commit(ElectionEvent::Voted {
            voter: caller.clone(),
            proposal_id,
        });
        Ok(())
    }

    /// The proposal `voter` chose. Only readable once voting has ended.
    pub fn vote_of(&self, voter: &Principal) -> Result<ProposalId, ElectionError> {
        self.gate.require_at_least(Phase::VotingSessionEnded)?;
        self.registry.require_registered(voter)?;
        self.ballots
            .ballot_of(voter)
            .ok_or_else(|| ElectionError::NoVoteCast(voter.clone()))
    }

    // ── Results ────────────────────────────────────────────────────────

    pub fn get_winner(&self) -> Result<ProposalId, ElectionError> {
        self.gate.require(Phase::VotesTallied)?;
        self.outcome
            .as_ref()
            .map(|o| o.winner)
            .ok_or(ElectionError::NoProposals)
    }

    pub fn winning_proposal(&self) -> Result<Proposal, ElectionError> {
        let winner = self.get_winner()?;
        self.proposal_view(winner)
            .ok_or(ElectionError::UnknownProposal(winner))
    }

    /// Full tally details, set only in `VotesTallied`.
    pub fn tally_outcome(&self) -> Option<&TallyOutcome> {
        self.outcome.as_ref()
    }

    // ── Queries ────────────────────────────────────────────────────────

    fn voter_view(&self, principal: &Principal) -> Voter {
        let ballot = self.ballots.ballot_of(principal);
        Voter {
            principal: principal.clone(),
            is_registered: true,
            has_voted: ballot.is_some(),
            voted_proposal_id: ballot,
        }
    }

    fn proposal_view(&self, id: ProposalId) -> Option<Proposal> {
        let entry = self.registry.proposal(id)?;
        Some(Proposal {
            id,
            description: entry.description.clone(),
            proposer: entry.proposer.clone(),
            vote_count: self.ballots.count(id).unwrap_or_default(),
        })
    }

    /// Every registered voter in registration order.
    pub fn list_voters(&self) -> Vec<Voter> {
        self.registry
            .roll()
            .iter()
            .map(|principal| self.voter_view(principal))
            .collect()
    }

    /// Look up one voter. Until voting has ended, ballot fields are only
    /// shown to the voter themself.
    pub fn voter(&self, caller: &Principal, principal: &Principal) -> Result<Voter, ElectionError> {
        self.registry.require_registered(principal)?;
        let voter = self.voter_view(principal);
        if caller == principal || self.gate.current() >= Phase::VotingSessionEnded {
            Ok(voter)
        } else {
            Ok(voter.masked())
        }
    }

    /// Every proposal in id order.
    pub fn list_proposals(&self) -> Result<Vec<Proposal>, ElectionError> {
        self.gate
            .require_at_least(Phase::ProposalsRegistrationStarted)?;
        Ok((0..self.registry.proposal_count())
            .filter_map(|index| self.proposal_view(ProposalId::new(index)))
            .collect())
    }

    pub fn proposal(&self, id: ProposalId) -> Result<Proposal, ElectionError> {
        self.gate
            .require_at_least(Phase::ProposalsRegistrationStarted)?;
        self.proposal_view(id)
            .ok_or(ElectionError::UnknownProposal(id))
    }

    pub fn is_registered(&self, principal: &Principal) -> bool {
        self.registry.is_registered(principal)
    }

    pub fn voter_count(&self) -> usize {
        self.registry.voter_count()
    }

    pub fn proposal_count(&self) -> usize {
        self.registry.proposal_count()
    }

    /// The complete state, unmasked, for persistence or comparison.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            administrator: self.administrator.clone(),
            round: self.round,
            phase: self.gate.current(),
            voters: self.list_voters(),
            proposals: (0..self.registry.proposal_count())
                .filter_map(|index| self.proposal_view(ProposalId::new(index)))
                .collect(),
            winning_proposal_id: self.outcome.as_ref().map(|o| o.winner),
        }
    }
}
