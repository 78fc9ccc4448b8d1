//! Drives a validated script through every phase of one session.

use crate::config::Script;
use anyhow::Context;
use ballot_election::{ElectionEvent, ElectionSession, SharedSession};
use ballot_types::{Phase, Principal, Proposal, ProposalId, Voter};
use serde::Serialize;
use std::sync::{Arc, Mutex, PoisonError};

/// Final state of a completed run, printed as JSON.
#[derive(Debug, Serialize)]
pub struct Report {
    pub phase: Phase,
    pub administrator: Principal,
    pub winner: Option<Proposal>,
    pub tied_with: Vec<ProposalId>,
    pub proposals: Vec<Proposal>,
    pub voters: Vec<Voter>,
    pub events: Vec<ElectionEvent>,
}

type EventSink = Arc<Mutex<Vec<ElectionEvent>>>;

/// Listener appending every event to `sink`. A poisoned lock still records.
fn event_recorder(sink: EventSink) -> Box<dyn Fn(&ElectionEvent) + Send + Sync> {
    Box::new(move |event: &ElectionEvent| {
        sink.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    })
}

fn recorded(sink: &EventSink) -> Vec<ElectionEvent> {
    sink.lock().unwrap_or_else(PoisonError::into_inner).clone()
}

/// Run the script to `VotesTallied`. Ballots are cast concurrently.
pub async fn run(script: Script) -> anyhow::Result<Report> {
    let admin = script.administrator.clone();
    let events: EventSink = Arc::new(Mutex::new(Vec::new()));

    let mut session = ElectionSession::new(admin.clone());
    session.subscribe(event_recorder(Arc::clone(&events)));
    let shared = SharedSession::new(session);

    shared
        .register_voters(&admin, &script.voters)
        .await
        .context("registering voters")?;
    shared.advance(&admin, Phase::RegisteringVoters).await?;

    for (author, description) in &script.proposals {
        shared
            .register_proposal(author, description.clone())
            .await
            .with_context(|| format!("registering proposal {description:?} for {author}"))?;
    }
    shared
        .advance(&admin, Phase::ProposalsRegistrationStarted)
        .await?;
    shared
        .advance(&admin, Phase::ProposalsRegistrationEnded)
        .await?;

    let mut handles = Vec::with_capacity(script.ballots.len());
    for (voter, proposal_id) in script.ballots {
        let shared = shared.clone();
        handles.push(tokio::spawn(async move {
            shared
                .vote(&voter, proposal_id)
                .await
                .with_context(|| format!("ballot of {voter} for {proposal_id}"))
        }));
    }
    for handle in handles {
        handle.await.context("ballot task panicked")??;
    }

    shared.advance(&admin, Phase::VotingSessionStarted).await?;
    let winner = shared.tally(&admin).await.context("tallying votes")?;
    tracing::info!(winner = ?winner, "election complete");

    let report = shared
        .read(|s| -> anyhow::Result<Report> {
            Ok(Report {
                phase: s.current_phase(),
                administrator: s.administrator().clone(),
                winner: s.winning_proposal().ok(),
                tied_with: s
                    .tally_outcome()
                    .map(|o| o.tied_with.clone())
                    .unwrap_or_default(),
                proposals: s.list_proposals()?,
                voters: s.list_voters(),
                events: Vec::new(),
            })
        })
        .await?;

    Ok(Report {
        events: recorded(&events),
        ..report
    })
}
