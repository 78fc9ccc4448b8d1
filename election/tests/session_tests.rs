//! End-to-end election scenarios driven through the public session API,
//! with events captured by the nullable event log.

use ballot_election::{ElectionError, ElectionEvent, ElectionSession, SessionSnapshot};
use ballot_nullables::{NullEventLog, NullPrincipals};
use ballot_types::{Phase, Principal, ProposalId};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn session_with_log() -> (ElectionSession, NullEventLog) {
    let mut session = ElectionSession::new(NullPrincipals::administrator());
    let log = NullEventLog::new();
    session.subscribe(log.listener());
    (session, log)
}

/// Drive a session into `VotingSessionStarted` with the given voters and
/// proposals (all authored by the first voter).
fn open_voting(session: &mut ElectionSession, voters: &[Principal], proposals: &[&str]) {
    let admin = NullPrincipals::administrator();
    session.register_voters(&admin, voters).unwrap();
    session.start_proposals_registration(&admin).unwrap();
    for description in proposals {
        session.register_proposal(&voters[0], *description).unwrap();
    }
    session.end_proposals_registration(&admin).unwrap();
    session.start_voting_session(&admin).unwrap();
}

fn assert_unchanged(
    before: &SessionSnapshot,
    session: &ElectionSession,
    log: &NullEventLog,
    events: usize,
) {
    assert_eq!(&session.snapshot(), before);
    assert_eq!(log.len(), events);
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn two_voters_two_proposals() {
    let admin = NullPrincipals::administrator();
    let (mut session, log) = session_with_log();
    let a = Principal::new("A");
    let b = Principal::new("B");

    open_voting(&mut session, &[a.clone(), b.clone()], &["x", "y"]);
    session.vote(&a, ProposalId(0)).unwrap();
    session.vote(&b, ProposalId(1)).unwrap();
    session.end_voting_session(&admin).unwrap();

    assert!(matches!(
        session.get_winner(),
        Err(ElectionError::WrongPhase { .. })
    ));
    session.tally(&admin).unwrap();
    // equal counts: lowest id wins
    assert_eq!(session.get_winner(), Ok(ProposalId(0)));
    assert_eq!(session.vote_of(&a), Ok(ProposalId(0)));
    assert_eq!(session.vote_of(&b), Ok(ProposalId(1)));

    let expected = vec![
        ElectionEvent::VoterRegistered { voter: a.clone() },
        ElectionEvent::VoterRegistered { voter: b.clone() },
        ElectionEvent::PhaseChanged {
            previous: Phase::RegisteringVoters,
            new: Phase::ProposalsRegistrationStarted,
        },
        ElectionEvent::ProposalRegistered {
            proposal_id: ProposalId(0),
        },
        ElectionEvent::ProposalRegistered {
            proposal_id: ProposalId(1),
        },
        ElectionEvent::PhaseChanged {
            previous: Phase::ProposalsRegistrationStarted,
            new: Phase::ProposalsRegistrationEnded,
        },
        ElectionEvent::PhaseChanged {
            previous: Phase::ProposalsRegistrationEnded,
            new: Phase::VotingSessionStarted,
        },
        ElectionEvent::Voted {
            voter: a,
            proposal_id: ProposalId(0),
        },
        ElectionEvent::Voted {
            voter: b,
            proposal_id: ProposalId(1),
        },
        ElectionEvent::PhaseChanged {
            previous: Phase::VotingSessionStarted,
            new: Phase::VotingSessionEnded,
        },
        ElectionEvent::PhaseChanged {
            previous: Phase::VotingSessionEnded,
            new: Phase::VotesTallied,
        },
    ];
    assert_eq!(log.events(), expected);
}

#[test]
fn tie_break_selects_lowest_id() {
    let admin = NullPrincipals::administrator();
    let (mut session, _log) = session_with_log();
    let voters = NullPrincipals::default().take(13);
    open_voting(&mut session, &voters, &["A", "B", "C"]);

    // A:5, B:5, C:3
    for (i, voter) in voters.iter().enumerate() {
        let choice = match i {
            0..=4 => 0,
            5..=9 => 1,
            _ => 2,
        };
        session.vote(voter, ProposalId(choice)).unwrap();
    }
    session.end_voting_session(&admin).unwrap();
    assert_eq!(session.tally(&admin), Ok(Some(ProposalId(0))));

    let counts: Vec<u64> = session
        .list_proposals()
        .unwrap()
        .iter()
        .map(|p| p.vote_count)
        .collect();
    assert_eq!(counts, vec![5, 5, 3]);
}

#[test]
fn clear_majority_wins() {
    let admin = NullPrincipals::administrator();
    let (mut session, _log) = session_with_log();
    let voters = NullPrincipals::default().take(3);
    open_voting(&mut session, &voters, &["x", "y"]);
    session.vote(&voters[0], ProposalId(0)).unwrap();
    session.vote(&voters[1], ProposalId(1)).unwrap();
    session.vote(&voters[2], ProposalId(1)).unwrap();
    session.end_voting_session(&admin).unwrap();
    session.tally(&admin).unwrap();

    assert_eq!(session.get_winner(), Ok(ProposalId(1)));
    assert_eq!(session.winning_proposal().unwrap().vote_count, 2);
}

#[test]
fn vote_of_round_trip() {
    let admin = NullPrincipals::administrator();
    let (mut session, _log) = session_with_log();
    let p = Principal::new("p");
    session.register_voter(&admin, p.clone()).unwrap();
    assert!(matches!(
        session.vote_of(&p),
        Err(ElectionError::PhaseTooEarly { .. })
    ));

    session.start_proposals_registration(&admin).unwrap();
    session.register_proposal(&p, "only").unwrap();
    session.end_proposals_registration(&admin).unwrap();
    session.start_voting_session(&admin).unwrap();
    session.vote(&p, ProposalId(0)).unwrap();
    assert!(matches!(
        session.vote_of(&p),
        Err(ElectionError::PhaseTooEarly { .. })
    ));
    session.end_voting_session(&admin).unwrap();
    assert_eq!(session.vote_of(&p), Ok(ProposalId(0)));
}

#[test]
fn explicit_null_ballot_is_an_ordinary_proposal() {
    let admin = NullPrincipals::administrator();
    let (mut session, _log) = session_with_log();
    let voters = NullPrincipals::default().take(3);
    open_voting(&mut session, &voters, &["null ballot", "x"]);
    for voter in &voters {
        session.vote(voter, ProposalId(0)).unwrap();
    }
    session.end_voting_session(&admin).unwrap();
    session.tally(&admin).unwrap();
    assert_eq!(
        session.winning_proposal().unwrap().description,
        "null ballot"
    );
}

// ---------------------------------------------------------------------------
// Boundaries
// ---------------------------------------------------------------------------

#[test]
fn vote_at_proposal_count_is_unknown() {
    let (mut session, log) = session_with_log();
    let voters = NullPrincipals::default().take(1);
    open_voting(&mut session, &voters, &["x", "y"]);

    let before = session.snapshot();
    let events = log.len();
    assert_eq!(
        session.vote(&voters[0], ProposalId(2)),
        Err(ElectionError::UnknownProposal(ProposalId(2)))
    );
    assert_unchanged(&before, &session, &log, events);
}

#[test]
fn double_vote_counts_once() {
    let (mut session, log) = session_with_log();
    let voters = NullPrincipals::default().take(1);
    open_voting(&mut session, &voters, &["x"]);

    session.vote(&voters[0], ProposalId(0)).unwrap();
    let before = session.snapshot();
    let events = log.len();
    assert_eq!(
        session.vote(&voters[0], ProposalId(0)),
        Err(ElectionError::AlreadyVoted(voters[0].clone()))
    );
    assert_unchanged(&before, &session, &log, events);
    assert_eq!(session.proposal(ProposalId(0)).unwrap().vote_count, 1);
}

#[test]
fn second_tally_is_rejected() {
    let admin = NullPrincipals::administrator();
    let (mut session, log) = session_with_log();
    let voters = NullPrincipals::default().take(2);
    open_voting(&mut session, &voters, &["x", "y"]);
    session.vote(&voters[1], ProposalId(1)).unwrap();
    session.end_voting_session(&admin).unwrap();
    session.tally(&admin).unwrap();

    let before = session.snapshot();
    let events = log.len();
    assert_eq!(
        session.tally(&admin),
        Err(ElectionError::WrongPhase {
            required: Phase::VotingSessionEnded,
            actual: Phase::VotesTallied,
        })
    );
    assert_unchanged(&before, &session, &log, events);
    assert_eq!(session.get_winner(), Ok(ProposalId(1)));
}

// ---------------------------------------------------------------------------
// Authorization
// ---------------------------------------------------------------------------

#[test]
fn non_administrator_cannot_mutate_in_any_phase() {
    let admin = NullPrincipals::administrator();
    let (mut session, log) = session_with_log();
    let voters = NullPrincipals::default().take(2);
    let mallory = voters[0].clone();

    // walk every phase and try every administrator-only call at each step
    session.register_voters(&admin, &voters).unwrap();
    for phase in Phase::ALL {
        assert_eq!(session.current_phase(), phase);
        let before = session.snapshot();
        let events = log.len();

        let attempts: Vec<Result<(), ElectionError>> = vec![
            session.register_voter(&mallory, Principal::new("sybil")),
            session.register_voters(&mallory, &[Principal::new("sybil")]),
            session.start_proposals_registration(&mallory),
            session.end_proposals_registration(&mallory),
            session.start_voting_session(&mallory),
            session.end_voting_session(&mallory),
            session.tally(&mallory).map(drop),
            session.reset_all(&mallory),
            session.transfer_administration(&mallory, mallory.clone()),
        ];
        for attempt in attempts {
            assert_eq!(
                attempt,
                Err(ElectionError::NotAuthorized {
                    caller: mallory.clone()
                })
            );
        }
        assert_unchanged(&before, &session, &log, events);

        if phase == Phase::ProposalsRegistrationStarted {
            session.register_proposal(&voters[1], "x").unwrap();
        }
        match phase {
            Phase::RegisteringVoters => session.start_proposals_registration(&admin).unwrap(),
            Phase::ProposalsRegistrationStarted => {
                session.end_proposals_registration(&admin).unwrap()
            }
            Phase::ProposalsRegistrationEnded => session.start_voting_session(&admin).unwrap(),
            Phase::VotingSessionStarted => session.end_voting_session(&admin).unwrap(),
            Phase::VotingSessionEnded => {
                session.tally(&admin).unwrap();
            }
            Phase::VotesTallied => {}
        }
    }
}

#[test]
fn out_of_phase_calls_leave_state_unchanged() {
    let admin = NullPrincipals::administrator();
    let (mut session, log) = session_with_log();
    let voters = NullPrincipals::default().take(1);
    session.register_voters(&admin, &voters).unwrap();

    let before = session.snapshot();
    let events = log.len();
    assert!(session.register_proposal(&voters[0], "x").is_err());
    assert!(session.vote(&voters[0], ProposalId(0)).is_err());
    assert!(session.end_voting_session(&admin).is_err());
    assert!(session.tally(&admin).is_err());
    assert_unchanged(&before, &session, &log, events);
}

// ---------------------------------------------------------------------------
// Reset and persistence
// ---------------------------------------------------------------------------

#[test]
fn reset_starts_a_new_round_with_same_roll() {
    let admin = NullPrincipals::administrator();
    let (mut session, log) = session_with_log();
    let voters = NullPrincipals::default().take(2);
    open_voting(&mut session, &voters, &["x", "y"]);
    session.vote(&voters[0], ProposalId(1)).unwrap();

    log.clear();
    session.reset_all(&admin).unwrap();
    assert_eq!(
        log.events(),
        vec![ElectionEvent::SessionReset {
            previous: Phase::VotingSessionStarted,
            round: 1,
        }]
    );

    let snapshot = session.snapshot();
    snapshot.check_invariants().unwrap();
    assert_eq!(snapshot.phase, Phase::RegisteringVoters);
    assert!(snapshot.proposals.is_empty());
    assert_eq!(snapshot.voters.len(), 2);
    assert_eq!(snapshot.ballots_cast(), 0);

    // the same voters can take part in the new round
    session.start_proposals_registration(&admin).unwrap();
    assert_eq!(session.register_proposal(&voters[1], "z"), Ok(ProposalId(0)));
    session.end_proposals_registration(&admin).unwrap();
    session.start_voting_session(&admin).unwrap();
    session.vote(&voters[0], ProposalId(0)).unwrap();
}

#[test]
fn snapshot_bytes_restore_a_running_session() {
    let admin = NullPrincipals::administrator();
    let (mut session, _log) = session_with_log();
    let voters = NullPrincipals::default().take(2);
    open_voting(&mut session, &voters, &["x", "y"]);
    session.vote(&voters[0], ProposalId(1)).unwrap();

    let bytes = session.snapshot().to_bytes().unwrap();
    let snapshot = SessionSnapshot::from_bytes(&bytes).unwrap();
    let mut restored = ElectionSession::restore(snapshot).unwrap();

    assert_eq!(
        restored.vote(&voters[0], ProposalId(0)),
        Err(ElectionError::AlreadyVoted(voters[0].clone()))
    );
    restored.vote(&voters[1], ProposalId(1)).unwrap();
    restored.end_voting_session(&admin).unwrap();
    assert_eq!(restored.tally(&admin), Ok(Some(ProposalId(1))));
}
