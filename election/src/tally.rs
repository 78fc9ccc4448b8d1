//! Winner selection.

use ballot_types::ProposalId;
use serde::{Deserialize, Serialize};

/// Result of a tally over a non-empty proposal list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyOutcome {
    pub winner: ProposalId,
    pub winning_votes: u64,
    /// Other proposals that reached the same count and lost the tie-break.
    pub tied_with: Vec<ProposalId>,
}

/// Picks the proposal with the most votes.
///
/// Tie-break: the lowest id wins. A forward scan only replaces the leader on
/// a strictly greater count, so the first maximum seen is kept.
#[derive(Debug, Default, Clone, Copy)]
pub struct TallyEngine;

impl TallyEngine {
    pub fn new() -> Self {
        Self
    }

    /// `counts[i]` is the vote count of proposal `i`. `None` when empty.
    pub fn tally(&self, counts: &[u64]) -> Option<TallyOutcome> {
        let mut leader: Option<(usize, u64)> = None;
        for (index, &count) in counts.iter().enumerate() {
            match leader {
                Some((_, best)) if count <= best => {}
                _ => leader = Some((index, count)),
            }
        }

        let (winner, winning_votes) = leader?;
        let tied_with = counts
            .iter()
            .enumerate()
            .filter(|&(index, &count)| index != winner && count == winning_votes)
            .map(|(index, _)| ProposalId::new(index))
            .collect();

        Some(TallyOutcome {
            winner: ProposalId::new(winner),
            winning_votes,
            tied_with,
        })
    }
}
