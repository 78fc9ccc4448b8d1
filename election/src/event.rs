//! Events emitted by the election session for external observers.

use ballot_types::{Phase, Principal, ProposalId};
use serde::{Deserialize, Serialize};

/// One committed state change. Exactly one is emitted per successful
/// mutating call (bulk registration emits one per registered voter).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElectionEvent {
    VoterRegistered {
        voter: Principal,
    },
    ProposalRegistered {
        proposal_id: ProposalId,
    },
    Voted {
        voter: Principal,
        proposal_id: ProposalId,
    },
    PhaseChanged {
        previous: Phase,
        new: Phase,
    },
    AdministratorTransferred {
        previous: Principal,
        new: Principal,
    },
    /// The session returned to `RegisteringVoters` and started `round`.
    SessionReset {
        previous: Phase,
        round: u64,
    },
}

type Listener = Box<dyn Fn(&ElectionEvent) + Send + Sync>;

/// Synchronous fan-out event bus.
///
/// Listeners run inline on the caller after the mutation has committed;
/// keep them fast.
pub struct EventBus {
    listeners: Vec<Listener>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &ElectionEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
