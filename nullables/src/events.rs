//! Nullable event log: records events without delivering them.

use ballot_election::ElectionEvent;
use std::sync::{Arc, Mutex, MutexGuard};

/// An in-memory, append-only event log.
///
/// Clones share the same log, so one clone can be handed to a session as a
/// listener while the test keeps another for assertions.
#[derive(Clone, Default)]
pub struct NullEventLog {
    events: Arc<Mutex<Vec<ElectionEvent>>>,
}

impl NullEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ElectionEvent>> {
        // a panicking listener must not hide the events recorded before it
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// A listener suitable for `ElectionSession::subscribe`.
    pub fn listener(&self) -> Box<dyn Fn(&ElectionEvent) + Send + Sync> {
        let log = self.clone();
        Box::new(move |event| log.record(event.clone()))
    }

    /// Append an event.
    pub fn record(&self, event: ElectionEvent) {
        self.lock().push(event);
    }

    /// All recorded events, oldest first.
    pub fn events(&self) -> Vec<ElectionEvent> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn last(&self) -> Option<ElectionEvent> {
        self.lock().last().cloned()
    }

    /// Drop everything recorded so far.
    pub fn clear(&self) {
        self.lock().clear();
    }
}
