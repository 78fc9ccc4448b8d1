//! Nullable principals: deterministic caller identities.

use ballot_types::Principal;
use std::cell::Cell;

/// Hands out `"{prefix}-0"`, `"{prefix}-1"`, ... in order.
pub struct NullPrincipals {
    prefix: String,
    issued: Cell<u64>,
}

impl NullPrincipals {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            issued: Cell::new(0),
        }
    }

    /// The fixed administrator identity used across tests.
    pub fn administrator() -> Principal {
        Principal::new("admin")
    }

    /// The next unused principal.
    pub fn issue(&self) -> Principal {
        let n = self.issued.get();
        self.issued.set(n + 1);
        Principal::new(format!("{}-{n}", self.prefix))
    }

    /// The next `count` principals.
    pub fn take(&self, count: usize) -> Vec<Principal> {
        (0..count).map(|_| self.issue()).collect()
    }

    /// How many principals have been handed out.
    pub fn issued(&self) -> u64 {
        self.issued.get()
    }
}

impl Default for NullPrincipals {
    fn default() -> Self {
        Self::new("voter")
    }
}
