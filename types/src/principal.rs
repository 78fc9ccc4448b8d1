//! Opaque caller identity.

use crate::error::BallotError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The authenticated identity of a caller (administrator or voter).
///
/// The election core never inspects the contents; principals are compared
/// and hashed only. Authentication happens before a principal reaches the core.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Principal(String);

impl Principal {
    /// Wrap a raw identifier without validation.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Return the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A principal is well-formed when it is non-empty and has no whitespace.
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty() && !self.0.chars().any(char::is_whitespace)
    }
}

impl FromStr for Principal {
    type Err = BallotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let principal = Self::new(s);
        if principal.is_valid() {
            Ok(principal)
        } else {
            Err(BallotError::InvalidPrincipal(s.to_string()))
        }
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Principal {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Principal {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
