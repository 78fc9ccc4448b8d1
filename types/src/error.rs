//! Error type for parsing and validating the shared types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BallotError {
    #[error("invalid principal: {0:?}")]
    InvalidPrincipal(String),
}
