//! Phase gate: the single source of truth for which operations are legal now.

use crate::error::ElectionError;
use ballot_types::Phase;

/// Owns the current workflow phase.
///
/// Transitions only move one step forward; the sole backward edge is
/// [`PhaseGate::reset`].
#[derive(Debug, Default)]
pub struct PhaseGate {
    current: Phase,
}

impl PhaseGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn restore(current: Phase) -> Self {
        Self { current }
    }

    pub fn current(&self) -> Phase {
        self.current
    }

    /// Fail unless the current phase is exactly `required`.
    pub fn require(&self, required: Phase) -> Result<(), ElectionError> {
        if self.current == required {
            Ok(())
        } else {
            Err(ElectionError::WrongPhase {
                required,
                actual: self.current,
            })
        }
    }

    /// Fail unless the workflow has reached `earliest`.
    pub fn require_at_least(&self, earliest: Phase) -> Result<(), ElectionError> {
        if self.current >= earliest {
            Ok(())
        } else {
            Err(ElectionError::PhaseTooEarly {
                earliest,
                actual: self.current,
            })
        }
    }

    /// Check that `from` is current and has a successor, without moving.
    pub fn check_advance(&self, from: Phase) -> Result<Phase, ElectionError> {
        self.require(from)?;
        // the terminal phase has no successor
        from.next().ok_or(ElectionError::WrongPhase {
            required: from,
            actual: self.current,
        })
    }

    /// Move from `from` to its successor. Returns `(previous, new)`.
    pub fn advance(&mut self, from: Phase) -> Result<(Phase, Phase), ElectionError> {
        let next = self.check_advance(from)?;
        self.current = next;
        Ok((from, next))
    }

    /// Return to the initial phase. Returns the phase left behind.
    pub fn reset(&mut self) -> Phase {
        std::mem::take(&mut self.current)
    }
}
