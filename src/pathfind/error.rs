use strum::Display;

use crate::utils::coords::Cell;

// ----------------------------------------------
// PathErrorKind
// ----------------------------------------------

// Fieldless tag of a PathError, for logging and per-kind counters.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display)]
pub enum PathErrorKind {
    OutOfBounds,
    StartBlocked,
    NoPath,
    InvalidConfiguration,
}

// ----------------------------------------------
// PathError
// ----------------------------------------------

// All search failures are recoverable and returned to the caller.
// Retrying with a different goal or forbidden set is the caller's call.
#[derive(Clone, Debug, PartialEq)]
pub enum PathError {
    // Start or goal cell is outside of the grid bounds.
    OutOfBounds { cell: Cell },

    // Start cell is not walkable or is in the forbidden set.
    StartBlocked { cell: Cell },

    // Frontier exhausted without reaching the goal. Also returned
    // when the goal itself is blocked or forbidden.
    NoPath { start: Cell, goal: Cell },

    // Bad search options or a malformed grid from the provider.
    InvalidConfiguration(String),
}

impl PathError {
    #[inline]
    pub fn kind(&self) -> PathErrorKind {
        match self {
            Self::OutOfBounds { .. }       => PathErrorKind::OutOfBounds,
            Self::StartBlocked { .. }      => PathErrorKind::StartBlocked,
            Self::NoPath { .. }            => PathErrorKind::NoPath,
            Self::InvalidConfiguration(_)  => PathErrorKind::InvalidConfiguration,
        }
    }
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::OutOfBounds { cell } => write!(f, "Cell {cell} is outside of the grid"),
            Self::StartBlocked { cell } => write!(f, "Start cell {cell} is blocked"),
            Self::NoPath { start, goal } => write!(f, "No path from {start} to {goal}"),
            Self::InvalidConfiguration(reason) => write!(f, "Invalid configuration: {reason}"),
        }
    }
}

impl std::error::Error for PathError {}
