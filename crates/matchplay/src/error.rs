//! Error types for match operations.

use derive_more::{Display, Error};
use tracing::instrument;

use crate::{BoardError, MatchId, MatchStatus, PlayerId};

/// Storage backend failure with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Store error: {} at {}:{}", message, file, line)]
pub struct StoreError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl StoreError {
    /// Creates a new store error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Failure delivering an event to subscribers.
#[derive(Debug, Clone, Display, Error)]
#[display("Publish error: {}", message)]
pub struct PublishError {
    /// Error message.
    pub message: String,
}

impl PublishError {
    /// Creates a new publish error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Why a move was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum InvalidMove {
    /// Square index outside 0..=8.
    #[display("Square {} is out of range (must be 0-8)", _0)]
    OutOfRange(usize),
    /// Square already holds a mark.
    #[display("Square {} is already occupied", _0)]
    Occupied(usize),
    /// Match is not accepting moves.
    #[display("Match is not in progress (status: {})", _0)]
    NotInProgress(MatchStatus),
}

impl From<BoardError> for InvalidMove {
    fn from(err: BoardError) -> Self {
        match err {
            BoardError::InvalidIndex(index) => InvalidMove::OutOfRange(index),
        }
    }
}

/// Errors surfaced by match operations.
#[derive(Debug, Clone, Display)]
pub enum MatchError {
    /// No match with this id.
    #[display("Match {} not found", _0)]
    NotFound(MatchId),

    /// Requester does not hold the turn.
    #[display("Wait for your turn ({} tried to move)", requester)]
    OutOfTurn {
        /// Caller that attempted the move.
        requester: PlayerId,
        /// Occupant of the slot holding the turn, if seated.
        expected: Option<PlayerId>,
    },

    /// Target square cannot be played.
    #[display("Invalid move: {}", _0)]
    InvalidMove(InvalidMove),

    /// Requester is not seated and both seats are taken.
    #[display("{} is not a player in this match", _0)]
    NotParticipant(PlayerId),

    /// Concurrent writers kept winning the version check.
    #[display("Match {} was modified concurrently, try again", _0)]
    Conflict(MatchId),

    /// Storage backend failed.
    #[display("{}", _0)]
    Store(StoreError),
}

impl std::error::Error for MatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MatchError::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for MatchError {
    fn from(err: StoreError) -> Self {
        MatchError::Store(err)
    }
}

impl From<InvalidMove> for MatchError {
    fn from(err: InvalidMove) -> Self {
        MatchError::InvalidMove(err)
    }
}

impl From<BoardError> for MatchError {
    fn from(err: BoardError) -> Self {
        MatchError::InvalidMove(err.into())
    }
}
