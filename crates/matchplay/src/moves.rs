//! Move validation and application.
//!
//! [`apply_move`] is the whole state machine for a single move: it checks
//! turn ownership and square availability against a snapshot and derives
//! the next snapshot. The mark is always taken from the turn, never from
//! the caller.

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};

use crate::{InvalidMove, Match, MatchError, MatchStatus, Outcome, PlayerId};

/// Validates a move by `requester` on square `index` and returns the next
/// match value.
///
/// # Errors
///
/// * [`MatchError::InvalidMove`] if the match is not in progress, the index
///   is out of range or the square is occupied.
/// * [`MatchError::OutOfTurn`] if the requester does not occupy the slot
///   holding the turn.
#[instrument(skip(current, now), fields(match_id = %current.id(), version = current.version()))]
pub fn apply_move(
    current: &Match,
    requester: &PlayerId,
    index: usize,
    now: DateTime<Utc>,
) -> Result<Match, MatchError> {
    let status = *current.status();
    let turn = match (status, *current.turn()) {
        (MatchStatus::InProgress, Some(turn)) => turn,
        _ => {
            debug!(status = %status, "Match not accepting moves");
            return Err(InvalidMove::NotInProgress(status).into());
        }
    };

    let expected = current.occupant(turn);
    if expected != Some(requester) {
        warn!(
            requester = %requester,
            expected = ?expected,
            turn = ?turn,
            "Player tried to move out of turn"
        );
        return Err(MatchError::OutOfTurn {
            requester: requester.clone(),
            expected: expected.cloned(),
        });
    }

    let board = current.squares();
    if index >= board.squares().len() {
        return Err(InvalidMove::OutOfRange(index).into());
    }
    if !board.is_vacant(index) {
        warn!(index, "Square already occupied");
        return Err(InvalidMove::Occupied(index).into());
    }

    let mark = turn.mark();
    let squares = board.place(index, mark)?;

    let (status, winner_id) = match squares.evaluate() {
        Outcome::Win { line, .. } => {
            info!(winner = %requester, mark = %mark, line = ?line.cells(), "Match won");
            (MatchStatus::Won, Some(requester.clone()))
        }
        Outcome::Draw => {
            info!("Match drawn");
            (MatchStatus::Drawn, None)
        }
        Outcome::Undecided => (MatchStatus::InProgress, None),
    };

    let mut next = current.clone();
    next.record_move(squares, turn.other(), status, winner_id, now);

    debug!(
        index,
        mark = %mark,
        status = %next.status(),
        version = next.version(),
        board = %next.squares().display(),
        "Move applied"
    );
    Ok(next)
}
