//! Database row model and conversions to the domain type.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use diesel::prelude::*;
use matchplay::{Board, Mark, Match, MatchId, MatchStatus, PlayerId, PlayerSlot, Slot, Square};
use tracing::instrument;

use crate::db::{DbError, schema};

/// One row of the `matches` table.
///
/// Players are stored as JSON, the board as nine characters (`X`, `O` or
/// `-`) in row-major order.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset, Getters)]
#[diesel(table_name = schema::matches)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct MatchRow {
    id: String,
    players: String,
    squares: String,
    turn: Option<i32>,
    status: String,
    winner_id: Option<String>,
    version: i64,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl TryFrom<&Match> for MatchRow {
    type Error = DbError;

    #[instrument(skip(m), fields(match_id = %m.id()))]
    fn try_from(m: &Match) -> Result<Self, Self::Error> {
        Ok(Self {
            id: m.id().to_string(),
            players: serde_json::to_string(m.players())?,
            squares: encode_squares(m.squares()),
            turn: m.turn().map(|slot| slot.index() as i32),
            status: m.status().to_string(),
            winner_id: m.winner_id().as_ref().map(|p| p.as_str().to_string()),
            version: i64::try_from(*m.version())
                .map_err(|_| DbError::new(format!("Version {} out of range", m.version())))?,
            created_at: m.created_at().naive_utc(),
            updated_at: m.updated_at().naive_utc(),
        })
    }
}

impl TryFrom<MatchRow> for Match {
    type Error = DbError;

    #[instrument(skip(row), fields(match_id = %row.id))]
    fn try_from(row: MatchRow) -> Result<Self, Self::Error> {
        let id: MatchId = row
            .id
            .parse()
            .map_err(|e| DbError::new(format!("Invalid match id '{}': {}", row.id, e)))?;
        let players: Vec<PlayerSlot> = serde_json::from_str(&row.players)?;
        let turn = row
            .turn
            .map(|t| {
                u8::try_from(t)
                    .map_err(|_| format!("Invalid slot index: {}", t))
                    .and_then(Slot::try_from)
            })
            .transpose()
            .map_err(DbError::new)?;
        let status: MatchStatus = row
            .status
            .parse()
            .map_err(|_| DbError::new(format!("Invalid status: '{}'", row.status)))?;
        let version = u64::try_from(row.version)
            .map_err(|_| DbError::new(format!("Invalid version: {}", row.version)))?;

        Ok(Match::from_parts(
            id,
            players,
            decode_squares(&row.squares)?,
            turn,
            status,
            row.winner_id.map(PlayerId::new),
            row.created_at.and_utc(),
            row.updated_at.and_utc(),
            version,
        ))
    }
}

/// Encodes a board as nine characters.
pub fn encode_squares(board: &Board) -> String {
    board
        .squares()
        .iter()
        .map(|square| match square {
            Square::Empty => '-',
            Square::Occupied(Mark::X) => 'X',
            Square::Occupied(Mark::O) => 'O',
        })
        .collect()
}

/// Decodes a board stored by [`encode_squares`].
pub fn decode_squares(encoded: &str) -> Result<Board, DbError> {
    let chars: Vec<char> = encoded.chars().collect();
    if chars.len() != Board::SIZE {
        return Err(DbError::new(format!(
            "Board '{}' must have {} squares",
            encoded,
            Board::SIZE
        )));
    }
    let mut squares = [Square::Empty; 9];
    for (square, c) in squares.iter_mut().zip(chars) {
        *square = match c {
            '-' => Square::Empty,
            'X' => Square::Occupied(Mark::X),
            'O' => Square::Occupied(Mark::O),
            other => return Err(DbError::new(format!("Invalid square '{}'", other))),
        };
    }
    Ok(Board::from_squares(squares))
}
