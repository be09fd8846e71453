//! Match aggregate and lifecycle transitions.
//!
//! Every transition is a pure function from the current [`Match`] to the
//! next one. Nothing here touches storage; callers persist the returned
//! value with a version check.

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::{Board, Mark, MatchError};

/// Unique identifier for a match.
#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, From, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MatchId(Uuid);

impl MatchId {
    /// Generates a fresh random id.
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::str::FromStr for MatchId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Identity of a caller, as issued by the identity provider.
#[derive(Debug, Display, Clone, PartialEq, Eq, Hash, From, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Creates a player id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlayerId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Seat at the table. Slot 0 plays X, slot 1 plays O.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Slot {
    /// Slot 0, the creator's seat.
    First,
    /// Slot 1, the opponent's seat.
    Second,
}

impl Slot {
    /// Returns the position index (0 or 1).
    pub fn index(self) -> usize {
        match self {
            Slot::First => 0,
            Slot::Second => 1,
        }
    }

    /// Returns the mark this slot plays.
    pub fn mark(self) -> Mark {
        match self {
            Slot::First => Mark::X,
            Slot::Second => Mark::O,
        }
    }

    /// Returns the other slot.
    pub fn other(self) -> Self {
        match self {
            Slot::First => Slot::Second,
            Slot::Second => Slot::First,
        }
    }

    /// Picks a slot uniformly at random.
    pub fn random() -> Self {
        if rand::random::<bool>() {
            Slot::First
        } else {
            Slot::Second
        }
    }
}

impl From<Slot> for u8 {
    fn from(slot: Slot) -> Self {
        slot.index() as u8
    }
}

impl TryFrom<u8> for Slot {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Slot::First),
            1 => Ok(Slot::Second),
            other => Err(format!("Invalid slot index: {}", other)),
        }
    }
}

/// A seated player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSlot {
    /// Occupant of the seat.
    user_id: PlayerId,
    /// Which seat.
    slot: Slot,
}

impl PlayerSlot {
    /// Seats a player.
    pub fn new(user_id: PlayerId, slot: Slot) -> Self {
        Self { user_id, slot }
    }
}

/// Lifecycle status of a match.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MatchStatus {
    /// Created, waiting for a start.
    Created,
    /// Moves are being accepted.
    InProgress,
    /// A player completed a line.
    Won,
    /// Board filled without a line.
    Drawn,
    /// Deleted from the store.
    Removed,
}

/// One tic-tac-toe game between two players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    /// Immutable identity.
    id: MatchId,
    /// Seated players, slot 0 first.
    players: Vec<PlayerSlot>,
    /// Current board.
    squares: Board,
    /// Slot that may move next, unset until the first start.
    turn: Option<Slot>,
    /// Lifecycle status.
    status: MatchStatus,
    /// Winner, set only on transition to [`MatchStatus::Won`].
    winner_id: Option<PlayerId>,
    /// Creation time, used for listing order.
    created_at: DateTime<Utc>,
    /// Time of the last accepted transition.
    updated_at: DateTime<Utc>,
    /// Optimistic concurrency token, bumped on every accepted transition.
    version: u64,
}

impl Match {
    /// Creates a match with the creator seated in slot 0.
    #[instrument(skip(now))]
    pub fn create(creator: PlayerId, now: DateTime<Utc>) -> Self {
        let id = MatchId::new_v4();
        info!(match_id = %id, creator = %creator, "Creating match");
        Self {
            id,
            players: vec![PlayerSlot::new(creator, Slot::First)],
            squares: Board::new(),
            turn: None,
            status: MatchStatus::Created,
            winner_id: None,
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }

    /// Reassembles a match from stored fields.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: MatchId,
        players: Vec<PlayerSlot>,
        squares: Board,
        turn: Option<Slot>,
        status: MatchStatus,
        winner_id: Option<PlayerId>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        version: u64,
    ) -> Self {
        Self {
            id,
            players,
            squares,
            turn,
            status,
            winner_id,
            created_at,
            updated_at,
            version,
        }
    }

    /// Returns the slot occupied by `player`, if seated.
    pub fn slot_of(&self, player: &PlayerId) -> Option<Slot> {
        self.players
            .iter()
            .find(|p| p.user_id() == player)
            .map(|p| *p.slot())
    }

    /// Returns the occupant of `slot`, if seated.
    pub fn occupant(&self, slot: Slot) -> Option<&PlayerId> {
        self.players
            .iter()
            .find(|p| *p.slot() == slot)
            .map(|p| p.user_id())
    }

    /// Starts (or restarts) the match.
    ///
    /// An unseated requester takes slot 1 when it is free. The board is
    /// cleared, `first` receives the turn and any previous winner is
    /// forgotten.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::NotParticipant`] if the requester is unseated
    /// and both seats are taken.
    #[instrument(skip(self, now), fields(match_id = %self.id, status = %self.status))]
    pub fn start(
        &self,
        requester: &PlayerId,
        first: Slot,
        now: DateTime<Utc>,
    ) -> Result<Match, MatchError> {
        let mut next = self.clone();

        if self.slot_of(requester).is_none() {
            if self.occupant(Slot::Second).is_some() {
                warn!(requester = %requester, "Match already has two players");
                return Err(MatchError::NotParticipant(requester.clone()));
            }
            info!(requester = %requester, "Seating second player");
            next.players
                .push(PlayerSlot::new(requester.clone(), Slot::Second));
        }

        if next.players.len() < 2 {
            debug!("Starting with a single seated player");
        }

        next.squares = Board::new();
        next.turn = Some(first);
        next.status = MatchStatus::InProgress;
        next.winner_id = None;
        next.touch(now);

        info!(first = ?first, version = next.version, "Match started");
        Ok(next)
    }

    /// Returns the tombstone snapshot of a deleted match.
    pub fn removed(&self, now: DateTime<Utc>) -> Match {
        let mut next = self.clone();
        next.status = MatchStatus::Removed;
        next.turn = None;
        next.touch(now);
        next
    }

    /// Records an accepted move. Called by the move processor only.
    pub(crate) fn record_move(
        &mut self,
        squares: Board,
        turn: Slot,
        status: MatchStatus,
        winner_id: Option<PlayerId>,
        now: DateTime<Utc>,
    ) {
        self.squares = squares;
        self.turn = Some(turn);
        self.status = status;
        self.winner_id = winner_id;
        self.touch(now);
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.version += 1;
        self.updated_at = now;
    }
}
