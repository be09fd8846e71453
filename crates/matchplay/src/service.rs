//! Match service: read, validate, conditionally write, publish.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use crate::{
    EventPublisher, Match, MatchError, MatchEvent, MatchId, MatchStore, PlayerId, Slot, apply_move,
};

/// Default number of read-validate-write attempts before reporting a conflict.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Orchestrates match operations against a store and a publisher.
///
/// Holds no match state of its own; every operation reads the current
/// document, computes the next one and writes it back with a version check.
#[derive(Clone)]
pub struct MatchService {
    store: Arc<dyn MatchStore>,
    publisher: Arc<dyn EventPublisher>,
    max_attempts: u32,
    pick_first: fn() -> Slot,
}

impl std::fmt::Debug for MatchService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchService")
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}

impl MatchService {
    /// Creates a service over the given collaborators.
    #[instrument(skip(store, publisher))]
    pub fn new(store: Arc<dyn MatchStore>, publisher: Arc<dyn EventPublisher>) -> Self {
        info!("Creating match service");
        Self {
            store,
            publisher,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            pick_first: Slot::random,
        }
    }

    /// Sets how many times a write is attempted when the version moves on.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Replaces the random first-turn choice, for deterministic play.
    pub fn with_turn_picker(mut self, pick_first: fn() -> Slot) -> Self {
        self.pick_first = pick_first;
        self
    }

    /// Returns the backing store.
    pub fn store(&self) -> &Arc<dyn MatchStore> {
        &self.store
    }

    /// Lists matches, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::Store`] if the store fails.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Match>, MatchError> {
        let matches = self.store.find_all().await?;
        debug!(count = matches.len(), "Listed matches");
        Ok(matches)
    }

    /// Fetches one match.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::NotFound`] if absent, [`MatchError::Store`] if
    /// the store fails.
    #[instrument(skip(self))]
    pub async fn get(&self, id: MatchId) -> Result<Match, MatchError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(MatchError::NotFound(id))
    }

    /// Creates a match owned by `creator` and publishes `GAME_CREATED`.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::Store`] if the insert fails.
    #[instrument(skip(self))]
    pub async fn create(&self, creator: PlayerId) -> Result<Match, MatchError> {
        let created = self
            .store
            .create(Match::create(creator, Utc::now()))
            .await?;
        info!(match_id = %created.id(), "Match created");
        self.notify(MatchEvent::GameCreated(created.clone()));
        Ok(created)
    }

    /// Starts or restarts a match and publishes `GAME_UPDATED`.
    ///
    /// # Errors
    ///
    /// [`MatchError::NotFound`], [`MatchError::NotParticipant`],
    /// [`MatchError::Conflict`] or [`MatchError::Store`].
    #[instrument(skip(self))]
    pub async fn start(&self, id: MatchId, requester: PlayerId) -> Result<Match, MatchError> {
        let first = (self.pick_first)();
        let started = self
            .transition(id, |current| current.start(&requester, first, Utc::now()))
            .await?;
        self.notify(MatchEvent::GameUpdated(started.clone()));
        Ok(started)
    }

    /// Plays `requester`'s mark on square `index` and publishes `GAME_UPDATED`.
    ///
    /// # Errors
    ///
    /// [`MatchError::NotFound`], [`MatchError::OutOfTurn`],
    /// [`MatchError::InvalidMove`], [`MatchError::Conflict`] or
    /// [`MatchError::Store`]. On error nothing is written or published.
    #[instrument(skip(self))]
    pub async fn submit_move(
        &self,
        id: MatchId,
        requester: PlayerId,
        index: usize,
    ) -> Result<Match, MatchError> {
        let updated = self
            .transition(id, |current| apply_move(current, &requester, index, Utc::now()))
            .await?;
        info!(
            match_id = %id,
            status = %updated.status(),
            version = updated.version(),
            "Move accepted"
        );
        self.notify(MatchEvent::GameUpdated(updated.clone()));
        Ok(updated)
    }

    /// Deletes a match and publishes `GAME_REMOVED`.
    ///
    /// Returns the removed match as a tombstone with status `Removed`.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::NotFound`] if absent, [`MatchError::Store`] if
    /// the store fails.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: MatchId, requester: PlayerId) -> Result<Match, MatchError> {
        let current = self.get(id).await?;
        if !self.store.delete_by_id(id).await? {
            return Err(MatchError::NotFound(id));
        }
        let tombstone = current.removed(Utc::now());
        info!(match_id = %id, requester = %requester, "Match removed");
        self.notify(MatchEvent::GameRemoved(id));
        Ok(tombstone)
    }

    /// Runs `step` against the stored match and writes the result back,
    /// retrying against fresh state while the version check fails.
    async fn transition<F>(&self, id: MatchId, step: F) -> Result<Match, MatchError>
    where
        F: Fn(&Match) -> Result<Match, MatchError>,
    {
        for attempt in 1..=self.max_attempts {
            let current = self.get(id).await?;
            let next = step(&current)?;
            let expected = *current.version();

            if let Some(saved) = self.store.update_by_id(id, next, expected).await? {
                return Ok(saved);
            }

            warn!(match_id = %id, attempt, expected, "Concurrent update detected, re-reading");
        }

        // The last miss may have been a delete rather than a competing write.
        self.get(id).await?;
        Err(MatchError::Conflict(id))
    }

    fn notify(&self, event: MatchEvent) {
        let kind = event.kind();
        if let Err(e) = self.publisher.publish(event) {
            warn!(kind, error = %e, "Failed to publish event");
        }
    }
}
