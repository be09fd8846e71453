//! Match persistence contract and an in-memory implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use crate::{Match, MatchId, StoreError};

/// Document store for matches with whole-document replace semantics.
///
/// `update_by_id` is a compare-and-swap: the write only happens when the
/// stored version still equals `expected_version`.
#[async_trait]
pub trait MatchStore: Send + Sync {
    /// Inserts a new match.
    async fn create(&self, record: Match) -> Result<Match, StoreError>;

    /// Loads a match, `None` if absent.
    async fn find_by_id(&self, id: MatchId) -> Result<Option<Match>, StoreError>;

    /// Loads all matches, newest first.
    async fn find_all(&self) -> Result<Vec<Match>, StoreError>;

    /// Replaces the stored document if its version equals `expected_version`.
    ///
    /// Returns `None` when the match is absent or the version moved on.
    async fn update_by_id(
        &self,
        id: MatchId,
        record: Match,
        expected_version: u64,
    ) -> Result<Option<Match>, StoreError>;

    /// Deletes a match; `false` if it did not exist.
    async fn delete_by_id(&self, id: MatchId) -> Result<bool, StoreError>;
}

/// In-process store backed by a locked map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    matches: Arc<RwLock<HashMap<MatchId, Match>>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating in-memory match store");
        Self::default()
    }
}

#[async_trait]
impl MatchStore for InMemoryStore {
    #[instrument(skip(self, record), fields(match_id = %record.id()))]
    async fn create(&self, record: Match) -> Result<Match, StoreError> {
        let mut matches = self.matches.write().await;
        if matches.contains_key(record.id()) {
            return Err(StoreError::new(format!(
                "Match {} already exists",
                record.id()
            )));
        }
        matches.insert(*record.id(), record.clone());
        debug!(count = matches.len(), "Match inserted");
        Ok(record)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: MatchId) -> Result<Option<Match>, StoreError> {
        let matches = self.matches.read().await;
        Ok(matches.get(&id).cloned())
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<Match>, StoreError> {
        let matches = self.matches.read().await;
        let mut all: Vec<Match> = matches.values().cloned().collect();
        all.sort_by(|a, b| {
            b.created_at()
                .cmp(a.created_at())
                .then_with(|| b.id().cmp(a.id()))
        });
        debug!(count = all.len(), "Matches listed");
        Ok(all)
    }

    #[instrument(skip(self, record), fields(version = record.version()))]
    async fn update_by_id(
        &self,
        id: MatchId,
        record: Match,
        expected_version: u64,
    ) -> Result<Option<Match>, StoreError> {
        let mut matches = self.matches.write().await;
        match matches.get_mut(&id) {
            Some(stored) if *stored.version() == expected_version => {
                *stored = record.clone();
                debug!("Match replaced");
                Ok(Some(record))
            }
            Some(stored) => {
                debug!(stored_version = stored.version(), "Version check failed");
                Ok(None)
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    async fn delete_by_id(&self, id: MatchId) -> Result<bool, StoreError> {
        let mut matches = self.matches.write().await;
        Ok(matches.remove(&id).is_some())
    }
}
