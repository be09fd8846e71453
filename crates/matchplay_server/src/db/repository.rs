//! SQLite-backed match store.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use matchplay::{Match, MatchId, MatchStore, StoreError};
use tracing::{debug, info, instrument};

use crate::db::{DbError, MatchRow, schema};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Match store persisting one row per match in SQLite.
///
/// Each call opens its own connection. Writes to an existing match are
/// conditioned on the stored version, so concurrent writers cannot
/// overwrite each other.
#[derive(Debug, Clone)]
pub struct SqliteMatchStore {
    db_path: String,
}

impl SqliteMatchStore {
    /// Opens the database at `db_path`, creating the schema if needed.
    ///
    /// `:memory:` is not supported because every call uses a fresh
    /// connection.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the database cannot be opened or migrated.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn open(db_path: String) -> Result<Self, DbError> {
        info!(path = %db_path, "Opening SqliteMatchStore");
        let store = Self { db_path };
        let mut conn = store.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(format!("Migrations failed: {}", e)))?;
        info!(count = applied.len(), "Migrations applied");
        Ok(store)
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path).map_err(|e| {
            DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e))
        })?;
        diesel::sql_query("PRAGMA busy_timeout = 5000").execute(&mut conn)?;
        Ok(conn)
    }

    /// Inserts a new match row.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the id already exists or a database error occurs.
    #[instrument(skip(self, record), fields(match_id = %record.id()))]
    pub fn insert(&self, record: &Match) -> Result<Match, DbError> {
        let mut conn = self.connection()?;
        let row = MatchRow::try_from(record)?;

        let saved = diesel::insert_into(schema::matches::table)
            .values(&row)
            .returning(MatchRow::as_returning())
            .get_result(&mut conn)?;

        info!("Match row inserted");
        Match::try_from(saved)
    }

    /// Gets a match by id. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn get(&self, id: MatchId) -> Result<Option<Match>, DbError> {
        let mut conn = self.connection()?;

        let row = schema::matches::table
            .find(id.to_string())
            .select(MatchRow::as_select())
            .first(&mut conn)
            .optional()?;

        row.map(Match::try_from).transpose()
    }

    /// Lists all matches, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn list(&self) -> Result<Vec<Match>, DbError> {
        let mut conn = self.connection()?;

        let rows = schema::matches::table
            .order((
                schema::matches::created_at.desc(),
                schema::matches::id.desc(),
            ))
            .select(MatchRow::as_select())
            .load(&mut conn)?;

        info!(count = rows.len(), "Matches loaded");
        rows.into_iter().map(Match::try_from).collect()
    }

    /// Replaces a match row if its stored version equals `expected_version`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, record), fields(version = record.version()))]
    pub fn replace_if_version(
        &self,
        id: MatchId,
        record: &Match,
        expected_version: u64,
    ) -> Result<Option<Match>, DbError> {
        let mut conn = self.connection()?;
        let row = MatchRow::try_from(record)?;
        let expected = i64::try_from(expected_version)
            .map_err(|_| DbError::new(format!("Version {} out of range", expected_version)))?;

        let saved = diesel::update(
            schema::matches::table
                .filter(schema::matches::id.eq(id.to_string()))
                .filter(schema::matches::version.eq(expected)),
        )
        .set(&row)
        .returning(MatchRow::as_returning())
        .get_result(&mut conn)
        .optional()?;

        if saved.is_none() {
            debug!(expected, "No row matched id and version");
        }
        saved.map(Match::try_from).transpose()
    }

    /// Deletes a match row. Returns `false` if none existed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn delete(&self, id: MatchId) -> Result<bool, DbError> {
        let mut conn = self.connection()?;
        let deleted = diesel::delete(schema::matches::table.find(id.to_string()))
            .execute(&mut conn)?;
        debug!(deleted, "Match rows deleted");
        Ok(deleted > 0)
    }

    /// Runs a repository call on the blocking pool.
    async fn blocking<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&SqliteMatchStore) -> Result<T, DbError> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.clone();
        tokio::task::spawn_blocking(move || f(&store))
            .await
            .map_err(|e| StoreError::new(format!("Blocking task failed: {}", e)))?
            .map_err(StoreError::from)
    }
}

#[async_trait]
impl MatchStore for SqliteMatchStore {
    async fn create(&self, record: Match) -> Result<Match, StoreError> {
        self.blocking(move |store| store.insert(&record)).await
    }

    async fn find_by_id(&self, id: MatchId) -> Result<Option<Match>, StoreError> {
        self.blocking(move |store| store.get(id)).await
    }

    async fn find_all(&self) -> Result<Vec<Match>, StoreError> {
        self.blocking(|store| store.list()).await
    }

    async fn update_by_id(
        &self,
        id: MatchId,
        record: Match,
        expected_version: u64,
    ) -> Result<Option<Match>, StoreError> {
        self.blocking(move |store| store.replace_if_version(id, &record, expected_version))
            .await
    }

    async fn delete_by_id(&self, id: MatchId) -> Result<bool, StoreError> {
        self.blocking(move |store| store.delete(id)).await
    }
}
