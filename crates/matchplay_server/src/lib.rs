//! Matchplay server: REST API, live event stream and persistence for
//! two-player tic-tac-toe matches.
//!
//! The match rules live in the `matchplay` crate. This crate wires them to
//! HTTP routes, a websocket event feed, bearer-token identity and an
//! optional SQLite store.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod api;
mod auth;
pub mod cli;
mod config;
#[cfg(feature = "sqlite")]
mod db;

use std::sync::Arc;

use anyhow::Result;
use matchplay::{BroadcastPublisher, InMemoryStore, MatchService, MatchStore};
use tracing::{info, instrument};

pub use api::{
    ApiError, AppState, Caller, ErrorBody, MatchPath, MoveBody, MoveRequest, Pagination,
    RemovedResponse, router,
};
pub use auth::{IdentityProvider, TokenTable, bearer_token};
pub use config::{
    AuthConfig, BroadcastConfig, ConfigError, MoveConfig, ServerConfig, StoreBackend,
    StoreConfig,
};
#[cfg(feature = "sqlite")]
pub use db::{DbError, MatchRow, SqliteMatchStore};

/// Builds the store selected by `config`.
///
/// # Errors
///
/// Fails if the SQLite database cannot be opened, or if SQLite is
/// requested in a build without the `sqlite` feature.
#[instrument(skip(config), fields(backend = %config.store().backend()))]
pub fn build_store(config: &ServerConfig) -> Result<Arc<dyn MatchStore>> {
    match config.store().backend() {
        StoreBackend::Memory => {
            info!("Using in-memory store");
            Ok(Arc::new(InMemoryStore::new()))
        }
        #[cfg(feature = "sqlite")]
        StoreBackend::Sqlite => {
            let store = SqliteMatchStore::open(config.store().path().clone())?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "sqlite"))]
        StoreBackend::Sqlite => {
            anyhow::bail!("SQLite store requested but the sqlite feature is disabled")
        }
    }
}

/// Assembles the handler state: store, event channel, service and token
/// table, all taken from `config`.
///
/// # Errors
///
/// Fails if the store cannot be built.
#[instrument(skip(config))]
pub fn build_state(config: &ServerConfig) -> Result<AppState> {
    let store = build_store(config)?;
    let events = BroadcastPublisher::new(*config.broadcast().capacity());
    let service = MatchService::new(store, Arc::new(events.clone()))
        .with_max_attempts(*config.moves().max_attempts());
    let identity = TokenTable::new(config.auth().tokens().clone());
    info!(
        capacity = config.broadcast().capacity(),
        max_attempts = config.moves().max_attempts(),
        "Application state ready"
    );
    Ok(AppState::new(service, Arc::new(identity), events))
}
