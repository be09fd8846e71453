//! Turn-based tic-tac-toe matches with optimistic concurrency.
//!
//! # Architecture
//!
//! - **Board**: 9-square value type with deterministic win/draw evaluation
//! - **Match**: aggregate with player slots, turn pointer and lifecycle status
//! - **Moves**: pure validate-and-apply step for a single move
//! - **Store**: document store contract with version-checked replace
//! - **Events**: fire-and-forget lifecycle broadcast
//! - **Service**: read-validate-write-publish orchestration
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use matchplay::{InMemoryStore, MatchService, NullPublisher, PlayerId};
//!
//! # async fn example() -> Result<(), matchplay::MatchError> {
//! let service = MatchService::new(Arc::new(InMemoryStore::new()), Arc::new(NullPublisher));
//! let created = service.create(PlayerId::new("u1")).await?;
//! let started = service.start(*created.id(), PlayerId::new("u2")).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod error;
mod events;
mod matches;
mod moves;
pub mod rules;
mod service;
mod store;

pub use board::{Board, BoardError, Mark, Outcome, Square};
pub use error::{InvalidMove, MatchError, PublishError, StoreError};
pub use events::{BroadcastPublisher, EventPublisher, MatchEvent, NullPublisher};
pub use matches::{Match, MatchId, MatchStatus, PlayerId, PlayerSlot, Slot};
pub use moves::apply_move;
pub use rules::Line;
pub use service::{DEFAULT_MAX_ATTEMPTS, MatchService};
pub use store::{InMemoryStore, MatchStore};
