//! SQLite persistence for matches.

mod error;
mod models;
mod repository;
mod schema; // Diesel schema - internal use only

pub use error::DbError;
pub use models::MatchRow;
pub use repository::SqliteMatchStore;
