//! Route handlers.

use axum::Json;
use axum::extract::{Query, State};
use matchplay::{Match, MatchId};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::{ApiError, AppState, Caller, MatchPath, MoveBody};

/// Optional paging for listings.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Pagination {
    /// Matches to skip.
    pub offset: Option<usize>,
    /// Maximum matches to return.
    pub limit: Option<usize>,
}

/// Body of a move request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Target square (0-8, row-major).
    pub index: usize,
}

/// Confirmation of a removal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemovedResponse {
    /// Always `"Removed"`.
    pub message: String,
    /// Id of the removed match.
    pub id: MatchId,
}

/// `GET /games`
#[instrument(skip(state))]
pub async fn list_matches(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<Match>>, ApiError> {
    let matches: Vec<Match> = state
        .service()
        .list()
        .await?
        .into_iter()
        .skip(page.offset.unwrap_or(0))
        .take(page.limit.unwrap_or(usize::MAX))
        .collect();
    debug!(count = matches.len(), "Returning matches");
    Ok(Json(matches))
}

/// `GET /games/{id}`
#[instrument(skip(state))]
pub async fn get_match(
    State(state): State<AppState>,
    MatchPath(id): MatchPath,
) -> Result<Json<Match>, ApiError> {
    Ok(Json(state.service().get(id).await?))
}

/// `POST /games`
#[instrument(skip(state))]
pub async fn create_match(
    State(state): State<AppState>,
    Caller(caller): Caller,
) -> Result<Json<Match>, ApiError> {
    Ok(Json(state.service().create(caller).await?))
}

/// `PUT /games/{id}`: start or restart.
#[instrument(skip(state))]
pub async fn start_match(
    State(state): State<AppState>,
    Caller(caller): Caller,
    MatchPath(id): MatchPath,
) -> Result<Json<Match>, ApiError> {
    Ok(Json(state.service().start(id, caller).await?))
}

/// `PATCH /games/{id}`: play a move.
#[instrument(skip(state, body), fields(index = body.index))]
pub async fn submit_move(
    State(state): State<AppState>,
    Caller(caller): Caller,
    MatchPath(id): MatchPath,
    MoveBody(body): MoveBody,
) -> Result<Json<Match>, ApiError> {
    Ok(Json(state.service().submit_move(id, caller, body.index).await?))
}

/// `DELETE /games/{id}`
#[instrument(skip(state))]
pub async fn remove_match(
    State(state): State<AppState>,
    Caller(caller): Caller,
    MatchPath(id): MatchPath,
) -> Result<Json<RemovedResponse>, ApiError> {
    let removed = state.service().remove(id, caller).await?;
    Ok(Json(RemovedResponse {
        message: "Removed".to_string(),
        id: *removed.id(),
    }))
}
