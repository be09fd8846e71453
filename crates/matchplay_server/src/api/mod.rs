//! HTTP API for matches.

mod error;
mod events;
mod handlers;

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::routing::get;
use axum::{Json, Router};
use derive_new::new;
use matchplay::{BroadcastPublisher, MatchId, MatchService, PlayerId};
use tower_http::trace::TraceLayer;
use tracing::{debug, instrument, warn};

use crate::auth::{IdentityProvider, bearer_token};

pub use error::{ApiError, ErrorBody};
pub use handlers::{MoveRequest, Pagination, RemovedResponse};

/// Shared state for all handlers: the service, the identity provider and
/// the event channel that websocket observers subscribe to.
#[derive(Clone, new)]
pub struct AppState {
    service: MatchService,
    identity: Arc<dyn IdentityProvider>,
    events: BroadcastPublisher,
}

impl AppState {
    /// Returns the match service.
    pub fn service(&self) -> &MatchService {
        &self.service
    }
}

/// Authenticated caller.
#[derive(Debug, Clone)]
pub struct Caller(pub PlayerId);

impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(ApiError::Unauthorized)?;
        let player = state
            .identity
            .identify(token)
            .ok_or(ApiError::Unauthorized)?;
        debug!(player = %player, "Caller identified");
        Ok(Caller(player))
    }
}

/// Match id taken from the path. A malformed id is rejected as
/// [`ApiError::MalformedId`].
#[derive(Debug, Clone, Copy)]
pub struct MatchPath(pub MatchId);

impl<S: Send + Sync> FromRequestParts<S> for MatchPath {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<MatchId>::from_request_parts(parts, state)
            .await
            .map_err(|rejection: PathRejection| {
                warn!(error = %rejection.body_text(), "Rejected match id");
                ApiError::MalformedId(rejection.body_text())
            })?;
        Ok(MatchPath(id))
    }
}

/// JSON move body. Anything that does not deserialize into a
/// [`MoveRequest`] is rejected as [`ApiError::MalformedMove`].
#[derive(Debug, Clone)]
pub struct MoveBody(pub MoveRequest);

impl<S: Send + Sync> FromRequest<S> for MoveBody {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<MoveRequest>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| {
                warn!(error = %rejection.body_text(), "Rejected move body");
                ApiError::MalformedMove(rejection.body_text())
            })?;
        Ok(MoveBody(body))
    }
}

/// Builds the router with all match routes.
#[instrument(skip(state))]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/games",
            get(handlers::list_matches).post(handlers::create_match),
        )
        .route(
            "/games/{id}",
            get(handlers::get_match)
                .put(handlers::start_match)
                .patch(handlers::submit_move)
                .delete(handlers::remove_match),
        )
        .route("/events", get(events::subscribe))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
