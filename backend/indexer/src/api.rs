//! Axum REST API handlers.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use reqwest::Client;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::config::Config;
use crate::db;
use crate::errors::IndexerError;
use crate::events::{CourseProgress, EventRecord};
use crate::finality;

#[derive(Clone)]
pub struct ApiState {
    pub pool: SqlitePool,
    pub client: Client,
    pub config: Config,
}

// ─────────────────────────────────────────────────────────
// Response shapes
// ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct EventsResponse {
    pub course_id: String,
    pub count: usize,
    pub events: Vec<EventRecord>,
}

#[derive(Serialize)]
pub struct AllEventsResponse {
    pub count: usize,
    pub events: Vec<EventRecord>,
}

#[derive(Serialize)]
pub struct FinalityResponse {
    pub tx_hash: String,
    pub status: &'static str,
    pub ledger: u64,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for IndexerError {
    fn into_response(self) -> Response {
        let status = match &self {
            IndexerError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            IndexerError::Rejected(_) => StatusCode::CONFLICT,
            IndexerError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            IndexerError::Http(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /courses/:id/events`
///
/// Returns all indexed events for the given course identifier.
pub async fn get_course_events(
    State(state): State<Arc<ApiState>>,
    Path(course_id): Path<String>,
) -> Result<Json<EventsResponse>, IndexerError> {
    let events = db::get_events_for_course(&state.pool, &course_id).await?;
    Ok(Json(EventsResponse {
        course_id,
        count: events.len(),
        events,
    }))
}

/// `GET /events`
///
/// Returns all indexed events across all courses.
pub async fn get_all_events(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<AllEventsResponse>, IndexerError> {
    let events = db::get_all_events(&state.pool).await?;
    Ok(Json(AllEventsResponse {
        count: events.len(),
        events,
    }))
}

/// `GET /users/:address/courses/:id`
///
/// A learner's coin balance and claim status as seen by the indexer.
pub async fn get_course_progress(
    State(state): State<Arc<ApiState>>,
    Path((user, course_id)): Path<(String, String)>,
) -> Result<Json<CourseProgress>, IndexerError> {
    let progress = db::get_course_progress(&state.pool, &user, &course_id).await?;
    Ok(Json(progress))
}

/// `GET /transactions/:hash`
///
/// Holds the request open until the transaction is finalized, rejected, or
/// the finality window elapses.
pub async fn await_transaction(
    State(state): State<Arc<ApiState>>,
    Path(tx_hash): Path<String>,
) -> Result<Json<FinalityResponse>, IndexerError> {
    let ledger = finality::await_finalization(
        &state.client,
        &state.config.rpc_url,
        &tx_hash,
        Duration::from_secs(state.config.finality_poll_secs),
        Duration::from_secs(state.config.finality_timeout_secs),
    )
    .await?;

    Ok(Json(FinalityResponse {
        tx_hash,
        status: "finalized",
        ledger,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_status_mapping() {
        let status = |e: IndexerError| e.into_response().status();
        assert_eq!(
            status(IndexerError::InvalidInput("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status(IndexerError::Rejected("x".into())), StatusCode::CONFLICT);
        assert_eq!(
            status(IndexerError::Timeout("x".into())),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            status(IndexerError::Config("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
