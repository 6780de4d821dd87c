//! Route handlers.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, RawQuery, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use watchlist_core::{Entity, IndexedEntity};
use watchlist_prepare::{DebugObserver, RecordingObserver};
use watchlist_query::CancelToken;
use watchlist_search_protocol::{
    parse_search_query, ErrorResponse, SearchResponse,
};
use watchlist_search_service::ServiceError;

use crate::state::AppState;

/// Per-request deadline; expiry cancels the query's workers.
const SEARCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Assemble the service router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/v2/search", get(handle_search))
        .route("/ping", get(handle_ping))
        .route("/version", get(handle_version))
        .route("/v1/ofac/refresh", post(handle_refresh))
        .route("/v1/ofac/debug/sdn/{id}", get(handle_debug_sdn))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Handle GET /v2/search
async fn handle_search(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> impl IntoResponse {
    let pairs: Vec<(String, String)> =
        match serde_urlencoded::from_str(query.as_deref().unwrap_or("")) {
            Ok(pairs) => pairs,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse::new(format!("reading query string: {e}"))),
                )
                    .into_response()
            }
        };

    let (entity, opts) = match parse_search_query(&pairs) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!(error = %e, "malformed v2 search request");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(e.to_string())),
            )
                .into_response();
        }
    };

    let query_entity = prepare_query(&state, entity);

    // A wall-clock timeout is just a cancellation on a timer.
    let cancel = CancelToken::new();
    let deadline = cancel.clone();
    let timer = tokio::spawn(async move {
        tokio::time::sleep(SEARCH_TIMEOUT).await;
        deadline.cancel();
    });

    let result = state.searcher.search(query_entity, opts, cancel).await;
    timer.abort();

    match result {
        Ok(entities) => Json(SearchResponse { entities }).into_response(),
        Err(e) => {
            let status = match &e {
                ServiceError::Cancelled => StatusCode::REQUEST_TIMEOUT,
                _ => {
                    tracing::error!(error = %e, "v2 search failed");
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
            (status, Json(ErrorResponse::new(e.to_string()))).into_response()
        }
    }
}

/// Run the query entity through the same pipeline as indexed records.
///
/// Unlike ingest, an empty canonical name is allowed here: a query may
/// match on identifiers or addresses alone.
fn prepare_query(state: &AppState, entity: Entity) -> IndexedEntity {
    let canonical_name = if state.debug_name_pipeline {
        state.preparer.prepare_name_with(&entity.name, &DebugObserver)
    } else {
        state.preparer.prepare_name(&entity.name)
    };
    let canonical_alt_names = entity
        .alt_names
        .iter()
        .map(|alt| state.preparer.prepare_name(alt))
        .filter(|alt| !alt.is_empty())
        .collect();

    IndexedEntity {
        entity,
        canonical_name,
        canonical_alt_names,
    }
}

/// Handle GET /ping
async fn handle_ping() -> impl IntoResponse {
    (StatusCode::OK, "PONG")
}

/// Handle GET /version
async fn handle_version() -> impl IntoResponse {
    env!("CARGO_PKG_VERSION")
}

/// Handle POST /v1/ofac/refresh
///
/// Runs a refresh (or joins the in-progress one) and reports its stats.
/// The refresher also publishes the outcome to the updates channel.
async fn handle_refresh(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.refresher.refresh().await {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "manual refresh failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(e.to_string())),
            )
                .into_response()
        }
    }
}

/// Debug payload: the stored record plus its prepared forms and the
/// stage-by-stage pipeline output for the primary name.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DebugSdnResponse {
    entity: Entity,
    canonical_name: String,
    canonical_alt_names: Vec<String>,
    pipeline: Vec<DebugStage>,
}

#[derive(Debug, Serialize)]
struct DebugStage {
    stage: &'static str,
    output: String,
}

/// Handle GET /v1/ofac/debug/sdn/{id}
async fn handle_debug_sdn(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let snapshot = state.handle.load();
    let Some(indexed) = snapshot.find_by_source_id(&id) else {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(format!("no record with sourceID {id}"))),
        )
            .into_response();
    };

    let observer = RecordingObserver::new();
    state
        .preparer
        .prepare_name_with(&indexed.entity.name, &observer);
    let pipeline = observer
        .stages()
        .into_iter()
        .map(|(stage, output)| DebugStage {
            stage: stage.as_str(),
            output,
        })
        .collect();

    Json(DebugSdnResponse {
        entity: indexed.entity.clone(),
        canonical_name: indexed.canonical_name.clone(),
        canonical_alt_names: indexed.canonical_alt_names.clone(),
        pipeline,
    })
    .into_response()
}
