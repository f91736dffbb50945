//! Handlers for the dashboard, segments, intelligence and geographic views.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use welfare_core::insights::outbound_batches;
use welfare_core::listing::MAX_PAGE_SIZE;

use crate::error::AppResult;
use crate::query::{LimitParams, DEFAULT_RECENT_LIMIT};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// GET /api/v1/dashboard/stats
pub async fn dashboard_stats(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let stats = state.gateway.dashboard_stats().await?;

    Ok(Json(DataResponse { data: stats }))
}

/// GET /api/v1/dashboard/recent
///
/// Most recent verdicts, newest first (default 5).
pub async fn recent_evaluations(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> AppResult<impl IntoResponse> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_RECENT_LIMIT)
        .clamp(1, MAX_PAGE_SIZE);
    let rows = state.gateway.recent_evaluations(limit).await?;

    Ok(Json(DataResponse { data: rows }))
}

// ---------------------------------------------------------------------------
// Segments and intelligence
// ---------------------------------------------------------------------------

/// GET /api/v1/segments
///
/// Eligible citizens per scheme.
pub async fn segments(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let tallies = state.gateway.scheme_tallies(true).await?;

    Ok(Json(DataResponse { data: tallies }))
}

/// GET /api/v1/intelligence/gaps
///
/// Citizens evaluated but not eligible, per scheme.
pub async fn gaps(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let tallies = state.gateway.scheme_tallies(false).await?;

    Ok(Json(DataResponse { data: tallies }))
}

/// GET /api/v1/intelligence/batches
pub async fn batches(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let eligible = state.gateway.scheme_tallies(true).await?;

    Ok(Json(DataResponse {
        data: outbound_batches(&eligible),
    }))
}

// ---------------------------------------------------------------------------
// Geographic monitoring
// ---------------------------------------------------------------------------

/// GET /api/v1/districts/summary
///
/// District summaries sorted by district name.
pub async fn district_summaries(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let districts = state.gateway.district_summaries().await?;

    Ok(Json(DataResponse { data: districts }))
}
