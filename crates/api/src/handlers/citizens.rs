//! Handlers for the citizen registry and per-citizen eligibility detail.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use welfare_core::eligibility::aggregate_rule_explanations;
use welfare_core::listing::{CITIZENS, ELIGIBILITY};
use welfare_db::gateway::GatewayError;

use crate::error::AppResult;
use crate::query::ListParams;
use crate::response::{DataResponse, PagedResponse};
use crate::state::AppState;

/// GET /api/v1/citizens
///
/// One page of citizens, optionally filtered by a single column.
pub async fn list_citizens(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let query = params.to_query(&CITIZENS)?;
    let page = state.gateway.list_citizens(&query).await?;

    Ok(Json(PagedResponse::new(page, &query)))
}

/// GET /api/v1/citizens/{id}
pub async fn get_citizen(
    State(state): State<AppState>,
    Path(citizen_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let profile = state
        .gateway
        .citizen_profile(&citizen_id)
        .await?
        .ok_or(GatewayError::NotFound {
            entity: "Citizen",
            id: citizen_id,
        })?;

    Ok(Json(DataResponse { data: profile }))
}

/// GET /api/v1/citizens/{id}/rule-explanations
///
/// Flat rule rows, sorted by scheme code then rule key. Accepts the
/// eligibility list's scheme filter.
pub async fn list_rule_explanations(
    State(state): State<AppState>,
    Path(citizen_id): Path<String>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let filter = params.filter(&ELIGIBILITY)?;
    let rows = state
        .gateway
        .citizen_rule_explanations(&citizen_id, filter.as_ref())
        .await?;

    Ok(Json(DataResponse { data: rows }))
}

/// GET /api/v1/citizens/{id}/schemes
///
/// Rule explanations grouped per scheme with a verdict, narrowed by `view`.
/// A citizen with no rows yields an empty list.
pub async fn list_citizen_schemes(
    State(state): State<AppState>,
    Path(citizen_id): Path<String>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let filter = params.filter(&ELIGIBILITY)?;
    let view = params.view()?;
    let rows = state
        .gateway
        .citizen_rule_explanations(&citizen_id, filter.as_ref())
        .await?;

    let schemes: Vec<_> = aggregate_rule_explanations(rows)
        .into_iter()
        .filter(|s| view.includes_scheme(s))
        .collect();

    Ok(Json(DataResponse { data: schemes }))
}
