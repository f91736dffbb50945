use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use welfare_core::listing::SCHEMES;

use crate::error::AppResult;
use crate::query::ListParams;
use crate::response::PagedResponse;
use crate::state::AppState;

/// GET /api/v1/schemes
pub async fn list_schemes(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let query = params.to_query(&SCHEMES)?;
    let page = state.gateway.list_schemes(&query).await?;

    Ok(Json(PagedResponse::new(page, &query)))
}
