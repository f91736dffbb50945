use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use welfare_core::listing::ELIGIBILITY;

use crate::error::AppResult;
use crate::query::ListParams;
use crate::response::PagedResponse;
use crate::state::AppState;

/// GET /api/v1/eligibility/summary
///
/// Per-citizen eligible scheme counts. `view=eligible` keeps citizens with
/// at least one eligible scheme, `view=not_eligible` those with none. A
/// scheme filter keeps citizens with a matching rule explanation.
pub async fn eligibility_summary(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let query = params.to_query(&ELIGIBILITY)?;
    let view = params.view()?;
    let page = state
        .gateway
        .citizen_eligibility_summary(&query, view)
        .await?;

    Ok(Json(PagedResponse::new(page, &query)))
}
