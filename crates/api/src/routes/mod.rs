pub mod campaigns;
pub mod citizens;
pub mod health;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /citizens                                list (paged, filterable)
/// /citizens/{id}                           profile
/// /citizens/{id}/rule-explanations         flat rule rows
/// /citizens/{id}/schemes                   aggregated per scheme
///
/// /schemes                                 list (paged, filterable)
/// /eligibility/summary                     per-citizen counts (?view=)
///
/// /campaigns                               list, create
/// /campaigns/{id}                          get, delete
/// /campaigns/{id}/populate                 fill batch (POST)
/// /campaigns/{id}/citizens                 batch members
/// /campaigns/{id}/citizen-schemes          batch member schemes
///
/// /districts/summary                       district read model
/// /dashboard/stats                         headline counts
/// /dashboard/recent                        latest verdicts (?limit=)
/// /segments                                eligible citizens per scheme
/// /intelligence/gaps                       not-eligible citizens per scheme
/// /intelligence/batches                    outbound batch readiness
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/citizens", citizens::router())
        .nest("/campaigns", campaigns::router())
        .route("/schemes", get(handlers::schemes::list_schemes))
        .route(
            "/eligibility/summary",
            get(handlers::eligibility::eligibility_summary),
        )
        .route(
            "/districts/summary",
            get(handlers::overview::district_summaries),
        )
        .route("/dashboard/stats", get(handlers::overview::dashboard_stats))
        .route(
            "/dashboard/recent",
            get(handlers::overview::recent_evaluations),
        )
        .route("/segments", get(handlers::overview::segments))
        .route("/intelligence/gaps", get(handlers::overview::gaps))
        .route("/intelligence/batches", get(handlers::overview::batches))
}
