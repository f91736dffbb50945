use axum::routing::get;
use axum::Router;

use crate::handlers::citizens;
use crate::state::AppState;

/// Citizen routes mounted at `/citizens`.
///
/// ```text
/// GET /                          -> list_citizens
/// GET /{id}                      -> get_citizen
/// GET /{id}/rule-explanations    -> list_rule_explanations
/// GET /{id}/schemes              -> list_citizen_schemes
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(citizens::list_citizens))
        .route("/{id}", get(citizens::get_citizen))
        .route(
            "/{id}/rule-explanations",
            get(citizens::list_rule_explanations),
        )
        .route("/{id}/schemes", get(citizens::list_citizen_schemes))
}
