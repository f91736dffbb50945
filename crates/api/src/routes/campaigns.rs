use axum::routing::{get, post};
use axum::Router;

use crate::handlers::campaigns;
use crate::state::AppState;

/// Campaign routes mounted at `/campaigns`.
///
/// ```text
/// GET    /                        -> list_campaigns
/// POST   /                        -> create_campaign
/// GET    /{id}                    -> get_campaign
/// DELETE /{id}                    -> delete_campaign
/// POST   /{id}/populate           -> populate_campaign
/// GET    /{id}/citizens           -> campaign_citizens
/// GET    /{id}/citizen-schemes    -> campaign_citizen_schemes
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(campaigns::list_campaigns).post(campaigns::create_campaign),
        )
        .route(
            "/{id}",
            get(campaigns::get_campaign).delete(campaigns::delete_campaign),
        )
        .route("/{id}/populate", post(campaigns::populate_campaign))
        .route("/{id}/citizens", get(campaigns::campaign_citizens))
        .route(
            "/{id}/citizen-schemes",
            get(campaigns::campaign_citizen_schemes),
        )
}
