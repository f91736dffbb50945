//! Handlers for outreach campaigns.
//!
//! Campaign ids are chosen by the client so a retried create is absorbed
//! by the idempotent insert. A create without an id gets one generated
//! here.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use welfare_core::campaign::{generate_campaign_id, CampaignDraft, CampaignType};
use welfare_core::listing::CAMPAIGNS;
use welfare_db::gateway::GatewayError;
use welfare_db::models::campaign::{Campaign, NewCampaign};

use crate::error::{AppError, AppResult};
use crate::query::ListParams;
use crate::response::{DataResponse, PagedResponse};
use crate::state::AppState;

/// Body for `POST /api/v1/campaigns`.
#[derive(Debug, Deserialize)]
pub struct CreateCampaignRequest {
    pub campaign_id: Option<String>,
    #[serde(flatten)]
    pub draft: CampaignDraft,
}

/// Result of `POST /api/v1/campaigns/{id}/populate`.
#[derive(Debug, Serialize)]
pub struct PopulateResult {
    pub campaign_id: String,
    pub added: i64,
}

// ---------------------------------------------------------------------------
// Campaign CRUD
// ---------------------------------------------------------------------------

/// GET /api/v1/campaigns
pub async fn list_campaigns(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let query = params.to_query(&CAMPAIGNS)?;
    let page = state.gateway.list_campaigns(&query).await?;

    Ok(Json(PagedResponse::new(page, &query)))
}

/// POST /api/v1/campaigns
///
/// Insert a draft campaign. Replaying a request with the same
/// `campaign_id` returns the stored campaign.
pub async fn create_campaign(
    State(state): State<AppState>,
    Json(input): Json<CreateCampaignRequest>,
) -> AppResult<impl IntoResponse> {
    input.draft.check()?;

    let campaign_id = match input.campaign_id {
        Some(id) if id.trim().is_empty() => {
            return Err(AppError::BadRequest("campaign_id must not be blank".into()));
        }
        Some(id) => id,
        None => generate_campaign_id(),
    };
    let record = NewCampaign::from_draft(campaign_id, &input.draft);
    let campaign = state.gateway.create_campaign(&record).await?;

    tracing::info!(
        campaign_id = %campaign.campaign_id,
        campaign_type = %campaign.campaign_type,
        "Campaign created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: campaign })))
}

/// GET /api/v1/campaigns/{id}
pub async fn get_campaign(
    State(state): State<AppState>,
    Path(campaign_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let campaign = find_campaign(&state, campaign_id).await?;

    Ok(Json(DataResponse { data: campaign }))
}

/// DELETE /api/v1/campaigns/{id}
pub async fn delete_campaign(
    State(state): State<AppState>,
    Path(campaign_id): Path<String>,
) -> AppResult<StatusCode> {
    if !state.gateway.delete_campaign(&campaign_id).await? {
        return Err(not_found(campaign_id));
    }

    tracing::info!(%campaign_id, "Campaign deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Batch population and preview
// ---------------------------------------------------------------------------

/// POST /api/v1/campaigns/{id}/populate
///
/// Run the population procedure matching the campaign's type.
pub async fn populate_campaign(
    State(state): State<AppState>,
    Path(campaign_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let campaign = find_campaign(&state, campaign_id).await?;
    let added = match CampaignType::from_str_value(&campaign.campaign_type)? {
        CampaignType::Geography => {
            state
                .gateway
                .populate_geography_campaign(&campaign.campaign_id)
                .await?
        }
        CampaignType::Scheme => {
            state
                .gateway
                .populate_scheme_campaign(&campaign.campaign_id)
                .await?
        }
    };

    tracing::info!(campaign_id = %campaign.campaign_id, added, "Campaign populated");

    Ok(Json(DataResponse {
        data: PopulateResult {
            campaign_id: campaign.campaign_id,
            added,
        },
    }))
}

/// GET /api/v1/campaigns/{id}/citizens
///
/// Batch members ordered by name.
pub async fn campaign_citizens(
    State(state): State<AppState>,
    Path(campaign_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let citizens = state.gateway.campaign_citizens(&campaign_id).await?;

    Ok(Json(DataResponse { data: citizens }))
}

/// GET /api/v1/campaigns/{id}/citizen-schemes
///
/// Flat `(citizen_id, scheme_name)` rows for the batch.
pub async fn campaign_citizen_schemes(
    State(state): State<AppState>,
    Path(campaign_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let schemes = state.gateway.campaign_citizen_schemes(&campaign_id).await?;

    Ok(Json(DataResponse { data: schemes }))
}

async fn find_campaign(state: &AppState, campaign_id: String) -> AppResult<Campaign> {
    state
        .gateway
        .find_campaign(&campaign_id)
        .await?
        .ok_or_else(|| not_found(campaign_id))
}

fn not_found(campaign_id: String) -> AppError {
    AppError::Gateway(GatewayError::NotFound {
        entity: "Campaign",
        id: campaign_id,
    })
}
