//! Outreach campaign rows and the insert DTO.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use welfare_core::campaign::{CampaignDraft, STATUS_DRAFT};
use welfare_core::types::{DbId, Timestamp};

/// A row from the `campaigns` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Campaign {
    pub campaign_id: String,
    pub campaign_name: String,
    pub campaign_type: String,
    pub status: String,
    pub target_state: Option<String>,
    pub target_district: Option<String>,
    pub target_scheme_id: Option<DbId>,
    pub created_at: Timestamp,
}

/// DTO for inserting a campaign under a client-generated id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCampaign {
    pub campaign_id: String,
    pub campaign_name: String,
    pub campaign_type: String,
    pub target_state: Option<String>,
    pub target_district: Option<String>,
    pub target_scheme_id: Option<DbId>,
}

impl NewCampaign {
    pub fn from_draft(campaign_id: String, draft: &CampaignDraft) -> Self {
        Self {
            campaign_id,
            campaign_name: draft.campaign_name.trim().to_string(),
            campaign_type: draft.campaign_type.as_str().to_string(),
            target_state: draft.target_state.clone(),
            target_district: draft.target_district.clone(),
            target_scheme_id: draft.target_scheme_id,
        }
    }

    /// The status a freshly inserted campaign starts in.
    pub fn initial_status(&self) -> &'static str {
        STATUS_DRAFT
    }
}

/// A citizen selected into a campaign batch.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct CampaignCitizen {
    pub campaign_id: String,
    pub citizen_id: String,
    pub citizen_name: String,
    pub mobile_number: Option<String>,
    pub state: Option<String>,
    pub district: Option<String>,
}

/// A scheme a campaign member is being contacted about.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct CampaignCitizenScheme {
    pub citizen_id: String,
    pub scheme_name: String,
}
