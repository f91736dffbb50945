//! Campaign list, creation and preview.
//!
//! Creating a campaign is two writes: the insert, then the population
//! procedure for its type. The id is generated here before either is sent,
//! so when population fails the caller gets [`ClientError::Incomplete`]
//! carrying the id and can call [`CampaignService::retry_create`] without
//! creating a duplicate.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;
use welfare_core::campaign::{generate_campaign_id, group_schemes_by_citizen, CampaignDraft, CampaignType};
use welfare_db::gateway::DataGateway;
use welfare_db::models::campaign::{Campaign, CampaignCitizen, NewCampaign};

use crate::error::{ClientError, ClientResult};
use crate::list::ListController;
use crate::sources::CampaignsList;

/// Result of a successful create.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedCampaign {
    pub campaign: Campaign,
    /// Members added by the population procedure.
    pub added: i64,
}

/// Everything the campaign preview page renders.
#[derive(Debug, Clone, Serialize)]
pub struct CampaignPreview {
    pub campaign: Campaign,
    /// Members ordered by name.
    pub citizens: Vec<CampaignCitizen>,
    /// Scheme names per member, in first-seen order.
    pub schemes_by_citizen: IndexMap<String, Vec<String>>,
}

impl CampaignPreview {
    pub fn schemes_for(&self, citizen_id: &str) -> &[String] {
        self.schemes_by_citizen
            .get(citizen_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

pub struct CampaignService {
    gateway: Arc<dyn DataGateway>,
    list: ListController<CampaignsList>,
}

impl CampaignService {
    pub fn new(gateway: Arc<dyn DataGateway>) -> Self {
        Self {
            list: ListController::new(CampaignsList::new(gateway.clone())),
            gateway,
        }
    }

    pub fn list(&self) -> &ListController<CampaignsList> {
        &self.list
    }

    /// Validate the draft, assign a fresh id, insert and populate.
    pub async fn create(&self, draft: &CampaignDraft) -> ClientResult<CreatedCampaign> {
        draft.check()?;
        let campaign_id = generate_campaign_id();
        self.submit(campaign_id, draft).await
    }

    /// Re-send a create under an id returned by [`ClientError::Incomplete`].
    pub async fn retry_create(
        &self,
        campaign_id: &str,
        draft: &CampaignDraft,
    ) -> ClientResult<CreatedCampaign> {
        draft.check()?;
        self.submit(campaign_id.to_string(), draft).await
    }

    async fn submit(&self, campaign_id: String, draft: &CampaignDraft) -> ClientResult<CreatedCampaign> {
        let record = NewCampaign::from_draft(campaign_id, draft);
        let inserted = self.gateway.create_campaign(&record).await?;

        let populated = match draft.campaign_type {
            CampaignType::Geography => {
                self.gateway
                    .populate_geography_campaign(&record.campaign_id)
                    .await
            }
            CampaignType::Scheme => self.gateway.populate_scheme_campaign(&record.campaign_id).await,
        };
        let added = populated.map_err(|source| {
            tracing::warn!(
                campaign_id = %record.campaign_id,
                error = %source,
                "Campaign created but population failed"
            );
            ClientError::Incomplete {
                campaign_id: record.campaign_id.clone(),
                source,
            }
        })?;

        tracing::info!(campaign_id = %record.campaign_id, added, "Campaign created");

        // Population changes the status; prefer the stored row when it loads.
        let campaign = match self.gateway.find_campaign(&record.campaign_id).await {
            Ok(Some(campaign)) => campaign,
            _ => inserted,
        };

        self.refresh_list().await;
        Ok(CreatedCampaign { campaign, added })
    }

    pub async fn delete(&self, campaign_id: &str) -> ClientResult<()> {
        if !self.gateway.delete_campaign(campaign_id).await? {
            return Err(ClientError::NotFound("Campaign not found".to_string()));
        }
        tracing::info!(campaign_id, "Campaign deleted");
        self.refresh_list().await;
        Ok(())
    }

    /// Load a campaign with its members and their schemes.
    pub async fn load_preview(&self, campaign_id: &str) -> ClientResult<CampaignPreview> {
        let campaign = self
            .gateway
            .find_campaign(campaign_id)
            .await
            .map_err(|source| ClientError::Load {
                message: "Failed to load campaign",
                source,
            })?
            .ok_or_else(|| ClientError::NotFound("Campaign not found".to_string()))?;

        let (citizens, schemes) = tokio::join!(
            self.gateway.campaign_citizens(campaign_id),
            self.gateway.campaign_citizen_schemes(campaign_id),
        );
        let citizens = citizens.map_err(|source| ClientError::Load {
            message: "Failed to load citizens",
            source,
        })?;
        let schemes = schemes.map_err(|source| ClientError::Load {
            message: "Failed to load citizen schemes",
            source,
        })?;

        let schemes_by_citizen =
            group_schemes_by_citizen(schemes.into_iter().map(|s| (s.citizen_id, s.scheme_name)));

        Ok(CampaignPreview {
            campaign,
            citizens,
            schemes_by_citizen,
        })
    }

    async fn refresh_list(&self) {
        if let Err(err) = self.list.refresh().await {
            tracing::warn!(error = %err, "Failed to refresh campaign list");
        }
    }
}
