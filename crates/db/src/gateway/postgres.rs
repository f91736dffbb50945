//! [`DataGateway`] backed by a Postgres pool.

use async_trait::async_trait;
use sqlx::PgPool;
use welfare_core::eligibility::{EligibilityView, EvaluationRow};
use welfare_core::geo::DistrictEligibilitySummary;
use welfare_core::insights::SchemeTally;
use welfare_core::listing::{ColumnFilter, ListQuery, Page};

use super::{DataGateway, GatewayError, GatewayResult};
use crate::models::campaign::{Campaign, CampaignCitizen, CampaignCitizenScheme, NewCampaign};
use crate::models::citizen::{Citizen, CitizenProfile};
use crate::models::dashboard::DashboardStats;
use crate::models::eligibility::{CitizenEligibilitySummary, EligibilityEvaluation};
use crate::models::scheme::Scheme;
use crate::repositories::{
    CampaignRepo, CitizenRepo, DashboardRepo, DistrictRepo, EligibilityRepo, SchemeRepo,
};

#[derive(Debug, Clone)]
pub struct PgGateway {
    pool: PgPool,
}

impl PgGateway {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl DataGateway for PgGateway {
    async fn ping(&self) -> GatewayResult<()> {
        Ok(crate::health_check(&self.pool).await?)
    }

    async fn list_citizens(&self, query: &ListQuery) -> GatewayResult<Page<Citizen>> {
        Ok(CitizenRepo::list(&self.pool, query).await?)
    }

    async fn list_schemes(&self, query: &ListQuery) -> GatewayResult<Page<Scheme>> {
        Ok(SchemeRepo::list(&self.pool, query).await?)
    }

    async fn list_campaigns(&self, query: &ListQuery) -> GatewayResult<Page<Campaign>> {
        Ok(CampaignRepo::list(&self.pool, query).await?)
    }

    async fn citizen_eligibility_summary(
        &self,
        query: &ListQuery,
        view: EligibilityView,
    ) -> GatewayResult<Page<CitizenEligibilitySummary>> {
        Ok(EligibilityRepo::summary(&self.pool, query, view).await?)
    }

    async fn citizen_rule_explanations(
        &self,
        citizen_id: &str,
        filter: Option<&ColumnFilter>,
    ) -> GatewayResult<Vec<EvaluationRow>> {
        Ok(EligibilityRepo::explanations(&self.pool, citizen_id, filter).await?)
    }

    async fn citizen_profile(&self, citizen_id: &str) -> GatewayResult<Option<CitizenProfile>> {
        Ok(CitizenRepo::find_profile(&self.pool, citizen_id).await?)
    }

    async fn district_summaries(&self) -> GatewayResult<Vec<DistrictEligibilitySummary>> {
        Ok(DistrictRepo::list_all(&self.pool).await?)
    }

    async fn dashboard_stats(&self) -> GatewayResult<DashboardStats> {
        Ok(DashboardRepo::stats(&self.pool).await?)
    }

    async fn recent_evaluations(&self, limit: i64) -> GatewayResult<Vec<EligibilityEvaluation>> {
        Ok(EligibilityRepo::recent(&self.pool, limit).await?)
    }

    async fn scheme_tallies(&self, eligible: bool) -> GatewayResult<Vec<SchemeTally>> {
        Ok(EligibilityRepo::scheme_tallies(&self.pool, eligible).await?)
    }

    async fn find_campaign(&self, campaign_id: &str) -> GatewayResult<Option<Campaign>> {
        Ok(CampaignRepo::find_by_id(&self.pool, campaign_id).await?)
    }

    async fn campaign_citizens(&self, campaign_id: &str) -> GatewayResult<Vec<CampaignCitizen>> {
        Ok(CampaignRepo::citizens(&self.pool, campaign_id).await?)
    }

    async fn campaign_citizen_schemes(
        &self,
        campaign_id: &str,
    ) -> GatewayResult<Vec<CampaignCitizenScheme>> {
        Ok(CampaignRepo::citizen_schemes(&self.pool, campaign_id).await?)
    }

    async fn create_campaign(&self, record: &NewCampaign) -> GatewayResult<Campaign> {
        Ok(CampaignRepo::create(&self.pool, record).await?)
    }

    async fn delete_campaign(&self, campaign_id: &str) -> GatewayResult<bool> {
        Ok(CampaignRepo::delete(&self.pool, campaign_id).await?)
    }

    async fn populate_geography_campaign(&self, campaign_id: &str) -> GatewayResult<i64> {
        self.ensure_campaign(campaign_id).await?;
        Ok(CampaignRepo::populate_geography(&self.pool, campaign_id).await?)
    }

    async fn populate_scheme_campaign(&self, campaign_id: &str) -> GatewayResult<i64> {
        self.ensure_campaign(campaign_id).await?;
        Ok(CampaignRepo::populate_scheme(&self.pool, campaign_id).await?)
    }
}

impl PgGateway {
    async fn ensure_campaign(&self, campaign_id: &str) -> GatewayResult<()> {
        match CampaignRepo::find_by_id(&self.pool, campaign_id).await? {
            Some(_) => Ok(()),
            None => Err(GatewayError::NotFound {
                entity: "Campaign",
                id: campaign_id.to_string(),
            }),
        }
    }
}
