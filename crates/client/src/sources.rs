//! [`ListSource`] implementations for the console's lists.

use std::sync::Arc;

use async_trait::async_trait;
use welfare_core::eligibility::EligibilityView;
use welfare_core::listing::{ListQuery, ListSpec, Page, CAMPAIGNS, CITIZENS, ELIGIBILITY, SCHEMES};
use welfare_db::gateway::{DataGateway, GatewayResult};
use welfare_db::models::campaign::Campaign;
use welfare_db::models::citizen::Citizen;
use welfare_db::models::eligibility::CitizenEligibilitySummary;
use welfare_db::models::scheme::Scheme;

use crate::list::ListSource;

pub struct CitizensList {
    gateway: Arc<dyn DataGateway>,
}

impl CitizensList {
    pub fn new(gateway: Arc<dyn DataGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl ListSource for CitizensList {
    type Row = Citizen;
    type Scope = ();

    fn spec(&self) -> &'static ListSpec {
        &CITIZENS
    }

    async fn fetch(&self, query: &ListQuery, _: &()) -> GatewayResult<Page<Citizen>> {
        self.gateway.list_citizens(query).await
    }
}

pub struct SchemesList {
    gateway: Arc<dyn DataGateway>,
}

impl SchemesList {
    pub fn new(gateway: Arc<dyn DataGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl ListSource for SchemesList {
    type Row = Scheme;
    type Scope = ();

    fn spec(&self) -> &'static ListSpec {
        &SCHEMES
    }

    async fn fetch(&self, query: &ListQuery, _: &()) -> GatewayResult<Page<Scheme>> {
        self.gateway.list_schemes(query).await
    }
}

pub struct CampaignsList {
    gateway: Arc<dyn DataGateway>,
}

impl CampaignsList {
    pub fn new(gateway: Arc<dyn DataGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl ListSource for CampaignsList {
    type Row = Campaign;
    type Scope = ();

    fn spec(&self) -> &'static ListSpec {
        &CAMPAIGNS
    }

    async fn fetch(&self, query: &ListQuery, _: &()) -> GatewayResult<Page<Campaign>> {
        self.gateway.list_campaigns(query).await
    }
}

/// Citizen eligibility summary, scoped by the eligible / not eligible view.
pub struct EligibilitySummaryList {
    gateway: Arc<dyn DataGateway>,
}

impl EligibilitySummaryList {
    pub fn new(gateway: Arc<dyn DataGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl ListSource for EligibilitySummaryList {
    type Row = CitizenEligibilitySummary;
    type Scope = EligibilityView;

    fn spec(&self) -> &'static ListSpec {
        &ELIGIBILITY
    }

    async fn fetch(
        &self,
        query: &ListQuery,
        view: &EligibilityView,
    ) -> GatewayResult<Page<CitizenEligibilitySummary>> {
        self.gateway.citizen_eligibility_summary(query, *view).await
    }
}
