//! Read-only overview pages: dashboard, segments, intelligence and the
//! district map.

use std::sync::Arc;

use serde::Serialize;
use welfare_core::geo::DistrictMap;
use welfare_core::insights::{outbound_batches, OutboundBatch, SchemeTally};
use welfare_db::gateway::DataGateway;
use welfare_db::models::dashboard::DashboardStats;
use welfare_db::models::eligibility::EligibilityEvaluation;

use crate::error::{ClientError, ClientResult};

/// Number of evaluations shown on the dashboard.
pub const RECENT_EVALUATIONS: i64 = 5;

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub stats: DashboardStats,
    pub recent: Vec<EligibilityEvaluation>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Intelligence {
    /// Not-eligible citizens per scheme.
    pub gaps: Vec<SchemeTally>,
    pub batches: Vec<OutboundBatch>,
}

pub struct Overview {
    gateway: Arc<dyn DataGateway>,
}

impl Overview {
    pub fn new(gateway: Arc<dyn DataGateway>) -> Self {
        Self { gateway }
    }

    pub async fn load_dashboard(&self) -> ClientResult<Dashboard> {
        let (stats, recent) = tokio::join!(
            self.gateway.dashboard_stats(),
            self.gateway.recent_evaluations(RECENT_EVALUATIONS),
        );
        Ok(Dashboard {
            stats: stats?,
            recent: recent?,
        })
    }

    /// Eligible citizens per scheme.
    pub async fn load_segments(&self) -> ClientResult<Vec<SchemeTally>> {
        Ok(self.gateway.scheme_tallies(true).await?)
    }

    pub async fn load_intelligence(&self) -> ClientResult<Intelligence> {
        let (gaps, eligible) = tokio::join!(
            self.gateway.scheme_tallies(false),
            self.gateway.scheme_tallies(true),
        );
        Ok(Intelligence {
            gaps: gaps?,
            batches: outbound_batches(&eligible?),
        })
    }

    pub async fn load_district_map(&self) -> ClientResult<DistrictMap> {
        let districts = self
            .gateway
            .district_summaries()
            .await
            .map_err(|source| ClientError::Load {
                message: "Failed to load district data",
                source,
            })?;
        Ok(DistrictMap::new(districts))
    }
}
