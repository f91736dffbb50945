//! The remote data gateway the console reads and writes through.
//!
//! [`DataGateway`] is object safe and is shared as an `Arc<dyn DataGateway>`
//! built once at startup. [`PgGateway`] talks to Postgres directly;
//! [`MemoryGateway`] serves fixture data with the same filter, order and
//! paging rules and is used throughout the test suites.

mod memory;
mod postgres;

use async_trait::async_trait;
use welfare_core::eligibility::{EligibilityView, EvaluationRow};
use welfare_core::error::CoreError;
use welfare_core::geo::DistrictEligibilitySummary;
use welfare_core::insights::SchemeTally;
use welfare_core::listing::{ColumnFilter, ListQuery, Page};

use crate::models::campaign::{Campaign, CampaignCitizen, CampaignCitizenScheme, NewCampaign};
use crate::models::citizen::{Citizen, CitizenProfile};
use crate::models::dashboard::DashboardStats;
use crate::models::eligibility::{CitizenEligibilitySummary, EligibilityEvaluation};
use crate::models::scheme::Scheme;

pub use memory::{MemoryData, MemoryGateway};
pub use postgres::PgGateway;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// The backend could not be reached.
    #[error("Data service unavailable: {0}")]
    Unavailable(String),

    /// The backend was reached but failed the request.
    #[error("Data service error: {0}")]
    Backend(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

impl From<sqlx::Error> for GatewayError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => {
                tracing::warn!(error = %err, "Database unreachable");
                Self::Unavailable(err.to_string())
            }
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
                Self::Conflict(db_err.message().to_string())
            }
            // Foreign key violation: the request names a row that does not exist.
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23503") => {
                Self::InvalidRequest(db_err.message().to_string())
            }
            _ => {
                tracing::error!(error = %err, "Database error");
                Self::Backend(err.to_string())
            }
        }
    }
}

impl From<CoreError> for GatewayError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound { entity, id } => Self::NotFound { entity, id },
            CoreError::Validation(msg) => Self::InvalidRequest(msg),
            CoreError::Conflict(msg) => Self::Conflict(msg),
            CoreError::Internal(msg) => Self::Backend(msg),
        }
    }
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Every read and write the console performs against the data service.
///
/// List methods return one page plus the exact count of rows matching the
/// filter, ordered by each list's stable key.
#[async_trait]
pub trait DataGateway: Send + Sync {
    /// Cheap reachability probe for health checks.
    async fn ping(&self) -> GatewayResult<()>;

    async fn list_citizens(&self, query: &ListQuery) -> GatewayResult<Page<Citizen>>;

    async fn list_schemes(&self, query: &ListQuery) -> GatewayResult<Page<Scheme>>;

    async fn list_campaigns(&self, query: &ListQuery) -> GatewayResult<Page<Campaign>>;

    /// Per-citizen eligible scheme counts. A scheme filter keeps citizens
    /// with at least one matching explanation row.
    async fn citizen_eligibility_summary(
        &self,
        query: &ListQuery,
        view: EligibilityView,
    ) -> GatewayResult<Page<CitizenEligibilitySummary>>;

    /// Flat rule rows for one citizen, sorted by `scheme_code` then `rule_key`.
    async fn citizen_rule_explanations(
        &self,
        citizen_id: &str,
        filter: Option<&ColumnFilter>,
    ) -> GatewayResult<Vec<EvaluationRow>>;

    async fn citizen_profile(&self, citizen_id: &str) -> GatewayResult<Option<CitizenProfile>>;

    async fn district_summaries(&self) -> GatewayResult<Vec<DistrictEligibilitySummary>>;

    async fn dashboard_stats(&self) -> GatewayResult<DashboardStats>;

    async fn recent_evaluations(&self, limit: i64) -> GatewayResult<Vec<EligibilityEvaluation>>;

    /// Distinct citizens per scheme with the given verdict.
    async fn scheme_tallies(&self, eligible: bool) -> GatewayResult<Vec<SchemeTally>>;

    async fn find_campaign(&self, campaign_id: &str) -> GatewayResult<Option<Campaign>>;

    async fn campaign_citizens(&self, campaign_id: &str) -> GatewayResult<Vec<CampaignCitizen>>;

    async fn campaign_citizen_schemes(
        &self,
        campaign_id: &str,
    ) -> GatewayResult<Vec<CampaignCitizenScheme>>;

    /// Insert a campaign. Idempotent on `campaign_id`: replaying an insert
    /// returns the stored row unchanged. A `target_scheme_id` naming no
    /// scheme is an [`GatewayError::InvalidRequest`].
    async fn create_campaign(&self, record: &NewCampaign) -> GatewayResult<Campaign>;

    /// Returns `false` when no campaign had that id.
    async fn delete_campaign(&self, campaign_id: &str) -> GatewayResult<bool>;

    /// Fill a geography campaign's batch. Returns the number of members added.
    async fn populate_geography_campaign(&self, campaign_id: &str) -> GatewayResult<i64>;

    /// Fill a scheme campaign's batch. Returns the number of members added.
    async fn populate_scheme_campaign(&self, campaign_id: &str) -> GatewayResult<i64>;
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn pool_timeout_is_unavailable() {
        assert_matches!(
            GatewayError::from(sqlx::Error::PoolTimedOut),
            GatewayError::Unavailable(_)
        );
    }

    #[test]
    fn other_sqlx_errors_are_backend_failures() {
        assert_matches!(
            GatewayError::from(sqlx::Error::RowNotFound),
            GatewayError::Backend(_)
        );
    }

    #[test]
    fn core_errors_map_onto_gateway_errors() {
        assert_matches!(
            GatewayError::from(CoreError::Validation("bad".into())),
            GatewayError::InvalidRequest(msg) if msg == "bad"
        );
        assert_matches!(
            GatewayError::from(CoreError::NotFound { entity: "Campaign", id: "x".into() }),
            GatewayError::NotFound { entity: "Campaign", .. }
        );
    }
}
