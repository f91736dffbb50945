//! Eligibility read models produced by the rule engine.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use welfare_core::types::{DbId, Timestamp};

pub use welfare_core::eligibility::EvaluationRow;

/// A row from the `citizen_eligibility_summary` view.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct CitizenEligibilitySummary {
    pub citizen_id: String,
    pub citizen_name: String,
    pub eligible_scheme_count: i64,
}

/// One stored (citizen, scheme) verdict, used for recent activity.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct EligibilityEvaluation {
    pub citizen_id: String,
    pub scheme_id: DbId,
    pub is_eligible: bool,
    pub evaluated_at: Timestamp,
}
