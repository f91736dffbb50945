//! Overview counters.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Headline counts for the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct DashboardStats {
    pub citizens: i64,
    pub schemes: i64,
    pub evaluations: i64,
}
