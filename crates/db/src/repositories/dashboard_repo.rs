//! Headline counters for the dashboard.

use sqlx::PgPool;

use crate::models::dashboard::DashboardStats;

pub struct DashboardRepo;

impl DashboardRepo {
    pub async fn stats(pool: &PgPool) -> Result<DashboardStats, sqlx::Error> {
        sqlx::query_as::<_, DashboardStats>(
            "SELECT \
                (SELECT COUNT(*) FROM citizens) AS citizens, \
                (SELECT COUNT(*) FROM schemes) AS schemes, \
                (SELECT COUNT(*) FROM eligibility_evaluations) AS evaluations",
        )
        .fetch_one(pool)
        .await
    }
}
