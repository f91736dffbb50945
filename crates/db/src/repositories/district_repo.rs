//! Repository for the `district_eligibility_summary` view.

use sqlx::PgPool;
use welfare_core::geo::DistrictEligibilitySummary;

const COLUMNS: &str = "district, total_citizens, total_eligible_citizens, total_unique_schemes, \
     citizen_scheme_ratio, women_eligible_count, farmer_eligible_count, disabled_eligible_count";

pub struct DistrictRepo;

impl DistrictRepo {
    pub async fn list_all(pool: &PgPool) -> Result<Vec<DistrictEligibilitySummary>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM district_eligibility_summary ORDER BY district");
        sqlx::query_as::<_, DistrictEligibilitySummary>(&query)
            .fetch_all(pool)
            .await
    }
}
