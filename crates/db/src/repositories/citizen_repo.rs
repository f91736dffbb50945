//! Repository for the `citizens` table.

use sqlx::PgPool;
use welfare_core::listing::{ListQuery, Page};

use crate::models::citizen::{Citizen, CitizenProfile};
use crate::repositories::filter_sql::{fetch_page, FilterSql};

/// Column list for the citizens list.
const LIST_COLUMNS: &str =
    "citizen_id, name, age, gender, state, district, income_bracket, caste_category";

/// Column list for a full citizen profile.
const PROFILE_COLUMNS: &str = "citizen_id, aadhaar_id, name, dob, age, gender, state, district, \
     ward_id, education_level, occupation, disability, family_count, mobile_number, \
     income_bracket, caste_category, created_at";

pub struct CitizenRepo;

impl CitizenRepo {
    /// One page of citizens ordered by `citizen_id`.
    pub async fn list(pool: &PgPool, query: &ListQuery) -> Result<Page<Citizen>, sqlx::Error> {
        let mut filter = FilterSql::new();
        filter.column("", query.filter.as_ref());
        fetch_page(pool, LIST_COLUMNS, "citizens", "citizen_id", &filter, query).await
    }

    pub async fn find_profile(
        pool: &PgPool,
        citizen_id: &str,
    ) -> Result<Option<CitizenProfile>, sqlx::Error> {
        let query = format!("SELECT {PROFILE_COLUMNS} FROM citizens WHERE citizen_id = $1");
        sqlx::query_as::<_, CitizenProfile>(&query)
            .bind(citizen_id)
            .fetch_optional(pool)
            .await
    }
}
