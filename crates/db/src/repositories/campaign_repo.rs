//! Repository for `campaigns` and their citizen batches.

use sqlx::PgPool;
use welfare_core::listing::{ListQuery, Page};

use crate::models::campaign::{Campaign, CampaignCitizen, CampaignCitizenScheme, NewCampaign};
use crate::repositories::filter_sql::{fetch_page, FilterSql};

const COLUMNS: &str = "campaign_id, campaign_name, campaign_type, status, target_state, \
     target_district, target_scheme_id, created_at";

const CITIZEN_COLUMNS: &str =
    "campaign_id, citizen_id, citizen_name, mobile_number, state, district";

pub struct CampaignRepo;

impl CampaignRepo {
    /// One page of campaigns ordered by `campaign_id`.
    pub async fn list(pool: &PgPool, query: &ListQuery) -> Result<Page<Campaign>, sqlx::Error> {
        let mut filter = FilterSql::new();
        filter.column("", query.filter.as_ref());
        fetch_page(pool, COLUMNS, "campaigns", "campaign_id", &filter, query).await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        campaign_id: &str,
    ) -> Result<Option<Campaign>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM campaigns WHERE campaign_id = $1");
        sqlx::query_as::<_, Campaign>(&query)
            .bind(campaign_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a campaign under its client-generated id.
    ///
    /// Uses `ON CONFLICT (campaign_id) DO NOTHING`, so replaying the same
    /// insert returns the row that is already stored.
    pub async fn create(pool: &PgPool, input: &NewCampaign) -> Result<Campaign, sqlx::Error> {
        sqlx::query(
            "INSERT INTO campaigns \
                (campaign_id, campaign_name, campaign_type, status, \
                 target_state, target_district, target_scheme_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (campaign_id) DO NOTHING",
        )
        .bind(&input.campaign_id)
        .bind(&input.campaign_name)
        .bind(&input.campaign_type)
        .bind(input.initial_status())
        .bind(input.target_state.as_deref())
        .bind(input.target_district.as_deref())
        .bind(input.target_scheme_id)
        .execute(pool)
        .await?;

        Self::find_by_id(pool, &input.campaign_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Delete a campaign and its batch. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, campaign_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM campaigns WHERE campaign_id = $1")
            .bind(campaign_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Batch members ordered by name.
    pub async fn citizens(
        pool: &PgPool,
        campaign_id: &str,
    ) -> Result<Vec<CampaignCitizen>, sqlx::Error> {
        let query = format!(
            "SELECT {CITIZEN_COLUMNS} FROM campaign_citizens \
             WHERE campaign_id = $1 ORDER BY citizen_name, citizen_id"
        );
        sqlx::query_as::<_, CampaignCitizen>(&query)
            .bind(campaign_id)
            .fetch_all(pool)
            .await
    }

    pub async fn citizen_schemes(
        pool: &PgPool,
        campaign_id: &str,
    ) -> Result<Vec<CampaignCitizenScheme>, sqlx::Error> {
        sqlx::query_as::<_, CampaignCitizenScheme>(
            "SELECT citizen_id, scheme_name FROM campaign_citizen_schemes \
             WHERE campaign_id = $1 ORDER BY citizen_id, scheme_name",
        )
        .bind(campaign_id)
        .fetch_all(pool)
        .await
    }

    /// Run the stored procedure that fills a geography campaign's batch.
    /// Returns the number of citizens added.
    pub async fn populate_geography(pool: &PgPool, campaign_id: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT populate_geography_campaign($1)")
            .bind(campaign_id)
            .fetch_one(pool)
            .await
    }

    /// Run the stored procedure that fills a scheme campaign's batch.
    pub async fn populate_scheme(pool: &PgPool, campaign_id: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT populate_scheme_campaign($1)")
            .bind(campaign_id)
            .fetch_one(pool)
            .await
    }
}
