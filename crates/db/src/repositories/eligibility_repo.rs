//! Repository for eligibility verdicts and rule explanations.

use sqlx::PgPool;
use welfare_core::eligibility::{EligibilityView, EvaluationRow};
use welfare_core::insights::SchemeTally;
use welfare_core::listing::{ColumnFilter, ListQuery, Page};

use crate::models::eligibility::{CitizenEligibilitySummary, EligibilityEvaluation};
use crate::repositories::filter_sql::{fetch_page, FilterSql, EXPLAIN_VIEW};

const SUMMARY_COLUMNS: &str = "s.citizen_id, s.citizen_name, s.eligible_scheme_count";

const EXPLAIN_COLUMNS: &str = "scheme_id, scheme_code, scheme_name, rule_key, rule_label, \
     citizen_value, scheme_value, is_rule_satisfied";

const EVALUATION_COLUMNS: &str = "citizen_id, scheme_id, is_eligible, evaluated_at";

pub struct EligibilityRepo;

impl EligibilityRepo {
    /// Build the summary predicate: the view restricts by eligible scheme
    /// count and a scheme filter keeps citizens with a matching explanation.
    pub fn summary_filter(query: &ListQuery, view: EligibilityView) -> FilterSql {
        let mut filter = FilterSql::new();
        match view {
            EligibilityView::All => {}
            EligibilityView::Eligible => {
                filter.raw("s.eligible_scheme_count > 0");
            }
            EligibilityView::NotEligible => {
                filter.raw("s.eligible_scheme_count = 0");
            }
        }
        filter.explained_scheme("s.", query.filter.as_ref());
        filter
    }

    /// One page of the per-citizen eligibility summary ordered by `citizen_id`.
    pub async fn summary(
        pool: &PgPool,
        query: &ListQuery,
        view: EligibilityView,
    ) -> Result<Page<CitizenEligibilitySummary>, sqlx::Error> {
        let filter = Self::summary_filter(query, view);
        fetch_page(
            pool,
            SUMMARY_COLUMNS,
            "citizen_eligibility_summary s",
            "s.citizen_id",
            &filter,
            query,
        )
        .await
    }

    /// Flat rule explanations for one citizen, sorted by scheme code then rule key.
    pub async fn explanations(
        pool: &PgPool,
        citizen_id: &str,
        scheme_filter: Option<&ColumnFilter>,
    ) -> Result<Vec<EvaluationRow>, sqlx::Error> {
        let mut filter = FilterSql::new();
        filter.text_eq("citizen_id", citizen_id).column("", scheme_filter);
        let query = format!(
            "SELECT {EXPLAIN_COLUMNS} FROM {EXPLAIN_VIEW}{} ORDER BY scheme_code, rule_key",
            filter.where_clause()
        );
        filter
            .bind_as(sqlx::query_as::<_, EvaluationRow>(&query))
            .fetch_all(pool)
            .await
    }

    /// Most recent stored verdicts, newest first.
    pub async fn recent(
        pool: &PgPool,
        limit: i64,
    ) -> Result<Vec<EligibilityEvaluation>, sqlx::Error> {
        let query = format!(
            "SELECT {EVALUATION_COLUMNS} FROM eligibility_evaluations \
             ORDER BY evaluated_at DESC, citizen_id, scheme_id LIMIT $1"
        );
        sqlx::query_as::<_, EligibilityEvaluation>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Distinct citizens per scheme with the given verdict, ordered by scheme.
    pub async fn scheme_tallies(
        pool: &PgPool,
        eligible: bool,
    ) -> Result<Vec<SchemeTally>, sqlx::Error> {
        sqlx::query_as::<_, SchemeTally>(
            "SELECT scheme_id, COUNT(DISTINCT citizen_id) AS citizens \
             FROM eligibility_evaluations \
             WHERE is_eligible = $1 \
             GROUP BY scheme_id \
             ORDER BY scheme_id",
        )
        .bind(eligible)
        .fetch_all(pool)
        .await
    }
}
