//! Shared seed data for the database integration tests.
//!
//! Four citizens across two districts and two schemes:
//!
//! | Citizen | District | Age | PMK | UJJ |
//! |---|---|---|---|---|
//! | C1 Asha | Patna | 42 | eligible | eligible |
//! | C2 Ravi | Patna | 42 | eligible | |
//! | C3 Meena 50% quota | Kamrup | 30 | not eligible | |
//! | C4 Gopal 500 | Kamrup | 50 | | |

use sqlx::PgPool;

const SEED: &str = r#"
INSERT INTO citizens (citizen_id, name, age, gender, state, district, occupation, disability)
VALUES
    ('C1', 'Asha', 42, 'Female', 'Bihar', 'Patna', 'Farmer', false),
    ('C2', 'Ravi', 42, 'Male', 'Bihar', 'Patna', 'Farmer', false),
    ('C3', 'Meena 50% quota', 30, 'Female', 'Assam', 'Kamrup', 'Weaver', true),
    ('C4', 'Gopal 500', 50, 'Male', 'Assam', 'Kamrup', NULL, NULL);

INSERT INTO schemes (scheme_id, scheme_code, scheme_name, department)
VALUES
    (1, 'PMK', 'PM-KISAN', 'Agriculture'),
    (2, 'UJJ', 'Ujjwala', 'Petroleum');

INSERT INTO eligibility_evaluations (citizen_id, scheme_id, is_eligible)
VALUES
    ('C1', 1, true),
    ('C1', 2, true),
    ('C2', 1, true),
    ('C3', 1, false);

-- Rows are inserted out of order on purpose.
INSERT INTO eligibility_rule_results
    (citizen_id, scheme_id, rule_key, rule_label, citizen_value, scheme_value, is_rule_satisfied)
VALUES
    ('C1', 2, 'gender', 'Gender', 'Female', 'Female', true),
    ('C1', 1, 'income', 'Income', '90000', '<= 200000', true),
    ('C1', 1, 'age', 'Age', '42', '>= 18', true),
    ('C2', 1, 'age', 'Age', '42', '>= 18', true),
    ('C3', 1, 'age', 'Age', '30', '>= 35', false);
"#;

pub async fn seed(pool: &PgPool) {
    sqlx::raw_sql(SEED).execute(pool).await.unwrap();
}

/// Row count of `table` restricted to one campaign.
pub async fn campaign_rows(pool: &PgPool, table: &str, campaign_id: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!(
        "SELECT COUNT(*) FROM {table} WHERE campaign_id = $1"
    ))
    .bind(campaign_id)
    .fetch_one(pool)
    .await
    .unwrap_or_else(|e| panic!("{table} query failed: {e}"))
}
