//! Repository for the `schemes` table.

use sqlx::PgPool;
use welfare_core::listing::{ListQuery, Page};

use crate::models::scheme::Scheme;
use crate::repositories::filter_sql::{fetch_page, FilterSql};

const COLUMNS: &str =
    "scheme_id, scheme_code, scheme_name, department, description, regional_scope, created_at";

pub struct SchemeRepo;

impl SchemeRepo {
    /// One page of schemes ordered by `scheme_id`.
    ///
    /// `regional_scope` is a text array; a contains filter matches its
    /// `{a,b}` text form.
    pub async fn list(pool: &PgPool, query: &ListQuery) -> Result<Page<Scheme>, sqlx::Error> {
        let mut filter = FilterSql::new();
        filter.column("", query.filter.as_ref());
        fetch_page(pool, COLUMNS, "schemes", "scheme_id", &filter, query).await
    }
}
