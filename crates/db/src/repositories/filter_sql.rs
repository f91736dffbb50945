//! Dynamic `WHERE` clauses for filtered list queries.
//!
//! Conditions are collected with positional `$n` placeholders and the
//! matching values are bound afterwards in the same order.

use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::{QueryAs, QueryScalar};
use sqlx::{FromRow, PgPool, Postgres};
use welfare_core::listing::{ColumnFilter, FilterValue, ListQuery, Page};

/// View holding one row per (citizen, scheme, rule).
pub const EXPLAIN_VIEW: &str = "citizen_scheme_eligibility_explain_rows";

#[derive(Debug, Default)]
pub struct FilterSql {
    conditions: Vec<String>,
    binds: Vec<FilterValue>,
}

impl FilterSql {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the next positional parameter.
    pub fn next_idx(&self) -> usize {
        self.binds.len() + 1
    }

    /// Add a condition without parameters.
    pub fn raw(&mut self, condition: impl Into<String>) -> &mut Self {
        self.conditions.push(condition.into());
        self
    }

    /// Add an equality condition on a text column, for example a foreign id.
    pub fn text_eq(&mut self, column: &str, value: &str) -> &mut Self {
        let idx = self.next_idx();
        self.conditions.push(format!("{column} = ${idx}"));
        self.binds.push(FilterValue::Text(value.to_string()));
        self
    }

    /// Add a user column filter, if any. `qualifier` is a table alias such
    /// as `"e."` or the empty string.
    pub fn column(&mut self, qualifier: &str, filter: Option<&ColumnFilter>) -> &mut Self {
        if let Some(filter) = filter {
            let idx = self.next_idx();
            let (condition, bind) = column_condition(qualifier, filter, idx);
            self.conditions.push(condition);
            self.binds.push(bind);
        }
        self
    }

    /// Keep only citizens with at least one explanation row matching the
    /// filter. Used to narrow the eligibility summary by scheme columns.
    pub fn explained_scheme(&mut self, outer: &str, filter: Option<&ColumnFilter>) -> &mut Self {
        if let Some(filter) = filter {
            let idx = self.next_idx();
            let (inner, bind) = column_condition("e.", filter, idx);
            self.conditions.push(format!(
                "EXISTS (SELECT 1 FROM {EXPLAIN_VIEW} e \
                 WHERE e.citizen_id = {outer}citizen_id AND {inner})"
            ));
            self.binds.push(bind);
        }
        self
    }

    /// `WHERE a AND b`, or an empty string when there are no conditions.
    pub fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conditions.join(" AND "))
        }
    }

    /// Bind the collected values, in order, to a row query.
    pub fn bind_as<'q, O>(
        &self,
        mut query: QueryAs<'q, Postgres, O, PgArguments>,
    ) -> QueryAs<'q, Postgres, O, PgArguments> {
        for value in &self.binds {
            query = match value {
                FilterValue::Number(n) => query.bind(*n),
                FilterValue::Text(s) => query.bind(s.clone()),
            };
        }
        query
    }

    /// Bind the collected values, in order, to a scalar query.
    pub fn bind_scalar<'q, O>(
        &self,
        mut query: QueryScalar<'q, Postgres, O, PgArguments>,
    ) -> QueryScalar<'q, Postgres, O, PgArguments> {
        for value in &self.binds {
            query = match value {
                FilterValue::Number(n) => query.bind(*n),
                FilterValue::Text(s) => query.bind(s.clone()),
            };
        }
        query
    }
}

/// Fetch one page of `source` plus the exact count of rows matching `filter`.
///
/// `source` is the `FROM` target (with alias, if the filter uses one) and
/// `order_by` must be a stable key so pages never overlap.
pub async fn fetch_page<T>(
    pool: &PgPool,
    columns: &str,
    source: &str,
    order_by: &str,
    filter: &FilterSql,
    query: &ListQuery,
) -> Result<Page<T>, sqlx::Error>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let where_clause = filter.where_clause();
    let limit_idx = filter.next_idx();
    let rows_sql = format!(
        "SELECT {columns} FROM {source}{where_clause} \
         ORDER BY {order_by} LIMIT ${limit_idx} OFFSET ${offset_idx}",
        offset_idx = limit_idx + 1,
    );
    let rows = filter
        .bind_as(sqlx::query_as::<_, T>(&rows_sql))
        .bind(query.page_size)
        .bind(query.offset())
        .fetch_all(pool)
        .await?;

    let count_sql = format!("SELECT COUNT(*) FROM {source}{where_clause}");
    let total_count = filter
        .bind_scalar(sqlx::query_scalar::<_, i64>(&count_sql))
        .fetch_one(pool)
        .await?;

    Ok(Page { rows, total_count })
}

fn column_condition(qualifier: &str, filter: &ColumnFilter, idx: usize) -> (String, FilterValue) {
    match &filter.value {
        FilterValue::Number(n) => (
            format!("{qualifier}{} = ${idx}", filter.column),
            FilterValue::Number(*n),
        ),
        FilterValue::Text(s) => (
            format!("{qualifier}{}::text ILIKE ${idx}", filter.column),
            FilterValue::Text(like_pattern(s)),
        ),
    }
}

/// `%needle%` with `\`, `%` and `_` escaped so they match literally.
pub fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use welfare_core::listing::{CITIZENS, ELIGIBILITY};

    use super::*;

    #[test]
    fn no_filter_means_no_where() {
        let sql = FilterSql::new();
        assert_eq!(sql.where_clause(), "");
        assert_eq!(sql.next_idx(), 1);
    }

    #[test]
    fn contains_uses_ilike_on_text() {
        let filter = CITIZENS.resolve_filter("state", "bih").unwrap();
        let mut sql = FilterSql::new();
        sql.column("", filter.as_ref());
        assert_eq!(sql.where_clause(), " WHERE state::text ILIKE $1");
        assert_eq!(sql.binds, vec![FilterValue::Text("%bih%".into())]);
    }

    #[test]
    fn equals_binds_the_number() {
        let filter = CITIZENS.resolve_filter("age", "42").unwrap();
        let mut sql = FilterSql::new();
        sql.raw("age IS NOT NULL").column("", filter.as_ref());
        assert_eq!(sql.where_clause(), " WHERE age IS NOT NULL AND age = $1");
        assert_eq!(sql.binds, vec![FilterValue::Number(42)]);
    }

    #[test]
    fn explained_scheme_is_an_exists_subquery() {
        let filter = ELIGIBILITY.resolve_filter("scheme_code", "PM").unwrap();
        let mut sql = FilterSql::new();
        sql.raw("s.eligible_scheme_count > 0")
            .explained_scheme("s.", filter.as_ref());
        assert_eq!(
            sql.where_clause(),
            " WHERE s.eligible_scheme_count > 0 AND EXISTS (SELECT 1 FROM \
             citizen_scheme_eligibility_explain_rows e WHERE e.citizen_id = s.citizen_id \
             AND e.scheme_code::text ILIKE $1)"
        );
    }

    #[test]
    fn placeholders_follow_bind_order() {
        let filter = ELIGIBILITY.resolve_filter("scheme_id", "7").unwrap();
        let mut sql = FilterSql::new();
        sql.text_eq("citizen_id", "C-1").column("", filter.as_ref());
        assert_eq!(sql.where_clause(), " WHERE citizen_id = $1 AND scheme_id = $2");
        assert_eq!(sql.next_idx(), 3);
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(like_pattern("50%"), "%50\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("c:\\x"), "%c:\\\\x%");
        assert_eq!(like_pattern("plain"), "%plain%");
    }
}
