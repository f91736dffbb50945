//! Paginated list primitives shared by every dashboard list.
//!
//! Each list declares a static [`ListSpec`]: its fixed page size and the
//! columns a user may filter on, each tagged with the [`MatchKind`] used to
//! compare it. Raw `(column, value)` pairs from the UI are resolved against
//! that table into a [`ColumnFilter`]; gateways only ever see resolved
//! filters.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Page size used by every list in the console.
pub const DEFAULT_PAGE_SIZE: i64 = 25;

/// Upper bound accepted from callers that override the page size.
pub const MAX_PAGE_SIZE: i64 = 100;

// ---------------------------------------------------------------------------
// Column tables
// ---------------------------------------------------------------------------

/// How a filter value is compared against a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Equality on the parsed integer value.
    Equals,
    /// Case-insensitive substring match on the column's text form.
    Contains,
}

/// One filterable column of a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: MatchKind,
}

const fn contains(name: &'static str, label: &'static str) -> ColumnSpec {
    ColumnSpec {
        name,
        label,
        kind: MatchKind::Contains,
    }
}

const fn equals(name: &'static str, label: &'static str) -> ColumnSpec {
    ColumnSpec {
        name,
        label,
        kind: MatchKind::Equals,
    }
}

/// Static description of a paginated list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ListSpec {
    pub key: &'static str,
    pub page_size: i64,
    pub columns: &'static [ColumnSpec],
}

pub const CITIZENS: ListSpec = ListSpec {
    key: "citizens",
    page_size: DEFAULT_PAGE_SIZE,
    columns: &[
        contains("citizen_id", "Citizen ID"),
        contains("name", "Name"),
        equals("age", "Age"),
        contains("gender", "Gender"),
        contains("state", "State"),
        contains("district", "District"),
        contains("caste_category", "Caste Category"),
    ],
};

pub const SCHEMES: ListSpec = ListSpec {
    key: "schemes",
    page_size: DEFAULT_PAGE_SIZE,
    columns: &[
        equals("scheme_id", "Scheme ID"),
        contains("scheme_code", "Scheme Code"),
        contains("scheme_name", "Scheme Name"),
        contains("department", "Department"),
        contains("regional_scope", "Scope"),
    ],
};

/// The eligibility list filters by scheme columns; the same table restricts
/// the per-citizen rule explanations.
pub const ELIGIBILITY: ListSpec = ListSpec {
    key: "eligibility",
    page_size: DEFAULT_PAGE_SIZE,
    columns: &[
        equals("scheme_id", "Scheme ID"),
        contains("scheme_code", "Scheme Code"),
        contains("scheme_name", "Scheme Name"),
    ],
};

pub const CAMPAIGNS: ListSpec = ListSpec {
    key: "campaigns",
    page_size: DEFAULT_PAGE_SIZE,
    columns: &[
        contains("campaign_id", "Campaign ID"),
        contains("campaign_name", "Campaign Name"),
        contains("campaign_type", "Type"),
        contains("status", "Status"),
    ],
};

impl ListSpec {
    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&'static ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Resolve a raw UI filter into a [`ColumnFilter`].
    ///
    /// - An empty column or a blank value yields `Ok(None)` (no filter).
    /// - An unknown column is a validation error.
    /// - A non-integer value for an [`MatchKind::Equals`] column is a
    ///   validation error.
    ///
    /// The value is trimmed before use.
    pub fn resolve_filter(
        &self,
        column: &str,
        raw_value: &str,
    ) -> Result<Option<ColumnFilter>, CoreError> {
        let column = column.trim();
        let value = raw_value.trim();
        if column.is_empty() || value.is_empty() {
            return Ok(None);
        }

        let spec = self.column(column).ok_or_else(|| {
            CoreError::Validation(format!(
                "Unknown filter column '{column}' for {}. Must be one of: {}",
                self.key,
                self.column_names().join(", ")
            ))
        })?;

        let value = match spec.kind {
            MatchKind::Equals => value.parse::<i64>().map(FilterValue::Number).map_err(|_| {
                CoreError::Validation(format!("{} must be a whole number", spec.label))
            })?,
            MatchKind::Contains => FilterValue::Text(value.to_string()),
        };

        Ok(Some(ColumnFilter {
            column: spec.name,
            kind: spec.kind,
            value,
        }))
    }

    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }

    /// First page of this list, unfiltered.
    pub fn first_page(&self) -> ListQuery {
        ListQuery::new(self.page_size)
    }
}

// ---------------------------------------------------------------------------
// Filters and queries
// ---------------------------------------------------------------------------

/// A typed filter operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Number(i64),
    Text(String),
}

impl FilterValue {
    /// The value as it is sent over the wire.
    pub fn to_param(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

/// A filter that has been validated against a [`ListSpec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnFilter {
    pub column: &'static str,
    pub kind: MatchKind,
    pub value: FilterValue,
}

impl ColumnFilter {
    /// Compare the filter against a column rendered as text.
    ///
    /// `Equals` compares integers, so `"42"` and `"042"` both match `42`.
    pub fn matches_text(&self, text: &str) -> bool {
        match &self.value {
            FilterValue::Number(n) => text.trim().parse::<i64>().is_ok_and(|v| v == *n),
            FilterValue::Text(needle) => text.to_lowercase().contains(&needle.to_lowercase()),
        }
    }
}

/// Everything needed to fetch one page of a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub filter: Option<ColumnFilter>,
    pub page: i64,
    pub page_size: i64,
}

impl ListQuery {
    pub fn new(page_size: i64) -> Self {
        Self {
            filter: None,
            page: 1,
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn with_page(mut self, page: i64) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn with_filter(mut self, filter: Option<ColumnFilter>) -> Self {
        self.filter = filter;
        self
    }

    /// Zero-based index of the first row on this page.
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1) * self.page_size
    }

    /// Inclusive `(from, to)` row range for this page.
    pub fn range(&self) -> (i64, i64) {
        let from = self.offset();
        (from, from + self.page_size - 1)
    }
}

/// One page of rows plus the exact count of rows matching the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub rows: Vec<T>,
    pub total_count: i64,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            rows: Vec::new(),
            total_count: 0,
        }
    }

    /// Number of pages needed for `total_count` rows.
    pub fn total_pages(&self, page_size: i64) -> i64 {
        total_pages(self.total_count, page_size)
    }
}

// ---------------------------------------------------------------------------
// Pagination math
// ---------------------------------------------------------------------------

/// `ceil(total_count / page_size)`, never less than 1.
pub fn total_pages(total_count: i64, page_size: i64) -> i64 {
    if page_size <= 0 {
        return 1;
    }
    let total = total_count.max(0);
    ((total + page_size - 1) / page_size).max(1)
}

/// Clamp a requested page into `[1, total_pages]`.
pub fn clamp_page(page: i64, total_pages: i64) -> i64 {
    page.clamp(1, total_pages.max(1))
}

/// Clamp a caller-provided page size to `[1, MAX_PAGE_SIZE]`.
pub fn clamp_page_size(page_size: Option<i64>, default: i64) -> i64 {
    page_size.unwrap_or(default).clamp(1, MAX_PAGE_SIZE)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
