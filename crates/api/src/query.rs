//! Shared query parameter types for API handlers.

use serde::Deserialize;
use welfare_core::eligibility::EligibilityView;
use welfare_core::error::CoreError;
use welfare_core::listing::{clamp_page_size, ColumnFilter, ListQuery, ListSpec};

/// Default number of rows for `GET /dashboard/recent`.
pub const DEFAULT_RECENT_LIMIT: i64 = 5;

/// `?column=&value=&page=&page_size=&view=` on list endpoints.
///
/// A missing or blank `value` means no filter. `view` is only read by the
/// eligibility endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub column: Option<String>,
    pub value: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub view: Option<String>,
}

impl ListParams {
    /// Resolve the filter against `spec`'s column table.
    pub fn filter(&self, spec: &ListSpec) -> Result<Option<ColumnFilter>, CoreError> {
        spec.resolve_filter(
            self.column.as_deref().unwrap_or_default(),
            self.value.as_deref().unwrap_or_default(),
        )
    }

    /// Build the page request for `spec`.
    pub fn to_query(&self, spec: &ListSpec) -> Result<ListQuery, CoreError> {
        let page_size = clamp_page_size(self.page_size, spec.page_size);
        Ok(ListQuery::new(page_size)
            .with_page(self.page.unwrap_or(1))
            .with_filter(self.filter(spec)?))
    }

    pub fn view(&self) -> Result<EligibilityView, CoreError> {
        match self.view.as_deref().map(str::trim) {
            None | Some("") => Ok(EligibilityView::All),
            Some(view) => EligibilityView::from_str_value(view),
        }
    }
}

/// `?limit=` on bounded feeds.
#[derive(Debug, Deserialize)]
pub struct LimitParams {
    pub limit: Option<i64>,
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use welfare_core::listing::{CITIZENS, MAX_PAGE_SIZE};

    use super::*;

    #[test]
    fn defaults_to_first_unfiltered_page() {
        let query = ListParams::default().to_query(&CITIZENS).unwrap();
        assert_eq!(query, CITIZENS.first_page());
    }

    #[test]
    fn page_size_is_clamped() {
        let params = ListParams {
            page: Some(0),
            page_size: Some(10_000),
            ..ListParams::default()
        };
        let query = params.to_query(&CITIZENS).unwrap();
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, MAX_PAGE_SIZE);
    }

    #[test]
    fn blank_view_is_all() {
        let params = ListParams {
            view: Some(" ".into()),
            ..ListParams::default()
        };
        assert_eq!(params.view().unwrap(), EligibilityView::All);

        let params = ListParams {
            view: Some("sometimes".into()),
            ..ListParams::default()
        };
        assert_matches!(params.view(), Err(CoreError::Validation(_)));
    }
}
