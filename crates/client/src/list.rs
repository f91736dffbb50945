//! Paginated list controller.
//!
//! A [`ListController`] owns everything a list page shows: the current rows,
//! the page cursor, the exact total, the draft filter the user is typing and
//! the filter actually applied. Every mutation that changes what should be
//! on screen ends in [`ListController::refresh`].
//!
//! Fetches are tagged with a sequence number taken before the request is
//! sent. When a response arrives, it is applied only if no newer fetch has
//! started since; otherwise it is dropped and reported as
//! [`FetchOutcome::Superseded`]. The last fetch issued always wins, whatever
//! order the responses come back in.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde::Serialize;
use welfare_core::error::CoreError;
use welfare_core::filter_state::FilterState;
use welfare_core::listing::{clamp_page, total_pages, ColumnFilter, ListQuery, ListSpec, Page};
use welfare_db::gateway::GatewayResult;

use crate::error::ClientResult;

// ---------------------------------------------------------------------------
// Source trait
// ---------------------------------------------------------------------------

/// Where a list's pages come from.
#[async_trait]
pub trait ListSource: Send + Sync {
    type Row: Clone + Send + Sync + 'static;

    /// Extra list-wide selector, such as the eligibility view toggle.
    type Scope: Clone + Default + PartialEq + Send + Sync + 'static;

    fn spec(&self) -> &'static ListSpec;

    async fn fetch(&self, query: &ListQuery, scope: &Self::Scope)
        -> GatewayResult<Page<Self::Row>>;
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Whether a completed fetch was applied to the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// A newer fetch started before this one completed.
    Superseded,
}

/// Point-in-time copy of a list's state for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct ListSnapshot<R, S> {
    pub rows: Vec<R>,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub total_count: i64,
    pub loading: bool,
    pub error: Option<String>,
    pub draft: FilterState,
    #[serde(skip)]
    pub applied: Option<ColumnFilter>,
    pub scope: S,
}

impl<R, S> ListSnapshot<R, S> {
    pub fn can_apply(&self) -> bool {
        self.draft.can_apply()
    }
}

#[derive(Debug)]
struct ListState<R, S> {
    rows: Vec<R>,
    page: i64,
    total_pages: i64,
    total_count: i64,
    loading: bool,
    error: Option<String>,
    draft: FilterState,
    applied: Option<ColumnFilter>,
    scope: S,
    /// Sequence number of the most recently issued fetch.
    issued: u64,
}

impl<R, S: Default> Default for ListState<R, S> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            page: 1,
            total_pages: 1,
            total_count: 0,
            loading: false,
            error: None,
            draft: FilterState::Idle,
            applied: None,
            scope: S::default(),
            issued: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

pub struct ListController<S: ListSource> {
    source: S,
    state: Mutex<ListState<S::Row, S::Scope>>,
}

impl<S: ListSource> ListController<S> {
    /// An empty list on page 1. Nothing is fetched until [`Self::refresh`].
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: Mutex::new(ListState::default()),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn state(&self) -> MutexGuard<'_, ListState<S::Row, S::Scope>> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> ListSnapshot<S::Row, S::Scope> {
        let state = self.state();
        ListSnapshot {
            rows: state.rows.clone(),
            page: state.page,
            page_size: self.source.spec().page_size,
            total_pages: state.total_pages,
            total_count: state.total_count,
            loading: state.loading,
            error: state.error.clone(),
            draft: state.draft.clone(),
            applied: state.applied.clone(),
            scope: state.scope.clone(),
        }
    }

    /// The filter the list is currently fetched with.
    pub fn applied_filter(&self) -> Option<ColumnFilter> {
        self.state().applied.clone()
    }

    pub fn scope(&self) -> S::Scope {
        self.state().scope.clone()
    }

    // -- Draft filter (never fetches) ---------------------------------------

    /// Record the draft column and value.
    pub fn set_filter(&self, column: &str, value: &str) {
        self.state().draft.set_filter(column, value);
    }

    pub fn select_column(&self, column: &str) {
        self.state().draft.select_column(column);
    }

    pub fn set_value(&self, value: &str) {
        self.state().draft.set_value(value);
    }

    // -- Mutations that fetch -----------------------------------------------

    /// Apply the draft filter and fetch page 1.
    ///
    /// Rejected without fetching or changing anything unless the draft is
    /// ready and resolves against the list's column table.
    pub async fn apply_filter(&self) -> ClientResult<FetchOutcome> {
        {
            let mut state = self.state();
            if !state.draft.can_apply() {
                return Err(CoreError::Validation(
                    "Select a column and enter a search value first".to_string(),
                )
                .into());
            }
            let spec = self.source.spec();
            let column = state.draft.column().unwrap_or_default();
            let value = state.draft.value().unwrap_or_default();
            let filter = spec.resolve_filter(column, value)?.ok_or_else(|| {
                CoreError::Validation("Enter a search value first".to_string())
            })?;

            state.draft.apply()?;
            state.applied = Some(filter);
            state.page = 1;
        }
        self.refresh().await
    }

    /// Clear the draft and applied filter and fetch page 1.
    pub async fn reset_filter(&self) -> ClientResult<FetchOutcome> {
        {
            let mut state = self.state();
            state.draft.reset();
            state.applied = None;
            state.page = 1;
        }
        self.refresh().await
    }

    /// Move to page `page`, clamped to `[1, total_pages]`, and fetch it.
    pub async fn set_page(&self, page: i64) -> ClientResult<FetchOutcome> {
        {
            let mut state = self.state();
            state.page = clamp_page(page, state.total_pages);
        }
        self.refresh().await
    }

    /// Change the list-wide scope and fetch page 1.
    pub async fn set_scope(&self, scope: S::Scope) -> ClientResult<FetchOutcome> {
        {
            let mut state = self.state();
            state.scope = scope;
            state.page = 1;
        }
        self.refresh().await
    }

    /// Fetch the current page with the applied filter and scope.
    ///
    /// On failure the previous rows and totals stay in place and the error
    /// message is recorded in the snapshot.
    pub async fn refresh(&self) -> ClientResult<FetchOutcome> {
        let spec = self.source.spec();
        let (seq, query, scope) = {
            let mut state = self.state();
            state.issued += 1;
            state.loading = true;
            let query = ListQuery::new(spec.page_size)
                .with_page(state.page)
                .with_filter(state.applied.clone());
            (state.issued, query, state.scope.clone())
        };

        let result = self.source.fetch(&query, &scope).await;

        let mut state = self.state();
        if state.issued != seq {
            tracing::debug!(
                list = spec.key,
                seq,
                latest = state.issued,
                "Discarding superseded list response"
            );
            return Ok(FetchOutcome::Superseded);
        }

        state.loading = false;
        match result {
            Ok(page) => {
                state.total_count = page.total_count;
                state.total_pages = total_pages(page.total_count, spec.page_size);
                state.rows = page.rows;
                state.error = None;
                Ok(FetchOutcome::Applied)
            }
            Err(err) => {
                tracing::warn!(list = spec.key, page = query.page, error = %err, "List fetch failed");
                state.error = Some(err.to_string());
                Err(err.into())
            }
        }
    }
}
