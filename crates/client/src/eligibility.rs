//! Eligibility page: the citizen summary list plus a detail panel showing
//! one citizen's per-scheme verdicts.
//!
//! The panel's schemes are always derived from the rule rows with
//! [`aggregate_rule_explanations`], restricted by the list's applied filter.
//! A selection generation guards the panel the same way the list's request
//! sequence guards the rows: a response for a citizen that is no longer
//! selected is dropped.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use welfare_core::eligibility::{aggregate_rule_explanations, EligibilityView, SchemeEligibility};
use welfare_db::gateway::DataGateway;
use welfare_db::models::citizen::CitizenProfile;

use crate::error::{ClientError, ClientResult};
use crate::list::{FetchOutcome, ListController};
use crate::sources::EligibilitySummaryList;

/// Point-in-time copy of the detail panel.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DetailSnapshot {
    pub citizen_id: Option<String>,
    pub loading: bool,
    pub schemes: Vec<SchemeEligibility>,
    pub profile: Option<CitizenProfile>,
    pub error: Option<String>,
}

impl DetailSnapshot {
    /// Schemes shown under `view`, in aggregation order.
    pub fn visible(&self, view: EligibilityView) -> Vec<&SchemeEligibility> {
        view.filter(&self.schemes)
    }

    /// A selected citizen whose explanations loaded but matched nothing.
    pub fn is_empty(&self) -> bool {
        self.citizen_id.is_some() && !self.loading && self.error.is_none() && self.schemes.is_empty()
    }
}

#[derive(Debug, Default)]
struct DetailState {
    generation: u64,
    selected: Option<String>,
    loading: bool,
    schemes: Vec<SchemeEligibility>,
    profile: Option<CitizenProfile>,
    error: Option<String>,
}

pub struct EligibilityPage {
    gateway: Arc<dyn DataGateway>,
    list: ListController<EligibilitySummaryList>,
    detail: Mutex<DetailState>,
}

impl EligibilityPage {
    pub fn new(gateway: Arc<dyn DataGateway>) -> Self {
        Self {
            list: ListController::new(EligibilitySummaryList::new(gateway.clone())),
            gateway,
            detail: Mutex::new(DetailState::default()),
        }
    }

    pub fn list(&self) -> &ListController<EligibilitySummaryList> {
        &self.list
    }

    fn detail(&self) -> MutexGuard<'_, DetailState> {
        self.detail.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn detail_snapshot(&self) -> DetailSnapshot {
        let detail = self.detail();
        DetailSnapshot {
            citizen_id: detail.selected.clone(),
            loading: detail.loading,
            schemes: detail.schemes.clone(),
            profile: detail.profile.clone(),
            error: detail.error.clone(),
        }
    }

    /// The detail panel's schemes under the list's current view.
    pub fn visible_schemes(&self) -> Vec<SchemeEligibility> {
        let view = self.list.scope();
        self.detail_snapshot()
            .visible(view)
            .into_iter()
            .cloned()
            .collect()
    }

    // -- List -------------------------------------------------------------

    pub async fn refresh(&self) -> ClientResult<FetchOutcome> {
        self.list.refresh().await
    }

    /// Apply the list filter and re-derive the open citizen's detail.
    pub async fn apply_filter(&self) -> ClientResult<FetchOutcome> {
        let outcome = self.list.apply_filter().await;
        if matches!(outcome, Err(ClientError::Core(_))) {
            return outcome;
        }
        self.reload_detail().await;
        outcome
    }

    /// Clear the list filter and re-derive the open citizen's detail.
    pub async fn reset_filter(&self) -> ClientResult<FetchOutcome> {
        let outcome = self.list.reset_filter().await;
        self.reload_detail().await;
        outcome
    }

    pub async fn set_page(&self, page: i64) -> ClientResult<FetchOutcome> {
        self.list.set_page(page).await
    }

    /// Switch the All / Eligible / Not eligible toggle.
    ///
    /// The list is re-fetched under the new view; the panel only changes
    /// which already-loaded schemes are visible.
    pub async fn set_view(&self, view: EligibilityView) -> ClientResult<FetchOutcome> {
        self.list.set_scope(view).await
    }

    // -- Detail -----------------------------------------------------------

    /// Open a citizen's detail and load it.
    ///
    /// Returns `Ok(false)` when another selection superseded this one before
    /// the responses arrived.
    pub async fn select_citizen(&self, citizen_id: &str) -> ClientResult<bool> {
        let generation = {
            let mut detail = self.detail();
            detail.generation += 1;
            if detail.selected.as_deref() != Some(citizen_id) {
                detail.schemes.clear();
                detail.profile = None;
            }
            detail.selected = Some(citizen_id.to_string());
            detail.loading = true;
            detail.error = None;
            detail.generation
        };
        self.load_detail(generation, citizen_id).await
    }

    /// Close the panel. Any load still in flight is discarded.
    pub fn close_detail(&self) {
        let mut detail = self.detail();
        let generation = detail.generation + 1;
        *detail = DetailState {
            generation,
            ..DetailState::default()
        };
    }

    async fn reload_detail(&self) {
        let (generation, citizen_id) = {
            let mut detail = self.detail();
            let Some(citizen_id) = detail.selected.clone() else {
                return;
            };
            detail.generation += 1;
            detail.loading = true;
            (detail.generation, citizen_id)
        };
        // The error is already on the detail snapshot.
        let _ = self.load_detail(generation, &citizen_id).await;
    }

    async fn load_detail(&self, generation: u64, citizen_id: &str) -> ClientResult<bool> {
        let filter = self.list.applied_filter();
        let (explanations, profile) = tokio::join!(
            self.gateway.citizen_rule_explanations(citizen_id, filter.as_ref()),
            self.gateway.citizen_profile(citizen_id),
        );

        let mut detail = self.detail();
        if detail.generation != generation {
            tracing::debug!(citizen_id, generation, "Discarding stale citizen detail");
            return Ok(false);
        }

        detail.loading = false;
        if let Err(err) = &profile {
            tracing::warn!(citizen_id, error = %err, "Failed to load citizen profile");
        }
        detail.profile = profile.ok().flatten();

        match explanations {
            Ok(rows) => {
                detail.schemes = aggregate_rule_explanations(rows);
                detail.error = None;
                Ok(true)
            }
            Err(err) => {
                tracing::warn!(citizen_id, error = %err, "Failed to load rule explanations");
                detail.schemes.clear();
                detail.error = Some(err.to_string());
                Err(err.into())
            }
        }
    }
}
