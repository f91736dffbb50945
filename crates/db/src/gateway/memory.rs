//! In-memory [`DataGateway`] over fixture data.
//!
//! Filters are evaluated against each row's JSON form so the same column
//! tables drive both backends: `Equals` compares integers, `Contains` is a
//! case-insensitive substring match, and a null column never matches.
//! Latency and failures can be injected per call site to exercise request
//! ordering in the controllers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;
use welfare_core::campaign::CampaignType;
use welfare_core::eligibility::{EligibilityView, EvaluationRow};
use welfare_core::geo::DistrictEligibilitySummary;
use welfare_core::insights::{tally_by_scheme, SchemeTally};
use welfare_core::listing::{ColumnFilter, ListQuery, Page};

use super::{DataGateway, GatewayError, GatewayResult};
use crate::models::campaign::{Campaign, CampaignCitizen, CampaignCitizenScheme, NewCampaign};
use crate::models::citizen::{Citizen, CitizenProfile};
use crate::models::dashboard::DashboardStats;
use crate::models::eligibility::{CitizenEligibilitySummary, EligibilityEvaluation};
use crate::models::scheme::Scheme;

/// Status a campaign moves to once its batch is filled.
const STATUS_READY: &str = "ready";

/// Everything the memory gateway serves.
#[derive(Debug, Clone, Default)]
pub struct MemoryData {
    pub citizens: Vec<CitizenProfile>,
    pub schemes: Vec<Scheme>,
    pub evaluations: Vec<EligibilityEvaluation>,
    pub summaries: Vec<CitizenEligibilitySummary>,
    /// Rule rows keyed by citizen id.
    pub explanations: HashMap<String, Vec<EvaluationRow>>,
    pub districts: Vec<DistrictEligibilitySummary>,
    pub campaigns: Vec<Campaign>,
    pub campaign_citizens: Vec<CampaignCitizen>,
    /// `(campaign_id, row)` pairs.
    pub campaign_schemes: Vec<(String, CampaignCitizenScheme)>,
}

#[derive(Debug, Default)]
pub struct MemoryGateway {
    data: RwLock<MemoryData>,
    page_delays: Mutex<HashMap<i64, Duration>>,
    citizen_delays: Mutex<HashMap<String, Duration>>,
    fail_lists: AtomicBool,
    fail_details: AtomicBool,
    fail_populate: AtomicBool,
    list_calls: AtomicU64,
    explanation_calls: AtomicU64,
}

impl MemoryGateway {
    pub fn new(data: MemoryData) -> Self {
        Self {
            data: RwLock::new(data),
            ..Self::default()
        }
    }

    /// Delay every list response for `page` by `delay`.
    pub fn delay_page(&self, page: i64, delay: Duration) {
        lock(&self.page_delays).insert(page, delay);
    }

    /// Delay rule explanation and profile responses for one citizen.
    pub fn delay_citizen(&self, citizen_id: &str, delay: Duration) {
        lock(&self.citizen_delays).insert(citizen_id.to_string(), delay);
    }

    /// Make list calls fail with a backend error until switched off.
    pub fn fail_lists(&self, fail: bool) {
        self.fail_lists.store(fail, Ordering::SeqCst);
    }

    /// Make explanation and profile calls fail until switched off.
    pub fn fail_details(&self, fail: bool) {
        self.fail_details.store(fail, Ordering::SeqCst);
    }

    /// Make campaign population fail until switched off.
    pub fn fail_populate(&self, fail: bool) {
        self.fail_populate.store(fail, Ordering::SeqCst);
    }

    /// Number of list calls served, successful or not.
    pub fn list_calls(&self) -> u64 {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn explanation_calls(&self) -> u64 {
        self.explanation_calls.load(Ordering::SeqCst)
    }

    /// Replace the fixture data.
    pub async fn replace(&self, data: MemoryData) {
        *self.data.write().await = data;
    }

    async fn begin_list(&self, query: &ListQuery) -> GatewayResult<()> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let delay = lock(&self.page_delays).get(&query.page).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_lists.load(Ordering::SeqCst) {
            return Err(GatewayError::Backend("injected list failure".to_string()));
        }
        Ok(())
    }

    async fn begin_detail(&self, citizen_id: &str) -> GatewayResult<()> {
        let delay = lock(&self.citizen_delays).get(citizen_id).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_details.load(Ordering::SeqCst) {
            return Err(GatewayError::Backend("injected detail failure".to_string()));
        }
        Ok(())
    }

    async fn populate<F>(&self, campaign_id: &str, expected: CampaignType, select: F) -> GatewayResult<i64>
    where
        F: Fn(&Campaign, &CitizenProfile, &[&EligibilityEvaluation]) -> bool,
    {
        if self.fail_populate.load(Ordering::SeqCst) {
            return Err(GatewayError::Unavailable("injected populate failure".to_string()));
        }
        let mut data = self.data.write().await;
        let campaign = data
            .campaigns
            .iter()
            .find(|c| c.campaign_id == campaign_id)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound {
                entity: "Campaign",
                id: campaign_id.to_string(),
            })?;
        if campaign.campaign_type != expected.as_str() {
            return Err(GatewayError::InvalidRequest(format!(
                "Campaign {campaign_id} is a {} campaign",
                campaign.campaign_type
            )));
        }

        let mut members = Vec::new();
        let mut schemes = Vec::new();
        for citizen in &data.citizens {
            let eligible: Vec<&EligibilityEvaluation> = data
                .evaluations
                .iter()
                .filter(|e| e.citizen_id == citizen.citizen_id && e.is_eligible)
                .collect();
            if eligible.is_empty() || !select(&campaign, citizen, &eligible) {
                continue;
            }
            let already = data
                .campaign_citizens
                .iter()
                .any(|m| m.campaign_id == campaign_id && m.citizen_id == citizen.citizen_id);
            if already {
                continue;
            }
            members.push(CampaignCitizen {
                campaign_id: campaign_id.to_string(),
                citizen_id: citizen.citizen_id.clone(),
                citizen_name: citizen.name.clone(),
                mobile_number: citizen.mobile_number.clone(),
                state: citizen.state.clone(),
                district: citizen.district.clone(),
            });
            for evaluation in &eligible {
                let wanted = match expected {
                    CampaignType::Scheme => campaign.target_scheme_id == Some(evaluation.scheme_id),
                    CampaignType::Geography => true,
                };
                let name = data
                    .schemes
                    .iter()
                    .find(|s| s.scheme_id == evaluation.scheme_id)
                    .map(|s| s.scheme_name.clone());
                if let (true, Some(scheme_name)) = (wanted, name) {
                    schemes.push((
                        campaign_id.to_string(),
                        CampaignCitizenScheme {
                            citizen_id: citizen.citizen_id.clone(),
                            scheme_name,
                        },
                    ));
                }
            }
        }

        let added = members.len() as i64;
        data.campaign_citizens.extend(members);
        data.campaign_schemes.extend(schemes);
        if let Some(stored) = data.campaigns.iter_mut().find(|c| c.campaign_id == campaign_id) {
            stored.status = STATUS_READY.to_string();
        }
        Ok(added)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ---------------------------------------------------------------------------
// Filtering and paging
// ---------------------------------------------------------------------------

fn row_matches<T: Serialize>(row: &T, filter: &ColumnFilter) -> bool {
    let Ok(Value::Object(fields)) = serde_json::to_value(row) else {
        return false;
    };
    fields
        .get(filter.column)
        .and_then(column_text)
        .is_some_and(|text| filter.matches_text(&text))
}

/// Text form of a JSON column, mirroring `col::text` in Postgres.
fn column_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(column_text).collect();
            Some(format!("{{{}}}", parts.join(",")))
        }
        other => Some(other.to_string()),
    }
}

fn paginate<T: Clone>(rows: Vec<T>, query: &ListQuery) -> Page<T> {
    let total_count = rows.len() as i64;
    let offset = query.offset().max(0) as usize;
    let rows = rows
        .into_iter()
        .skip(offset)
        .take(query.page_size.max(0) as usize)
        .collect();
    Page { rows, total_count }
}

fn filter_sort_page<T, K, F>(rows: &[T], query: &ListQuery, key: F) -> Page<T>
where
    T: Clone + Serialize,
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut matching: Vec<T> = rows
        .iter()
        .filter(|r| query.filter.as_ref().map_or(true, |f| row_matches(*r, f)))
        .cloned()
        .collect();
    matching.sort_by_key(|r| key(r));
    paginate(matching, query)
}

fn sorted_explanations(rows: &[EvaluationRow], filter: Option<&ColumnFilter>) -> Vec<EvaluationRow> {
    let mut rows: Vec<EvaluationRow> = rows
        .iter()
        .filter(|r| filter.map_or(true, |f| row_matches(*r, f)))
        .cloned()
        .collect();
    rows.sort_by(|a, b| {
        a.scheme_code
            .cmp(&b.scheme_code)
            .then_with(|| a.rule_key.cmp(&b.rule_key))
    });
    rows
}

// ---------------------------------------------------------------------------
// DataGateway
// ---------------------------------------------------------------------------

#[async_trait]
impl DataGateway for MemoryGateway {
    async fn ping(&self) -> GatewayResult<()> {
        Ok(())
    }

    async fn list_citizens(&self, query: &ListQuery) -> GatewayResult<Page<Citizen>> {
        self.begin_list(query).await?;
        let data = self.data.read().await;
        let citizens: Vec<Citizen> = data.citizens.iter().map(Citizen::from).collect();
        Ok(filter_sort_page(&citizens, query, |c| c.citizen_id.clone()))
    }

    async fn list_schemes(&self, query: &ListQuery) -> GatewayResult<Page<Scheme>> {
        self.begin_list(query).await?;
        let data = self.data.read().await;
        Ok(filter_sort_page(&data.schemes, query, |s| s.scheme_id))
    }

    async fn list_campaigns(&self, query: &ListQuery) -> GatewayResult<Page<Campaign>> {
        self.begin_list(query).await?;
        let data = self.data.read().await;
        Ok(filter_sort_page(&data.campaigns, query, |c| c.campaign_id.clone()))
    }

    async fn citizen_eligibility_summary(
        &self,
        query: &ListQuery,
        view: EligibilityView,
    ) -> GatewayResult<Page<CitizenEligibilitySummary>> {
        self.begin_list(query).await?;
        let data = self.data.read().await;
        let mut rows: Vec<CitizenEligibilitySummary> = data
            .summaries
            .iter()
            .filter(|s| view.includes_count(s.eligible_scheme_count))
            .filter(|s| match query.filter.as_ref() {
                None => true,
                Some(filter) => data
                    .explanations
                    .get(&s.citizen_id)
                    .is_some_and(|rows| rows.iter().any(|r| row_matches(r, filter))),
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.citizen_id.cmp(&b.citizen_id));
        Ok(paginate(rows, query))
    }

    async fn citizen_rule_explanations(
        &self,
        citizen_id: &str,
        filter: Option<&ColumnFilter>,
    ) -> GatewayResult<Vec<EvaluationRow>> {
        self.explanation_calls.fetch_add(1, Ordering::SeqCst);
        self.begin_detail(citizen_id).await?;
        let data = self.data.read().await;
        Ok(data
            .explanations
            .get(citizen_id)
            .map(|rows| sorted_explanations(rows, filter))
            .unwrap_or_default())
    }

    async fn citizen_profile(&self, citizen_id: &str) -> GatewayResult<Option<CitizenProfile>> {
        self.begin_detail(citizen_id).await?;
        let data = self.data.read().await;
        Ok(data
            .citizens
            .iter()
            .find(|c| c.citizen_id == citizen_id)
            .cloned())
    }

    async fn district_summaries(&self) -> GatewayResult<Vec<DistrictEligibilitySummary>> {
        let data = self.data.read().await;
        let mut districts = data.districts.clone();
        districts.sort_by(|a, b| a.district.cmp(&b.district));
        Ok(districts)
    }

    async fn dashboard_stats(&self) -> GatewayResult<DashboardStats> {
        let data = self.data.read().await;
        Ok(DashboardStats {
            citizens: data.citizens.len() as i64,
            schemes: data.schemes.len() as i64,
            evaluations: data.evaluations.len() as i64,
        })
    }

    async fn recent_evaluations(&self, limit: i64) -> GatewayResult<Vec<EligibilityEvaluation>> {
        let data = self.data.read().await;
        let mut rows = data.evaluations.clone();
        rows.sort_by(|a, b| {
            b.evaluated_at
                .cmp(&a.evaluated_at)
                .then_with(|| a.citizen_id.cmp(&b.citizen_id))
                .then_with(|| a.scheme_id.cmp(&b.scheme_id))
        });
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }

    async fn scheme_tallies(&self, eligible: bool) -> GatewayResult<Vec<SchemeTally>> {
        let data = self.data.read().await;
        let mut pairs: Vec<(i64, &str)> = data
            .evaluations
            .iter()
            .filter(|e| e.is_eligible == eligible)
            .map(|e| (e.scheme_id, e.citizen_id.as_str()))
            .collect();
        pairs.sort_unstable();
        pairs.dedup();
        Ok(tally_by_scheme(pairs.into_iter().map(|(scheme_id, _)| scheme_id)))
    }

    async fn find_campaign(&self, campaign_id: &str) -> GatewayResult<Option<Campaign>> {
        let data = self.data.read().await;
        Ok(data
            .campaigns
            .iter()
            .find(|c| c.campaign_id == campaign_id)
            .cloned())
    }

    async fn campaign_citizens(&self, campaign_id: &str) -> GatewayResult<Vec<CampaignCitizen>> {
        let data = self.data.read().await;
        let mut rows: Vec<CampaignCitizen> = data
            .campaign_citizens
            .iter()
            .filter(|m| m.campaign_id == campaign_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            a.citizen_name
                .cmp(&b.citizen_name)
                .then_with(|| a.citizen_id.cmp(&b.citizen_id))
        });
        Ok(rows)
    }

    async fn campaign_citizen_schemes(
        &self,
        campaign_id: &str,
    ) -> GatewayResult<Vec<CampaignCitizenScheme>> {
        let data = self.data.read().await;
        let mut rows: Vec<CampaignCitizenScheme> = data
            .campaign_schemes
            .iter()
            .filter(|(id, _)| id == campaign_id)
            .map(|(_, row)| row.clone())
            .collect();
        rows.sort_by(|a, b| {
            a.citizen_id
                .cmp(&b.citizen_id)
                .then_with(|| a.scheme_name.cmp(&b.scheme_name))
        });
        Ok(rows)
    }

    async fn create_campaign(&self, record: &NewCampaign) -> GatewayResult<Campaign> {
        let mut data = self.data.write().await;
        if let Some(existing) = data
            .campaigns
            .iter()
            .find(|c| c.campaign_id == record.campaign_id)
        {
            return Ok(existing.clone());
        }
        if let Some(scheme_id) = record.target_scheme_id {
            if !data.schemes.iter().any(|s| s.scheme_id == scheme_id) {
                return Err(GatewayError::InvalidRequest(format!(
                    "Unknown target scheme: {scheme_id}"
                )));
            }
        }
        let campaign = Campaign {
            campaign_id: record.campaign_id.clone(),
            campaign_name: record.campaign_name.clone(),
            campaign_type: record.campaign_type.clone(),
            status: record.initial_status().to_string(),
            target_state: record.target_state.clone(),
            target_district: record.target_district.clone(),
            target_scheme_id: record.target_scheme_id,
            created_at: Utc::now(),
        };
        data.campaigns.push(campaign.clone());
        Ok(campaign)
    }

    async fn delete_campaign(&self, campaign_id: &str) -> GatewayResult<bool> {
        let mut data = self.data.write().await;
        let before = data.campaigns.len();
        data.campaigns.retain(|c| c.campaign_id != campaign_id);
        let removed = data.campaigns.len() < before;
        if removed {
            data.campaign_citizens.retain(|m| m.campaign_id != campaign_id);
            data.campaign_schemes.retain(|(id, _)| id != campaign_id);
        }
        Ok(removed)
    }

    async fn populate_geography_campaign(&self, campaign_id: &str) -> GatewayResult<i64> {
        self.populate(campaign_id, CampaignType::Geography, |campaign, citizen, _| {
            let state_ok = campaign
                .target_state
                .as_ref()
                .map_or(true, |s| citizen.state.as_ref() == Some(s));
            let district_ok = campaign
                .target_district
                .as_ref()
                .map_or(true, |d| citizen.district.as_ref() == Some(d));
            state_ok && district_ok
        })
        .await
    }

    async fn populate_scheme_campaign(&self, campaign_id: &str) -> GatewayResult<i64> {
        self.populate(campaign_id, CampaignType::Scheme, |campaign, _, eligible| {
            eligible
                .iter()
                .any(|e| campaign.target_scheme_id == Some(e.scheme_id))
        })
        .await
    }
}
