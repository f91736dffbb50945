//! District-level eligibility summaries for geographic monitoring.
//!
//! Only the data side lives here: ordering, lookup by district name, and
//! per-metric intensity in `[0.1, 1.0]` (or `0.0` when every district is
//! zero). Drawing the map is the presentation layer's job.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Lowest non-zero intensity, so small districts stay visible.
pub const MIN_INTENSITY: f64 = 0.1;

/// One row of the `district_eligibility_summary` read model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct DistrictEligibilitySummary {
    pub district: String,
    pub total_citizens: i64,
    pub total_eligible_citizens: i64,
    pub total_unique_schemes: i64,
    pub citizen_scheme_ratio: Option<f64>,
    pub women_eligible_count: i64,
    pub farmer_eligible_count: i64,
    pub disabled_eligible_count: i64,
}

/// Which figure the map is shaded by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapMetric {
    #[default]
    EligibleCitizens,
    UniqueSchemes,
    CitizenSchemeRatio,
}

impl MapMetric {
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s {
            "citizens" | "eligible_citizens" => Ok(Self::EligibleCitizens),
            "schemes" | "unique_schemes" => Ok(Self::UniqueSchemes),
            "ratio" | "citizen_scheme_ratio" => Ok(Self::CitizenSchemeRatio),
            _ => Err(CoreError::Validation(format!(
                "Invalid map metric '{s}'. Must be one of: citizens, schemes, ratio"
            ))),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::EligibleCitizens => "Eligible Citizens",
            Self::UniqueSchemes => "Available Schemes",
            Self::CitizenSchemeRatio => "Citizens per Scheme",
        }
    }

    pub fn value(&self, summary: &DistrictEligibilitySummary) -> f64 {
        match self {
            Self::EligibleCitizens => summary.total_eligible_citizens as f64,
            Self::UniqueSchemes => summary.total_unique_schemes as f64,
            Self::CitizenSchemeRatio => summary.citizen_scheme_ratio.unwrap_or(0.0),
        }
    }

    /// Display string: integers for counts, two decimals for the ratio.
    pub fn format(&self, summary: &DistrictEligibilitySummary) -> String {
        match self {
            Self::CitizenSchemeRatio => format!("{:.2}", self.value(summary)),
            _ => format!("{}", self.value(summary) as i64),
        }
    }
}

/// Sorted district summaries with a case-insensitive name index.
#[derive(Debug, Clone, Default)]
pub struct DistrictMap {
    districts: Vec<DistrictEligibilitySummary>,
    index: HashMap<String, usize>,
}

impl DistrictMap {
    /// Sort by district name and index by normalized name.
    ///
    /// Rows with a blank district are kept in the list but not indexed.
    pub fn new(mut districts: Vec<DistrictEligibilitySummary>) -> Self {
        districts.sort_by(|a, b| a.district.cmp(&b.district));
        let index = districts
            .iter()
            .enumerate()
            .filter(|(_, d)| !d.district.trim().is_empty())
            .map(|(i, d)| (normalize_district(&d.district), i))
            .collect();
        Self { districts, index }
    }

    pub fn districts(&self) -> &[DistrictEligibilitySummary] {
        &self.districts
    }

    /// Find a district by name, ignoring case and surrounding whitespace.
    pub fn lookup(&self, name: &str) -> Option<&DistrictEligibilitySummary> {
        self.index
            .get(&normalize_district(name))
            .map(|&i| &self.districts[i])
    }

    /// Largest value of `metric` across all districts (0 when empty).
    pub fn max_value(&self, metric: MapMetric) -> f64 {
        self.districts
            .iter()
            .map(|d| metric.value(d))
            .fold(0.0, f64::max)
    }

    /// Shading intensity for a district: `max(0.1, value / max)`, or `0.0`
    /// when the maximum is zero.
    pub fn intensity(&self, summary: &DistrictEligibilitySummary, metric: MapMetric) -> f64 {
        let max = self.max_value(metric);
        if max <= 0.0 {
            return 0.0;
        }
        (metric.value(summary) / max).max(MIN_INTENSITY)
    }
}

fn normalize_district(name: &str) -> String {
    name.trim().to_lowercase()
}
