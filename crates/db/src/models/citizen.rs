//! Citizen registry rows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use welfare_core::types::Timestamp;

/// A row of the citizens list.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Citizen {
    pub citizen_id: String,
    pub name: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub state: Option<String>,
    pub district: Option<String>,
    pub income_bracket: Option<String>,
    pub caste_category: Option<String>,
}

/// The full registry record shown in the eligibility detail panel.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct CitizenProfile {
    pub citizen_id: String,
    pub aadhaar_id: Option<String>,
    pub name: String,
    pub dob: Option<NaiveDate>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub state: Option<String>,
    pub district: Option<String>,
    pub ward_id: Option<String>,
    pub education_level: Option<String>,
    pub occupation: Option<String>,
    pub disability: Option<bool>,
    pub family_count: Option<i32>,
    pub mobile_number: Option<String>,
    pub income_bracket: Option<String>,
    pub caste_category: Option<String>,
    pub created_at: Timestamp,
}

impl From<&CitizenProfile> for Citizen {
    fn from(profile: &CitizenProfile) -> Self {
        Self {
            citizen_id: profile.citizen_id.clone(),
            name: profile.name.clone(),
            age: profile.age,
            gender: profile.gender.clone(),
            state: profile.state.clone(),
            district: profile.district.clone(),
            income_bracket: profile.income_bracket.clone(),
            caste_category: profile.caste_category.clone(),
        }
    }
}
