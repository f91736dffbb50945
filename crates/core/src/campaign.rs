//! Outreach campaign drafts and identifiers.
//!
//! Campaign ids are generated on the client before the insert is sent, so
//! a retried create carries the same id and the backend can absorb the
//! duplicate.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const TYPE_GEOGRAPHY: &str = "geography";
pub const TYPE_SCHEME: &str = "scheme";

/// All valid campaign type strings.
pub const VALID_CAMPAIGN_TYPES: &[&str] = &[TYPE_GEOGRAPHY, TYPE_SCHEME];

/// Status a campaign is created with, before its batch is populated.
pub const STATUS_DRAFT: &str = "draft";

/// Maximum length for a campaign name.
pub const MAX_CAMPAIGN_NAME_LENGTH: u64 = 120;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// How a campaign's citizen batch is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignType {
    /// Every eligible citizen in a state and/or district.
    Geography,
    /// Every citizen eligible for one scheme.
    Scheme,
}

impl CampaignType {
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s {
            TYPE_GEOGRAPHY => Ok(Self::Geography),
            TYPE_SCHEME => Ok(Self::Scheme),
            _ => Err(CoreError::Validation(format!(
                "Invalid campaign type '{s}'. Must be one of: {}",
                VALID_CAMPAIGN_TYPES.join(", ")
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Geography => TYPE_GEOGRAPHY,
            Self::Scheme => TYPE_SCHEME,
        }
    }
}

/// User input for a new campaign, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CampaignDraft {
    #[validate(length(min = 1, max = MAX_CAMPAIGN_NAME_LENGTH))]
    pub campaign_name: String,
    pub campaign_type: CampaignType,
    #[validate(length(min = 1))]
    pub target_state: Option<String>,
    #[validate(length(min = 1))]
    pub target_district: Option<String>,
    pub target_scheme_id: Option<DbId>,
}

impl CampaignDraft {
    /// Validate field lengths and that the target matches the campaign type.
    pub fn check(&self) -> Result<(), CoreError> {
        self.validate().map_err(validation_message)?;

        if self.campaign_name.trim().is_empty() {
            return Err(CoreError::Validation(
                "campaign_name must not be blank".to_string(),
            ));
        }

        match self.campaign_type {
            CampaignType::Geography => {
                if self.target_state.is_none() && self.target_district.is_none() {
                    return Err(CoreError::Validation(
                        "A geography campaign needs a target state or district".to_string(),
                    ));
                }
            }
            CampaignType::Scheme => {
                if self.target_scheme_id.is_none() {
                    return Err(CoreError::Validation(
                        "A scheme campaign needs a target scheme".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Generate a random, globally unique campaign id.
pub fn generate_campaign_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Group `(citizen_id, scheme_name)` pairs per citizen, in first-seen order.
pub fn group_schemes_by_citizen<I>(pairs: I) -> IndexMap<String, Vec<String>>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut grouped: IndexMap<String, Vec<String>> = IndexMap::new();
    for (citizen_id, scheme_name) in pairs {
        grouped.entry(citizen_id).or_default().push(scheme_name);
    }
    grouped
}

fn validation_message(errors: ValidationErrors) -> CoreError {
    let mut fields: Vec<String> = errors
        .field_errors()
        .keys()
        .map(|field| field.to_string())
        .collect();
    fields.sort();
    CoreError::Validation(format!("Invalid campaign fields: {}", fields.join(", ")))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn geography_draft() -> CampaignDraft {
        CampaignDraft {
            campaign_name: "Patna outreach".to_string(),
            campaign_type: CampaignType::Geography,
            target_state: Some("Bihar".to_string()),
            target_district: Some("Patna".to_string()),
            target_scheme_id: None,
        }
    }

    #[test]
    fn valid_geography_draft() {
        assert!(geography_draft().check().is_ok());
    }

    #[test]
    fn geography_needs_a_place() {
        let draft = CampaignDraft {
            target_state: None,
            target_district: None,
            ..geography_draft()
        };
        assert_matches!(draft.check(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn scheme_needs_a_scheme() {
        let draft = CampaignDraft {
            campaign_type: CampaignType::Scheme,
            ..geography_draft()
        };
        assert_matches!(draft.check(), Err(CoreError::Validation(_)));

        let draft = CampaignDraft {
            target_scheme_id: Some(4),
            ..draft
        };
        assert!(draft.check().is_ok());
    }

    #[test]
    fn name_length_is_enforced() {
        let draft = CampaignDraft {
            campaign_name: "x".repeat(MAX_CAMPAIGN_NAME_LENGTH as usize + 1),
            ..geography_draft()
        };
        assert_matches!(
            draft.check(),
            Err(CoreError::Validation(msg)) if msg.contains("campaign_name")
        );

        let blank = CampaignDraft {
            campaign_name: "   ".to_string(),
            ..geography_draft()
        };
        assert_matches!(blank.check(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = generate_campaign_id();
        let b = generate_campaign_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 36);
    }

    #[test]
    fn schemes_group_per_citizen() {
        let grouped = group_schemes_by_citizen(vec![
            ("C2".to_string(), "PM-KISAN".to_string()),
            ("C1".to_string(), "Ayushman".to_string()),
            ("C2".to_string(), "Ujjwala".to_string()),
        ]);
        let citizens: Vec<&str> = grouped.keys().map(String::as_str).collect();
        assert_eq!(citizens, vec!["C2", "C1"]);
        assert_eq!(grouped["C2"], vec!["PM-KISAN", "Ujjwala"]);
    }

    #[test]
    fn campaign_type_strings() {
        assert_eq!(
            CampaignType::from_str_value("scheme").unwrap(),
            CampaignType::Scheme
        );
        assert_eq!(CampaignType::Geography.as_str(), "geography");
        assert!(CampaignType::from_str_value("email").is_err());
    }
}
