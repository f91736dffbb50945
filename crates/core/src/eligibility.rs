//! Rule explanation aggregation.
//!
//! The backend returns one flat [`EvaluationRow`] per (scheme, rule) for a
//! citizen, already sorted by `scheme_code` then `rule_key`. The console
//! regroups those rows into one [`SchemeEligibility`] per scheme and derives
//! the pass/fail verdict. Rule evaluation itself never happens here.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// One (citizen, scheme, rule) fact as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct EvaluationRow {
    pub scheme_id: DbId,
    pub scheme_code: String,
    pub scheme_name: String,
    pub rule_key: String,
    pub rule_label: String,
    pub citizen_value: Option<String>,
    pub scheme_value: Option<String>,
    pub is_rule_satisfied: bool,
}

/// A single rule outcome inside a scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub rule_key: String,
    pub rule_label: String,
    pub citizen_value: Option<String>,
    pub scheme_value: Option<String>,
    pub is_rule_satisfied: bool,
}

/// All rule outcomes for one scheme plus the derived verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeEligibility {
    pub scheme_id: DbId,
    pub scheme_code: String,
    pub scheme_name: String,
    pub rules: Vec<RuleOutcome>,
    #[serde(rename = "isEligible")]
    pub is_eligible: bool,
}

impl SchemeEligibility {
    pub fn failed_rules(&self) -> impl Iterator<Item = &RuleOutcome> {
        self.rules.iter().filter(|r| !r.is_rule_satisfied)
    }
}

/// A scheme's verdict: eligible iff every rule is satisfied, so a scheme
/// with no rules is eligible.
pub fn scheme_verdict(rules: &[RuleOutcome]) -> bool {
    rules.iter().all(|r| r.is_rule_satisfied)
}

/// Group flat rows by `scheme_id` and derive each scheme's verdict.
///
/// Schemes appear in first-seen order and rules keep their input order;
/// nothing is re-sorted. A scheme is eligible iff all of its rules are
/// satisfied. No rows yields an empty collection.
pub fn aggregate_rule_explanations<I>(rows: I) -> Vec<SchemeEligibility>
where
    I: IntoIterator<Item = EvaluationRow>,
{
    let mut grouped: IndexMap<DbId, SchemeEligibility> = IndexMap::new();

    for row in rows {
        let scheme = grouped
            .entry(row.scheme_id)
            .or_insert_with(|| SchemeEligibility {
                scheme_id: row.scheme_id,
                scheme_code: row.scheme_code.clone(),
                scheme_name: row.scheme_name.clone(),
                rules: Vec::new(),
                is_eligible: true,
            });

        scheme.rules.push(RuleOutcome {
            rule_key: row.rule_key,
            rule_label: row.rule_label,
            citizen_value: row.citizen_value,
            scheme_value: row.scheme_value,
            is_rule_satisfied: row.is_rule_satisfied,
        });
    }

    grouped
        .into_values()
        .map(|mut scheme| {
            scheme.is_eligible = scheme_verdict(&scheme.rules);
            scheme
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Eligibility view toggle
// ---------------------------------------------------------------------------

pub const VIEW_ALL: &str = "all";
pub const VIEW_ELIGIBLE: &str = "eligible";
pub const VIEW_NOT_ELIGIBLE: &str = "not_eligible";

/// All valid view strings.
pub const VALID_VIEWS: &[&str] = &[VIEW_ALL, VIEW_ELIGIBLE, VIEW_NOT_ELIGIBLE];

/// The All / Eligible / Not eligible toggle on the eligibility page.
///
/// Applied to the citizen summary list it selects citizens with at least
/// one (or no) eligible scheme; applied to an aggregated collection it
/// selects schemes by verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityView {
    #[default]
    All,
    Eligible,
    NotEligible,
}

impl EligibilityView {
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s {
            VIEW_ALL => Ok(Self::All),
            VIEW_ELIGIBLE => Ok(Self::Eligible),
            VIEW_NOT_ELIGIBLE => Ok(Self::NotEligible),
            _ => Err(CoreError::Validation(format!(
                "Invalid eligibility view '{s}'. Must be one of: {}",
                VALID_VIEWS.join(", ")
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => VIEW_ALL,
            Self::Eligible => VIEW_ELIGIBLE,
            Self::NotEligible => VIEW_NOT_ELIGIBLE,
        }
    }

    /// Whether a scheme verdict is visible under this view.
    pub fn includes_scheme(&self, scheme: &SchemeEligibility) -> bool {
        match self {
            Self::All => true,
            Self::Eligible => scheme.is_eligible,
            Self::NotEligible => !scheme.is_eligible,
        }
    }

    /// Whether a citizen with `eligible_scheme_count` is listed under this view.
    pub fn includes_count(&self, eligible_scheme_count: i64) -> bool {
        match self {
            Self::All => true,
            Self::Eligible => eligible_scheme_count > 0,
            Self::NotEligible => eligible_scheme_count == 0,
        }
    }

    /// Whether a scheme's rule breakdown starts expanded.
    pub fn default_expanded(&self, scheme: &SchemeEligibility) -> bool {
        scheme.is_eligible && *self != Self::NotEligible
    }

    /// Borrow the schemes visible under this view, preserving order.
    pub fn filter<'a>(&self, schemes: &'a [SchemeEligibility]) -> Vec<&'a SchemeEligibility> {
        schemes.iter().filter(|s| self.includes_scheme(s)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(scheme_id: DbId, rule_key: &str, satisfied: bool) -> EvaluationRow {
        EvaluationRow {
            scheme_id,
            scheme_code: format!("SCH-{scheme_id:03}"),
            scheme_name: format!("Scheme {scheme_id}"),
            rule_key: rule_key.to_string(),
            rule_label: rule_key.to_uppercase(),
            citizen_value: Some("x".to_string()),
            scheme_value: None,
            is_rule_satisfied: satisfied,
        }
    }

    #[test]
    fn two_schemes_one_failed_rule() {
        let schemes = aggregate_rule_explanations(vec![
            row(1, "age", true),
            row(1, "income", false),
            row(2, "age", true),
        ]);

        assert_eq!(schemes.len(), 2);
        assert_eq!(schemes[0].scheme_id, 1);
        assert!(!schemes[0].is_eligible);
        assert_eq!(schemes[0].rules.len(), 2);
        assert_eq!(schemes[0].failed_rules().count(), 1);
        assert_eq!(schemes[1].scheme_id, 2);
        assert!(schemes[1].is_eligible);
    }

    #[test]
    fn empty_input_yields_empty_collection() {
        assert!(aggregate_rule_explanations(Vec::new()).is_empty());
    }

    #[test]
    fn first_seen_scheme_order_is_kept() {
        let schemes = aggregate_rule_explanations(vec![
            row(9, "a", true),
            row(3, "a", true),
            row(9, "b", true),
            row(5, "a", false),
        ]);
        let ids: Vec<DbId> = schemes.iter().map(|s| s.scheme_id).collect();
        assert_eq!(ids, vec![9, 3, 5]);

        let keys: Vec<&str> = schemes[0].rules.iter().map(|r| r.rule_key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn aggregation_is_deterministic() {
        let input = vec![
            row(2, "gender", false),
            row(1, "age", true),
            row(2, "state", true),
        ];
        assert_eq!(
            aggregate_rule_explanations(input.clone()),
            aggregate_rule_explanations(input)
        );
    }

    #[test]
    fn verdict_is_and_of_rules() {
        let patterns: &[&[bool]] = &[
            &[true],
            &[false],
            &[true, true, true],
            &[true, false, true],
            &[false, false],
        ];
        for pattern in patterns {
            let rows = pattern
                .iter()
                .enumerate()
                .map(|(i, s)| row(7, &format!("r{i}"), *s));
            let schemes = aggregate_rule_explanations(rows);
            assert_eq!(schemes.len(), 1);
            assert_eq!(schemes[0].is_eligible, pattern.iter().all(|s| *s));
        }
    }

    #[test]
    fn verdict_requires_every_rule() {
        assert!(scheme_verdict(&[]));

        let schemes =
            aggregate_rule_explanations(vec![row(1, "age", true), row(1, "income", false)]);
        assert!(!scheme_verdict(&schemes[0].rules));
        assert!(scheme_verdict(&schemes[0].rules[..1]));
        assert_eq!(schemes[0].is_eligible, scheme_verdict(&schemes[0].rules));
    }

    #[test]
    fn serializes_verdict_as_is_eligible() {
        let schemes = aggregate_rule_explanations(vec![row(1, "age", true)]);
        let json = serde_json::to_value(&schemes[0]).unwrap();
        assert_eq!(json["isEligible"], true);
        assert_eq!(json["rules"][0]["rule_key"], "age");
    }

    // -- EligibilityView -----------------------------------------------------

    #[test]
    fn view_round_trips_through_strings() {
        for view in [
            EligibilityView::All,
            EligibilityView::Eligible,
            EligibilityView::NotEligible,
        ] {
            assert_eq!(EligibilityView::from_str_value(view.as_str()).unwrap(), view);
        }
        assert!(EligibilityView::from_str_value("maybe").is_err());
    }

    #[test]
    fn view_filters_schemes_and_counts() {
        let schemes = aggregate_rule_explanations(vec![
            row(1, "age", false),
            row(2, "age", true),
        ]);
        assert_eq!(EligibilityView::All.filter(&schemes).len(), 2);
        assert_eq!(EligibilityView::Eligible.filter(&schemes)[0].scheme_id, 2);
        assert_eq!(EligibilityView::NotEligible.filter(&schemes)[0].scheme_id, 1);

        assert!(EligibilityView::Eligible.includes_count(3));
        assert!(!EligibilityView::Eligible.includes_count(0));
        assert!(EligibilityView::NotEligible.includes_count(0));
    }

    #[test]
    fn only_eligible_schemes_start_expanded() {
        let schemes = aggregate_rule_explanations(vec![
            row(1, "age", false),
            row(2, "age", true),
        ]);
        assert!(!EligibilityView::All.default_expanded(&schemes[0]));
        assert!(EligibilityView::All.default_expanded(&schemes[1]));
        assert!(!EligibilityView::NotEligible.default_expanded(&schemes[1]));
    }
}
