//! Per-scheme tallies behind the segments and intelligence views.
//!
//! - Segments: eligible citizens per scheme.
//! - Gaps: citizens evaluated but not eligible, per scheme.
//! - Outbound batches: eligible citizens per scheme, ready for outreach.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// Number of citizens counted against one scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SchemeTally {
    pub scheme_id: DbId,
    pub citizens: i64,
}

/// Count occurrences per scheme, ordered by `scheme_id`.
pub fn tally_by_scheme<I>(scheme_ids: I) -> Vec<SchemeTally>
where
    I: IntoIterator<Item = DbId>,
{
    let mut counts: BTreeMap<DbId, i64> = BTreeMap::new();
    for id in scheme_ids {
        *counts.entry(id).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(scheme_id, citizens)| SchemeTally {
            scheme_id,
            citizens,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    Ready,
}

/// Outbound batch readiness for one scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundBatch {
    pub scheme_id: DbId,
    pub target_citizens: i64,
    pub batch_status: BatchStatus,
}

/// Every scheme with eligible citizens yields a batch that is ready.
pub fn outbound_batches(eligible: &[SchemeTally]) -> Vec<OutboundBatch> {
    eligible
        .iter()
        .filter(|t| t.citizens > 0)
        .map(|t| OutboundBatch {
            scheme_id: t.scheme_id,
            target_citizens: t.citizens,
            batch_status: BatchStatus::Ready,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tallies_are_ordered_by_scheme() {
        let tallies = tally_by_scheme([3, 1, 3, 2, 3]);
        assert_eq!(
            tallies,
            vec![
                SchemeTally { scheme_id: 1, citizens: 1 },
                SchemeTally { scheme_id: 2, citizens: 1 },
                SchemeTally { scheme_id: 3, citizens: 3 },
            ]
        );
    }

    #[test]
    fn empty_tally() {
        assert!(tally_by_scheme(Vec::new()).is_empty());
    }

    #[test]
    fn batches_skip_empty_schemes() {
        let batches = outbound_batches(&[
            SchemeTally { scheme_id: 1, citizens: 4 },
            SchemeTally { scheme_id: 2, citizens: 0 },
        ]);
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].target_citizens, 4);
        assert_eq!(batches[0].batch_status, BatchStatus::Ready);
    }
}
