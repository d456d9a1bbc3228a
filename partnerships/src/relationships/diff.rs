//! Relationship diffs
//!
//! Diffing compares edge membership by partner-user id, so the order in
//! which edges were toggled during a session never shows up in the result.

use crate::models::{LocalUserId, PartnerUserId, RelationshipGraph};
use serde::{Deserialize, Serialize};

/// Edge changes for one local user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRelationshipDiff {
    #[serde(rename = "id")]
    pub user_id: LocalUserId,
    pub added: Vec<PartnerUserId>,
    pub removed: Vec<PartnerUserId>,
}

impl UserRelationshipDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Compute the per-user changes from `snapshot` to `live`
///
/// Only local users present in the snapshot are considered, and only users
/// with at least one added or removed edge are returned.
pub fn compute_diff(snapshot: &RelationshipGraph, live: &RelationshipGraph) -> Vec<UserRelationshipDiff> {
    snapshot
        .users()
        .filter_map(|previous| {
            let current = live.user(previous.user_id);

            let added = current
                .map(|set| {
                    set.partner_users()
                        .filter(|id| !previous.contains(*id))
                        .collect()
                })
                .unwrap_or_default();

            let removed = previous
                .partner_users()
                .filter(|id| !current.is_some_and(|set| set.contains(*id)))
                .collect();

            let diff = UserRelationshipDiff {
                user_id: previous.user_id,
                added,
                removed,
            };
            (!diff.is_empty()).then_some(diff)
        })
        .collect()
}
