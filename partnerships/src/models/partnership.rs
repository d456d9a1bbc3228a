//! Partnership records

use super::ids::{PartnerId, PartnershipId};
use super::relationship::RelationshipGraph;
use crate::partnership::status::PartnershipStatus;
use serde::{Deserialize, Serialize};

/// One partnership between the local organization and a partner organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnershipRecord {
    /// The partner organization
    pub id: PartnerId,

    /// The partnership itself; a partner can have several over time
    pub partnership_id: PartnershipId,

    pub name: String,

    pub status: PartnershipStatus,

    /// Inbound relationship requests across all local users
    pub pending_request_count: u32,

    /// Lazily loaded relationship graph
    #[serde(default)]
    pub relationships: RelationshipGraph,
}

impl PartnershipRecord {
    pub fn new(
        id: PartnerId,
        partnership_id: PartnershipId,
        name: impl Into<String>,
        status: PartnershipStatus,
    ) -> Self {
        Self {
            id,
            partnership_id,
            name: name.into(),
            status,
            pending_request_count: 0,
            relationships: RelationshipGraph::default(),
        }
    }

    /// Set the pending request count reported by a listing
    pub fn with_pending_requests(mut self, count: u32) -> Self {
        self.pending_request_count = count;
        self
    }

    /// Neither denied nor closed
    pub fn is_live(&self) -> bool {
        !self.status.is_terminal()
    }

    /// Whether the incremental counter agrees with a full rescan of the graph
    ///
    /// An unloaded graph carries the count reported by the remote side and
    /// is always considered consistent.
    pub fn pending_count_is_consistent(&self) -> bool {
        !self.relationships.is_loaded()
            || self.pending_request_count as usize == self.relationships.pending_requests()
    }

    pub(crate) fn increment_pending(&mut self, by: u32) {
        self.pending_request_count = self.pending_request_count.saturating_add(by);
    }

    pub(crate) fn decrement_pending(&mut self) {
        self.pending_request_count = self.pending_request_count.saturating_sub(1);
    }
}
