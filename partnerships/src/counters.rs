//! Pending-request counters
//!
//! Three views of the same pending work are kept in step:
//!
//! - the global badge (partnership requests plus relationship requests),
//! - each partnership's `pending_request_count`,
//! - the per-user flag for the selected local user.
//!
//! Every mutation returns the signed delta to forward to the badge hooks.

use crate::models::{LocalUserId, PartnershipRecord};
use crate::partnership::{PartnershipRegistry, PartnershipStatus};
use serde::Serialize;
use tracing::{debug, warn};

/// Global pending counter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterAggregator {
    global: u32,
}

impl CounterAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn global(&self) -> u32 {
        self.global
    }

    /// Recompute the global count from a freshly loaded registry
    ///
    /// Every partnership request received and not yet answered counts once,
    /// plus every pending relationship request on approved partnerships.
    /// Returns the delta from the previous value.
    pub fn reset_from(&mut self, registry: &PartnershipRegistry) -> i64 {
        let total: u32 = registry
            .iter()
            .map(|record| match record.status {
                PartnershipStatus::PendingReceived => 1,
                PartnershipStatus::Approved => record.pending_request_count,
                _ => 0,
            })
            .fold(0u32, u32::saturating_add);

        let delta = i64::from(total) - i64::from(self.global);
        self.global = total;
        debug!(global = total, delta, "Global pending count recomputed");
        delta
    }

    /// A partner asked for a partnership
    pub fn partnership_request_received(&mut self) -> i64 {
        self.apply(1)
    }

    /// A received partnership request was approved, denied or withdrawn
    pub fn partnership_request_resolved(&mut self) -> i64 {
        self.apply(-1)
    }

    /// A batch of inbound relationship requests arrived
    pub fn relationship_requests_received(&mut self, count: u32) -> i64 {
        self.apply(i64::from(count))
    }

    /// One inbound relationship request was accepted or denied
    pub fn relationship_request_resolved(&mut self) -> i64 {
        self.apply(-1)
    }

    /// A partnership's reported count was replaced by a rescan of its graph
    pub fn pending_count_corrected(&mut self, reported: u32, rescanned: u32) -> i64 {
        self.apply(i64::from(rescanned) - i64::from(reported))
    }

    /// Apply a logical delta, saturating at zero and `u32::MAX`
    ///
    /// The returned delta is the logical one, so hooks tracking their own
    /// badge see the same sequence of changes as the remote side.
    fn apply(&mut self, delta: i64) -> i64 {
        let next = (i64::from(self.global) + delta).clamp(0, i64::from(u32::MAX));
        if next != i64::from(self.global) + delta {
            warn!(
                global = self.global,
                delta, "Global pending count saturated"
            );
        }
        self.global = next as u32;
        debug!(global = self.global, delta, "Global pending count updated");
        delta
    }
}

/// Snapshot of every pending counter for the current selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PendingSummary {
    /// Global badge value
    pub global: u32,

    /// Pending requests on the selected partnership, if any is selected
    pub partnership: Option<u32>,

    /// Whether the selected local user has an inbound request on it
    pub user_has_pending: bool,
}

impl PendingSummary {
    pub fn compute(
        counters: &CounterAggregator,
        record: Option<&PartnershipRecord>,
        selected_user: Option<LocalUserId>,
    ) -> Self {
        let user_has_pending = match (record, selected_user) {
            (Some(record), Some(user)) => record
                .relationships
                .user(user)
                .is_some_and(|set| set.has_pending_request()),
            _ => false,
        };

        Self {
            global: counters.global(),
            partnership: record.map(|r| r.pending_request_count),
            user_has_pending,
        }
    }
}
