//! Relationship Graph Store
//!
//! Builds a partnership's bipartite graph from the partner-side listing and
//! caches it on the partnership record. Loading is idempotent: a record whose
//! graph is already loaded is left untouched.

use crate::StaleReference;
use crate::gateway::{LocalUser, PartnerDepartment};
use crate::models::{PartnershipRecord, RelationshipEdge, RelationshipGraph};
use tracing::{debug, warn};

/// What happened while building a graph
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Edges placed into the graph
    pub edges_loaded: usize,

    /// Edges skipped because they name a local user that no longer exists
    pub stale: Vec<StaleReference>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.stale.is_empty()
    }
}

/// Build a graph with one set per local user from the partner-side listing
///
/// Edges naming an unknown local user are skipped and reported; they never
/// abort the load.
pub fn build_graph(
    local_users: &[LocalUser],
    departments: &[PartnerDepartment],
) -> (RelationshipGraph, LoadReport) {
    let mut graph = RelationshipGraph::for_users(local_users.iter().map(|u| u.id));
    let mut report = LoadReport::default();

    for department in departments {
        for partner_user in &department.users {
            for remote in &partner_user.relationships {
                match graph.user_mut(remote.id) {
                    Some(set) => {
                        set.insert(RelationshipEdge {
                            id: partner_user.id,
                            approved: remote.approved,
                            request: remote.request,
                        });
                        report.edges_loaded += 1;
                    }
                    None => {
                        let stale = StaleReference::UnknownLocalUser {
                            local_user: remote.id,
                            partner_user: partner_user.id,
                        };
                        warn!(
                            department = %department.id,
                            "Skipping relationship edge: {}",
                            stale
                        );
                        report.stale.push(stale);
                    }
                }
            }
        }
    }

    (graph, report)
}

/// Load the record's graph unless it is already loaded
///
/// Returns `None` when the graph was already cached. After a load, the
/// record's pending request count is recomputed from the loaded edges.
pub fn ensure_loaded(
    record: &mut PartnershipRecord,
    local_users: &[LocalUser],
    departments: &[PartnerDepartment],
) -> Option<LoadReport> {
    if record.relationships.is_loaded() {
        debug!(
            partnership_id = %record.partnership_id,
            "Relationship graph already loaded"
        );
        return None;
    }

    let (graph, report) = build_graph(local_users, departments);
    let pending = graph.pending_requests() as u32;
    if pending != record.pending_request_count {
        debug!(
            partnership_id = %record.partnership_id,
            reported = record.pending_request_count,
            loaded = pending,
            "Pending request count corrected from loaded graph"
        );
    }

    record.relationships = graph;
    record.pending_request_count = pending;

    debug!(
        partnership_id = %record.partnership_id,
        edges = report.edges_loaded,
        stale = report.stale.len(),
        "Relationship graph loaded"
    );
    Some(report)
}
