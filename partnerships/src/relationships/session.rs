//! Edit sessions
//!
//! An [`EditSession`] owns a structurally independent copy of a partnership's
//! graph taken when editing starts. Every edit goes to the live graph on the
//! partnership record; the snapshot is only consulted to compute the commit
//! diff, or handed back verbatim when the session is cancelled.
//!
//! Inbound requests that arrive or are resolved during the session are
//! mirrored into the snapshot, so they never show up in the diff and a
//! cancel does not undo them.

use super::diff::{UserRelationshipDiff, compute_diff};
use crate::gateway::PartnerDepartment;
use crate::models::{
    DepartmentId, LocalUserId, PartnerId, PartnerUserId, PartnershipId, PartnershipRecord,
    RelationshipEdge, RelationshipGraph,
};
use crate::{PartnershipError, Result, StaleReference};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Result of a single toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// A new edge was created
    Added { approved: bool },
    /// The existing edge was removed
    Removed { was_approved: bool },
    /// Inbound requests are only resolved through accept/deny
    IgnoredPendingRequest,
}

/// Check state of a partner department for the selected local user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionState {
    None,
    Partial,
    All,
}

/// The single open editing session
#[derive(Debug, Clone)]
pub struct EditSession {
    partnership_id: PartnershipId,
    partner_id: PartnerId,
    snapshot: RelationshipGraph,
    selected_user: Option<LocalUserId>,
    previously_approved: HashSet<(LocalUserId, PartnerUserId)>,
    departments: Vec<PartnerDepartment>,
    /// Requests the partner counted without listing them
    unlisted_requests: u32,
    started_at: DateTime<Utc>,
}

impl EditSession {
    /// Open a session on an approved partnership whose graph is loaded
    pub fn begin(record: &PartnershipRecord, departments: Vec<PartnerDepartment>) -> Result<Self> {
        if !record.status.allows_relationship_edits() {
            return Err(PartnershipError::NotEditable {
                partnership_id: record.partnership_id,
                status: record.status,
            });
        }
        if !record.relationships.is_loaded() {
            return Err(PartnershipError::NotLoaded(record.partnership_id));
        }

        debug!(
            partnership_id = %record.partnership_id,
            users = record.relationships.users().count(),
            "Edit session opened"
        );

        Ok(Self {
            partnership_id: record.partnership_id,
            partner_id: record.id,
            snapshot: record.relationships.clone(),
            selected_user: None,
            previously_approved: HashSet::new(),
            departments,
            unlisted_requests: 0,
            started_at: Utc::now(),
        })
    }

    pub fn partnership_id(&self) -> PartnershipId {
        self.partnership_id
    }

    pub fn partner_id(&self) -> PartnerId {
        self.partner_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn snapshot(&self) -> &RelationshipGraph {
        &self.snapshot
    }

    /// Partner departments shown during this session
    pub fn departments(&self) -> &[PartnerDepartment] {
        &self.departments
    }

    pub fn selected_user(&self) -> Option<LocalUserId> {
        self.selected_user
    }

    pub fn select_user(&mut self, live: &RelationshipGraph, user: LocalUserId) -> Result<()> {
        if live.user(user).is_none() {
            return Err(StaleReference::UnknownUser(user).into());
        }
        self.selected_user = Some(user);
        Ok(())
    }

    fn knows_partner_user(&self, partner_user: PartnerUserId) -> bool {
        self.departments
            .iter()
            .flat_map(|d| d.users.iter())
            .any(|u| u.id == partner_user)
    }

    /// Flip the edge between `user` and `partner_user` in the live graph
    pub fn toggle(
        &mut self,
        live: &mut RelationshipGraph,
        user: LocalUserId,
        partner_user: PartnerUserId,
    ) -> Result<ToggleOutcome> {
        let set = live
            .user_mut(user)
            .ok_or(StaleReference::UnknownUser(user))?;

        let outcome = match set.get(partner_user) {
            Some(edge) if edge.request => ToggleOutcome::IgnoredPendingRequest,
            Some(edge) => {
                let was_approved = edge.approved;
                if was_approved {
                    self.previously_approved.insert((user, partner_user));
                }
                set.remove(partner_user);
                ToggleOutcome::Removed { was_approved }
            }
            None => {
                if !self.knows_partner_user(partner_user) {
                    return Err(StaleReference::UnknownPartnerUser(partner_user).into());
                }
                let approved = self.previously_approved.contains(&(user, partner_user));
                set.insert(RelationshipEdge {
                    id: partner_user,
                    approved,
                    request: false,
                });
                ToggleOutcome::Added { approved }
            }
        };

        debug!(
            partnership_id = %self.partnership_id,
            user = %user,
            partner_user = %partner_user,
            ?outcome,
            "Relationship toggled"
        );
        Ok(outcome)
    }

    fn department_users(&self, department: DepartmentId) -> Result<Vec<PartnerUserId>> {
        self.departments
            .iter()
            .find(|d| d.id == department)
            .map(|d| d.users.iter().map(|u| u.id).collect())
            .ok_or_else(|| StaleReference::UnknownDepartment(department).into())
    }

    fn all_partner_users(&self) -> Vec<PartnerUserId> {
        self.departments
            .iter()
            .flat_map(|d| d.users.iter().map(|u| u.id))
            .collect()
    }

    /// Toggle every unlinked partner user in `targets` on, one at a time
    fn check_each(
        &mut self,
        live: &mut RelationshipGraph,
        user: LocalUserId,
        targets: Vec<PartnerUserId>,
    ) -> Result<usize> {
        let mut changed = 0;
        for partner_user in targets {
            if live.edge(user, partner_user).is_none() {
                self.toggle(live, user, partner_user)?;
                changed += 1;
            }
        }
        Ok(changed)
    }

    /// Toggle every linked, non-request partner user in `targets` off
    fn uncheck_each(
        &mut self,
        live: &mut RelationshipGraph,
        user: LocalUserId,
        targets: Vec<PartnerUserId>,
    ) -> Result<usize> {
        let mut changed = 0;
        for partner_user in targets {
            if live.edge(user, partner_user).is_some_and(|e| !e.request) {
                self.toggle(live, user, partner_user)?;
                changed += 1;
            }
        }
        Ok(changed)
    }

    /// Link `user` to every eligible partner user; returns the number toggled
    pub fn check_all(&mut self, live: &mut RelationshipGraph, user: LocalUserId) -> Result<usize> {
        let targets = self.all_partner_users();
        self.check_each(live, user, targets)
    }

    /// Unlink `user` from every eligible partner user; returns the number toggled
    pub fn uncheck_all(&mut self, live: &mut RelationshipGraph, user: LocalUserId) -> Result<usize> {
        let targets = self.all_partner_users();
        self.uncheck_each(live, user, targets)
    }

    pub fn check_department(
        &mut self,
        live: &mut RelationshipGraph,
        user: LocalUserId,
        department: DepartmentId,
    ) -> Result<usize> {
        let targets = self.department_users(department)?;
        self.check_each(live, user, targets)
    }

    pub fn uncheck_department(
        &mut self,
        live: &mut RelationshipGraph,
        user: LocalUserId,
        department: DepartmentId,
    ) -> Result<usize> {
        let targets = self.department_users(department)?;
        self.uncheck_each(live, user, targets)
    }

    /// How many of a department's eligible partner users `user` is linked to
    pub fn department_selection(
        &self,
        live: &RelationshipGraph,
        user: LocalUserId,
        department: DepartmentId,
    ) -> Result<SelectionState> {
        let mut eligible = 0;
        let mut linked = 0;
        for partner_user in self.department_users(department)? {
            match live.edge(user, partner_user) {
                Some(edge) if edge.request => {}
                Some(_) => {
                    eligible += 1;
                    linked += 1;
                }
                None => eligible += 1,
            }
        }

        Ok(match linked {
            0 => SelectionState::None,
            n if n >= eligible => SelectionState::All,
            _ => SelectionState::Partial,
        })
    }

    /// Mirror an accepted inbound request into the snapshot
    pub fn record_request_accepted(&mut self, user: LocalUserId, partner_user: PartnerUserId) {
        if let Some(edge) = self
            .snapshot
            .user_mut(user)
            .and_then(|set| set.get_mut(partner_user))
        {
            edge.accept();
        }
    }

    /// Mirror a denied inbound request into the snapshot
    pub fn record_request_denied(&mut self, user: LocalUserId, partner_user: PartnerUserId) {
        if let Some(set) = self.snapshot.user_mut(user) {
            set.remove(partner_user);
        }
    }

    /// Mirror an inbound request that arrived mid-session into the snapshot
    pub fn record_request_received(&mut self, user: LocalUserId, partner_user: PartnerUserId) {
        if let Some(set) = self.snapshot.user_mut(user) {
            set.insert(RelationshipEdge::requested(partner_user));
        }
    }

    /// Note requests that arrived as a bare count while the session is open
    ///
    /// Neither graph can show them, so the partnership has to be reloaded
    /// once the session ends.
    pub fn record_unlisted_requests(&mut self, count: u32) {
        self.unlisted_requests = self.unlisted_requests.saturating_add(count);
    }

    pub fn unlisted_requests(&self) -> u32 {
        self.unlisted_requests
    }

    /// Per-user changes between the snapshot and `live`
    pub fn diff(&self, live: &RelationshipGraph) -> Vec<UserRelationshipDiff> {
        compute_diff(&self.snapshot, live)
    }

    /// End the session, handing back the snapshot to restore
    pub fn into_snapshot(self) -> RelationshipGraph {
        self.snapshot
    }
}
