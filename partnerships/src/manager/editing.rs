//! Edit sessions on the manager
//!
//! Toggles only touch the live graph held by the registry. Commit sends the
//! per-user diff against the session snapshot; cancel puts the snapshot back.

use super::PartnershipManager;
use crate::counters::PendingSummary;
use crate::hooks::{Notification, NotificationEvent, Operation};
use crate::models::{DepartmentId, LocalUserId, PartnerUserId, PartnershipId};
use crate::relationships::{
    EditSession, LoadReport, SelectionState, ToggleOutcome, ensure_loaded,
};
use crate::{PartnershipError, Result, StaleReference};
use tracing::{debug, info, warn};

/// Result of committing an edit session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Nothing differed from the snapshot; the session stays open
    NoChanges,
    /// The diff was persisted and the session closed
    Saved { users_changed: usize },
}

impl PartnershipManager {
    /// Load a partnership's graph from the partner listing unless already loaded
    ///
    /// Returns `None` when the graph was cached. Edges naming unknown local
    /// users are skipped and listed in the report.
    pub async fn ensure_loaded(&mut self, id: PartnershipId) -> Result<Option<LoadReport>> {
        let record = self.registry.require(id)?;
        if record.relationships.is_loaded() && self.departments.contains_key(&id) {
            return Ok(None);
        }
        let partner = record.id;

        let departments = match self.gateway.fetch_partner_users(partner).await {
            Ok(departments) => departments,
            Err(err) => return Err(self.gateway_failure(Operation::LoadRelationships, err).await),
        };

        let record = self.registry.require_mut(id)?;
        let reported = record.pending_request_count;
        let report = ensure_loaded(record, &self.local_users, &departments);
        let rescanned = record.pending_request_count;
        self.departments.insert(id, departments);

        if report.is_some() && reported != rescanned {
            let delta = self.counters.pending_count_corrected(reported, rescanned);
            self.badge(delta).await;
        }
        Ok(report)
    }

    /// Open an edit session on an approved partnership, loading its graph first
    ///
    /// An open session on the same partnership is an error. One on another
    /// partnership is cancelled first when the configuration allows it.
    pub async fn begin_edit(&mut self, id: PartnershipId) -> Result<Option<LoadReport>> {
        if let Some(open) = self.editing() {
            if open == id {
                return Err(PartnershipError::SessionAlreadyActive(id));
            }
            if !self.config.session.implicit_cancel_on_switch {
                return Err(PartnershipError::SessionConflict {
                    open,
                    requested: id,
                });
            }
        }

        let record = self.registry.require(id)?;
        if !record.status.allows_relationship_edits() {
            return Err(PartnershipError::NotEditable {
                partnership_id: id,
                status: record.status,
            });
        }

        let report = self.ensure_loaded(id).await?;

        if let Some(open) = self.editing() {
            info!(partnership_id = %open, next = %id, "Cancelling stale edit session");
            self.cancel_edit()?;
        }

        let departments = self.departments.get(&id).cloned().unwrap_or_default();
        let record = self.registry.require(id)?;
        self.session = Some(EditSession::begin(record, departments)?);
        info!(partnership_id = %id, "Edit session started");
        Ok(report)
    }

    /// Restore the snapshot and close the session
    ///
    /// A graph that missed unlisted requests during the session is dropped
    /// so the next load fetches it again.
    pub fn cancel_edit(&mut self) -> Result<()> {
        let session = self.session.take().ok_or(PartnershipError::NoActiveSession)?;
        let id = session.partnership_id();
        let unlisted = session.unlisted_requests();
        match self.registry.get_mut(id) {
            Some(record) => {
                record.relationships = session.into_snapshot();
                record.pending_request_count = record.relationships.pending_requests() as u32;
            }
            None => warn!(partnership_id = %id, "Cancelled session had no partnership left to restore"),
        }
        if unlisted > 0 {
            self.invalidate_graph(id, unlisted);
        }
        info!(partnership_id = %id, "Edit session cancelled");
        Ok(())
    }

    /// Select the local user whose relationships are being edited
    pub fn select_user(&mut self, user: LocalUserId) -> Result<PendingSummary> {
        let (session, record) = self.session_parts()?;
        session.select_user(&record.relationships, user)?;
        Ok(self.pending_summary())
    }

    pub fn toggle_relationship(
        &mut self,
        user: LocalUserId,
        partner_user: PartnerUserId,
    ) -> Result<ToggleOutcome> {
        let (session, record) = self.session_parts()?;
        session.toggle(&mut record.relationships, user, partner_user)
    }

    /// Link `user` to every eligible partner user
    pub fn check_all(&mut self, user: LocalUserId) -> Result<usize> {
        let (session, record) = self.session_parts()?;
        session.check_all(&mut record.relationships, user)
    }

    /// Unlink `user` from every partner user except pending requests
    pub fn uncheck_all(&mut self, user: LocalUserId) -> Result<usize> {
        let (session, record) = self.session_parts()?;
        session.uncheck_all(&mut record.relationships, user)
    }

    pub fn check_department(&mut self, user: LocalUserId, department: DepartmentId) -> Result<usize> {
        let (session, record) = self.session_parts()?;
        session.check_department(&mut record.relationships, user, department)
    }

    pub fn uncheck_department(&mut self, user: LocalUserId, department: DepartmentId) -> Result<usize> {
        let (session, record) = self.session_parts()?;
        session.uncheck_department(&mut record.relationships, user, department)
    }

    pub fn department_selection(
        &self,
        user: LocalUserId,
        department: DepartmentId,
    ) -> Result<SelectionState> {
        let session = self.session.as_ref().ok_or(PartnershipError::NoActiveSession)?;
        let record = self.registry.require(session.partnership_id())?;
        session.department_selection(&record.relationships, user, department)
    }

    /// Accept an inbound relationship request on the partnership under edit
    pub async fn accept_request(&mut self, user: LocalUserId, partner_user: PartnerUserId) -> Result<()> {
        self.resolve_request(user, partner_user, true).await
    }

    /// Deny an inbound relationship request on the partnership under edit
    pub async fn deny_request(&mut self, user: LocalUserId, partner_user: PartnerUserId) -> Result<()> {
        self.resolve_request(user, partner_user, false).await
    }

    async fn resolve_request(
        &mut self,
        user: LocalUserId,
        partner_user: PartnerUserId,
        accept: bool,
    ) -> Result<()> {
        let (_, record) = self.session_parts()?;
        let id = record.partnership_id;
        if !record
            .relationships
            .edge(user, partner_user)
            .is_some_and(|edge| edge.request)
        {
            return Err(StaleReference::UnknownEdge {
                local_user: user,
                partner_user,
            }
            .into());
        }

        if let Err(err) = self
            .gateway
            .respond_to_relationship_request(user, partner_user, accept)
            .await
        {
            return Err(self
                .gateway_failure(Operation::RespondToRelationshipRequest, err)
                .await);
        }

        let (session, record) = self.session_parts()?;
        if let Some(set) = record.relationships.user_mut(user) {
            if accept {
                if let Some(edge) = set.get_mut(partner_user) {
                    edge.accept();
                }
            } else {
                set.remove(partner_user);
            }
        }
        record.decrement_pending();
        if accept {
            session.record_request_accepted(user, partner_user);
        } else {
            session.record_request_denied(user, partner_user);
        }
        debug!(
            partnership_id = %id,
            user = %user,
            partner_user = %partner_user,
            accept,
            pending = record.pending_request_count,
            "Relationship request resolved"
        );

        let delta = self.counters.relationship_request_resolved();
        self.badge(delta).await;
        self.emit(Notification::success(NotificationEvent::RelationshipRequestResolved {
            partnership_id: id,
            local_user: user,
            partner_user,
            accepted: accept,
        }))
        .await;
        Ok(())
    }

    /// Persist the session's changes
    ///
    /// An empty diff makes no gateway call and keeps the session open. On a
    /// gateway failure the session and live graph are kept so the operator
    /// can retry. A saved session that missed unlisted requests drops the
    /// graph like [`cancel_edit`](Self::cancel_edit) does.
    pub async fn commit(&mut self) -> Result<CommitOutcome> {
        let session = self.session.as_ref().ok_or(PartnershipError::NoActiveSession)?;
        let id = session.partnership_id();
        let partner = session.partner_id();
        let unlisted = session.unlisted_requests();
        let record = self.registry.require(id)?;
        let diff = session.diff(&record.relationships);

        if diff.is_empty() {
            debug!(partnership_id = %id, "Commit with no changes");
            self.emit(Notification::info(NotificationEvent::NoChanges { partnership_id: id }))
                .await;
            return Ok(CommitOutcome::NoChanges);
        }

        if let Err(err) = self.gateway.persist_relationship_diff(partner, &diff).await {
            return Err(self.gateway_failure(Operation::SaveRelationships, err).await);
        }

        self.session = None;
        if unlisted > 0 {
            self.invalidate_graph(id, unlisted);
        }
        let users_changed = diff.len();
        info!(partnership_id = %id, users_changed, "Relationships saved");
        self.emit(Notification::success(NotificationEvent::RelationshipsSaved {
            partnership_id: id,
            users_changed,
        }))
        .await;
        Ok(CommitOutcome::Saved { users_changed })
    }
}
