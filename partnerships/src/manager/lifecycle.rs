//! Operator-driven partnership lifecycle

use super::PartnershipManager;
use crate::hooks::{Notification, NotificationEvent, Operation};
use crate::models::{PartnerId, PartnershipId, PartnershipRecord};
use crate::partnership::{PartnershipStatus, RemovalKind, StatusEvent, Transition, transition};
use crate::{PartnershipError, Result};
use tracing::{debug, info};

impl PartnershipManager {
    /// Replace the registry with the gateway's partnership listing
    ///
    /// Any open session is dropped and every graph returns to unloaded.
    /// Returns the number of partnerships loaded.
    pub async fn load(&mut self) -> Result<usize> {
        let summaries = match self.gateway.list_partnerships().await {
            Ok(summaries) => summaries,
            Err(err) => return Err(self.gateway_failure(Operation::LoadPartnerships, err).await),
        };

        if let Some(session) = self.session.take() {
            info!(
                partnership_id = %session.partnership_id(),
                "Edit session discarded by registry reload"
            );
        }
        self.departments.clear();
        self.registry
            .set(summaries.into_iter().map(PartnershipRecord::from));

        let delta = self.counters.reset_from(&self.registry);
        self.badge(delta).await;

        info!(
            count = self.registry.len(),
            global_pending = self.counters.global(),
            "Partnerships loaded"
        );
        Ok(self.registry.len())
    }

    /// Ask `partner` for a partnership
    ///
    /// Refused locally when the partner already has a live partnership.
    pub async fn request_partnership(
        &mut self,
        partner: PartnerId,
        name: impl Into<String>,
    ) -> Result<PartnershipId> {
        if !self.registry.is_available(partner) {
            return Err(PartnershipError::PartnerUnavailable(partner));
        }
        let status = match transition(None, StatusEvent::LocalRequest)? {
            Transition::Enter(status) => status,
            Transition::Remove => PartnershipStatus::PendingSent,
        };

        let partnership_id = match self.gateway.request_partnership(partner).await {
            Ok(id) => id,
            Err(err) => return Err(self.gateway_failure(Operation::RequestPartnership, err).await),
        };

        self.registry
            .insert(PartnershipRecord::new(partner, partnership_id, name, status))?;
        info!(partner_id = %partner, partnership_id = %partnership_id, "Partnership requested");

        self.emit(Notification::success(NotificationEvent::PartnershipRequested {
            partner_id: partner,
            partnership_id,
        }))
        .await;
        Ok(partnership_id)
    }

    /// Approve a partnership request received from the partner
    pub async fn approve(&mut self, id: PartnershipId) -> Result<()> {
        let record = self.registry.require(id)?;
        let partner = record.id;
        let next = transition(Some(record.status), StatusEvent::LocalApprove)?;

        if let Err(err) = self.gateway.accept_partnership(id).await {
            return Err(self.gateway_failure(Operation::ApprovePartnership, err).await);
        }

        self.apply_transition(id, next);
        let delta = self.counters.partnership_request_resolved();
        self.badge(delta).await;

        self.emit(Notification::success(NotificationEvent::PartnershipApproved {
            partner_id: partner,
            partnership_id: id,
        }))
        .await;
        Ok(())
    }

    /// Deny a partnership request received from the partner
    ///
    /// The record stays in the registry as `denied` until deleted.
    pub async fn deny(&mut self, id: PartnershipId) -> Result<()> {
        let record = self.registry.require(id)?;
        let next = transition(Some(record.status), StatusEvent::LocalDeny)?;
        self.end_partnership_with(id, next, RemovalKind::DenyPartnership)
            .await
    }

    /// Withdraw a pending partnership, in either direction
    pub async fn cancel_request(&mut self, id: PartnershipId) -> Result<()> {
        let record = self.registry.require(id)?;
        let next = transition(Some(record.status), StatusEvent::LocalCancel)?;
        self.end_partnership_with(id, next, RemovalKind::CancelPartnership)
            .await
    }

    /// Close an approved partnership
    pub async fn close(&mut self, id: PartnershipId) -> Result<()> {
        let record = self.registry.require(id)?;
        let next = transition(Some(record.status), StatusEvent::LocalClose)?;
        self.end_partnership_with(id, next, RemovalKind::ClosePartnership)
            .await
    }

    /// Delete a denied or closed partnership
    pub async fn delete(&mut self, id: PartnershipId) -> Result<()> {
        let record = self.registry.require(id)?;
        let next = transition(Some(record.status), StatusEvent::LocalDelete)?;
        self.end_partnership_with(id, next, RemovalKind::DeletePartnership)
            .await
    }

    /// Perform whichever removal the partnership's status calls for
    pub async fn end_partnership(&mut self, id: PartnershipId) -> Result<RemovalKind> {
        let kind = self.registry.require(id)?.status.removal_kind();
        match kind {
            RemovalKind::CancelPartnership => self.cancel_request(id).await?,
            RemovalKind::DenyPartnership => self.deny(id).await?,
            RemovalKind::ClosePartnership => self.close(id).await?,
            RemovalKind::DeletePartnership => self.delete(id).await?,
        }
        Ok(kind)
    }

    async fn end_partnership_with(
        &mut self,
        id: PartnershipId,
        next: Transition,
        kind: RemovalKind,
    ) -> Result<()> {
        let record = self.registry.require(id)?;
        let partner = record.id;
        let was_received = record.status == PartnershipStatus::PendingReceived;

        let outcome = match kind {
            RemovalKind::DenyPartnership => self.gateway.deny_partnership(id).await,
            RemovalKind::ClosePartnership => self.gateway.close_partnership(id).await,
            RemovalKind::CancelPartnership | RemovalKind::DeletePartnership => {
                self.gateway.delete_partnership(id).await
            }
        };
        if let Err(err) = outcome {
            return Err(self.gateway_failure(Operation::EndPartnership(kind), err).await);
        }

        self.apply_transition(id, next);
        if was_received {
            let delta = self.counters.partnership_request_resolved();
            self.badge(delta).await;
        }

        self.emit(Notification::success(NotificationEvent::PartnershipEnded {
            partner_id: partner,
            partnership_id: id,
            removal: kind,
        }))
        .await;
        Ok(())
    }

    /// Apply a legal transition to the registry
    ///
    /// Leaving `approved` drops the graph and its pending count together with
    /// any session open on the partnership.
    pub(super) fn apply_transition(&mut self, id: PartnershipId, next: Transition) {
        match next {
            Transition::Enter(status) => {
                if let Some(record) = self.registry.get_mut(id) {
                    let previous = record.status;
                    record.status = status;
                    if previous == PartnershipStatus::Approved && status != previous {
                        record.relationships.clear();
                        record.pending_request_count = 0;
                        self.departments.remove(&id);
                        if self.end_session_on(id) {
                            info!(partnership_id = %id, "Edit session ended with partnership");
                        }
                    }
                    debug!(partnership_id = %id, from = %previous, to = %status, "Partnership status changed");
                }
            }
            Transition::Remove => {
                self.registry.remove(id);
                self.departments.remove(&id);
                if self.end_session_on(id) {
                    info!(partnership_id = %id, "Edit session ended with partnership");
                }
            }
        }
    }
}
