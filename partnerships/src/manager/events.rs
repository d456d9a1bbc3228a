//! Events pushed by the remote side
//!
//! Remote events always update the registry and counters. The operator
//! alert that goes with each one is gated by [`NotificationSettings`].
//!
//! [`NotificationSettings`]: crate::config::NotificationSettings

use super::PartnershipManager;
use crate::hooks::{Notification, NotificationEvent};
use crate::models::{
    EdgeState, LocalUserId, PartnerId, PartnerUserId, PartnershipId, PartnershipRecord,
    RelationshipEdge,
};
use crate::partnership::{PartnershipStatus, StatusEvent, Transition, transition};
use crate::{Result, StaleReference};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// A partner organization asked for a partnership
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnershipRequestEvent {
    pub partner_id: PartnerId,
    pub partnership_id: PartnershipId,
    pub partner_name: String,
    /// Administrator who sent the request
    pub admin_name: String,
}

/// A partner answered one of our partnership requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnershipResponseEvent {
    pub partner_id: PartnerId,
    pub approved: bool,
    pub admin_name: String,
}

/// A partner closed an approved partnership
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnershipClosureEvent {
    pub partner_id: PartnerId,
    pub admin_name: String,
}

/// One inbound relationship request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundRelationshipRequest {
    pub local_user: LocalUserId,
    pub partner_user: PartnerUserId,
}

/// A batch of relationship requests from a partner
///
/// `requests_count` is what the remote side counted; `requests` lists the
/// edges themselves and may be empty when the sender only reports a count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipRequestBatch {
    pub partner_id: PartnerId,
    pub requests_count: u32,
    #[serde(default)]
    pub requests: Vec<InboundRelationshipRequest>,
}

impl PartnershipManager {
    /// A partner asked for a partnership: add it as `pending_received`
    pub async fn receive_partnership_request(&mut self, event: PartnershipRequestEvent) -> Result<()> {
        let status = match transition(None, StatusEvent::RemoteRequest)? {
            Transition::Enter(status) => status,
            Transition::Remove => PartnershipStatus::PendingReceived,
        };
        self.registry.insert(PartnershipRecord::new(
            event.partner_id,
            event.partnership_id,
            event.partner_name.clone(),
            status,
        ))?;

        let delta = self.counters.partnership_request_received();
        self.badge(delta).await;
        info!(
            partner_id = %event.partner_id,
            partnership_id = %event.partnership_id,
            "Partnership request received"
        );

        if self.config.notifications.partnership_request {
            self.emit(Notification::alert(NotificationEvent::PartnershipRequestReceived {
                partner_id: event.partner_id,
                partnership_id: event.partnership_id,
                partner_name: event.partner_name,
                admin_name: event.admin_name,
            }))
            .await;
        }
        Ok(())
    }

    /// A partner approved or denied our pending request
    pub async fn receive_partnership_response(&mut self, event: PartnershipResponseEvent) -> Result<()> {
        let record = self
            .registry
            .find_by_partner(
                event.partner_id,
                &[PartnershipStatus::PendingSent, PartnershipStatus::PendingReceived],
            )
            .ok_or(StaleReference::UnknownPartner(event.partner_id))?;
        let id = record.partnership_id;
        let remote = if event.approved {
            StatusEvent::RemoteApprove
        } else {
            StatusEvent::RemoteDeny
        };
        let next = transition(Some(record.status), remote)?;

        self.apply_transition(id, next);
        info!(partner_id = %event.partner_id, partnership_id = %id, approved = event.approved, "Partnership response received");

        if self.config.notifications.partnership_response {
            self.emit(Notification::alert(NotificationEvent::PartnershipResponseReceived {
                partner_id: event.partner_id,
                partnership_id: id,
                approved: event.approved,
                admin_name: event.admin_name,
            }))
            .await;
        }
        Ok(())
    }

    /// A partner closed an approved partnership
    ///
    /// The record's graph and pending count are cleared and any session on
    /// it ends. The global counter is left as is.
    pub async fn receive_partnership_closure(&mut self, event: PartnershipClosureEvent) -> Result<()> {
        let record = self
            .registry
            .find_by_partner(event.partner_id, &[PartnershipStatus::Approved])
            .ok_or(StaleReference::UnknownPartner(event.partner_id))?;
        let id = record.partnership_id;
        let next = transition(Some(record.status), StatusEvent::RemoteClose)?;

        self.apply_transition(id, next);
        info!(partner_id = %event.partner_id, partnership_id = %id, "Partnership closed by partner");

        if self.config.notifications.partnership_closure {
            self.emit(Notification::alert(NotificationEvent::PartnershipClosureReceived {
                partner_id: event.partner_id,
                partnership_id: id,
                admin_name: event.admin_name,
            }))
            .await;
        }
        Ok(())
    }

    /// A partner sent relationship requests for our users
    ///
    /// On an unloaded graph only the reported count is added. On a loaded
    /// graph each listed request becomes a `request` edge and the count grows
    /// by the edges that were not already pending; a request for a pair that
    /// is already approved is ignored.
    ///
    /// A batch that counts more requests than it lists cannot be applied to
    /// a loaded graph, so the graph is dropped and fetched again on the next
    /// load. Under an edit session that reload waits until the session ends.
    /// The global counter always moves by what the partnership gained.
    pub async fn receive_relationship_request(&mut self, batch: RelationshipRequestBatch) -> Result<()> {
        let id = self
            .registry
            .find_by_partner(batch.partner_id, &[PartnershipStatus::Approved])
            .ok_or(StaleReference::UnknownPartner(batch.partner_id))?
            .partnership_id;
        let unlisted = batch
            .requests_count
            .saturating_sub(u32::try_from(batch.requests.len()).unwrap_or(u32::MAX));
        let editing = self.editing() == Some(id);

        let gained = if !self.registry.require(id)?.relationships.is_loaded() {
            self.registry.require_mut(id)?.increment_pending(batch.requests_count);
            batch.requests_count
        } else if unlisted > 0 && !editing {
            info!(partnership_id = %id, unlisted, "Relationship requests not listed, dropping loaded graph");
            self.invalidate_graph(id, batch.requests_count);
            batch.requests_count
        } else {
            let added = self.insert_requests(id, &batch.requests)?;
            if let Some(session) = self.session.as_mut().filter(|s| unlisted > 0 && s.partnership_id() == id) {
                info!(partnership_id = %id, unlisted, "Relationship requests not listed, reloading after the session");
                session.record_unlisted_requests(unlisted);
            }
            added.saturating_add(unlisted)
        };
        info!(
            partnership_id = %id,
            requests = batch.requests_count,
            gained,
            pending = self.registry.require(id)?.pending_request_count,
            "Relationship requests received"
        );

        let delta = self.counters.relationship_requests_received(gained);
        self.badge(delta).await;

        if self.config.notifications.relationship_request {
            self.emit(Notification::alert(NotificationEvent::RelationshipRequestReceived {
                partner_id: batch.partner_id,
                partnership_id: id,
                requests_count: batch.requests_count,
            }))
            .await;
        }
        Ok(())
    }

    /// Add listed requests to a loaded graph, returning how many became pending
    ///
    /// Requests on the partnership under edit are copied into the session
    /// snapshot so a cancel keeps them.
    fn insert_requests(&mut self, id: PartnershipId, requests: &[InboundRelationshipRequest]) -> Result<u32> {
        let mut session = self.session.as_mut().filter(|s| s.partnership_id() == id);
        let record = self.registry.require_mut(id)?;
        let mut added = 0u32;
        for request in requests {
            let Some(set) = record.relationships.user_mut(request.local_user) else {
                warn!(
                    partnership_id = %id,
                    "Skipping relationship request: {}",
                    StaleReference::UnknownLocalUser {
                        local_user: request.local_user,
                        partner_user: request.partner_user,
                    }
                );
                continue;
            };
            match EdgeState::from(set.get(request.partner_user)) {
                EdgeState::Approved => {
                    debug!(
                        partnership_id = %id,
                        local_user = %request.local_user,
                        partner_user = %request.partner_user,
                        "Ignoring request for an approved relationship"
                    );
                    continue;
                }
                EdgeState::Requested => {}
                EdgeState::Waiting | EdgeState::Unlinked => added += 1,
            }
            set.insert(RelationshipEdge::requested(request.partner_user));
            if let Some(session) = session.as_deref_mut() {
                session.record_request_received(request.local_user, request.partner_user);
            }
        }
        record.increment_pending(added);
        Ok(added)
    }
}
