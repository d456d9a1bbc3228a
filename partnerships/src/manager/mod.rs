//! Partnership manager
//!
//! [`PartnershipManager`] is the single entry point of the engine. It owns
//! the registry, the (at most one) open edit session and the global counter,
//! and it is the only place that talks to the gateway and the hooks.
//!
//! Operations take `&mut self` and run to completion, so remote events and
//! operator edits are applied one at a time in the order the host delivers
//! them.
//!
//! - `lifecycle.rs`: loading, requesting and ending partnerships
//! - `events.rs`: events pushed by the remote side
//! - `editing.rs`: edit sessions, request resolution, commit and cancel

mod editing;
mod events;
mod lifecycle;

pub use editing::CommitOutcome;
pub use events::{
    InboundRelationshipRequest, PartnershipClosureEvent, PartnershipRequestEvent,
    PartnershipResponseEvent, RelationshipRequestBatch,
};

use crate::config::PartnershipsConfig;
use crate::counters::{CounterAggregator, PendingSummary};
use crate::gateway::{GatewayError, LocalUser, PartnerDepartment, PartnerGateway};
use crate::hooks::{HookRegistry, Notification, Operation};
use crate::logging::LogGuard;
use crate::models::{EdgeState, LocalUserId, PartnerUserId, PartnershipId, PartnershipRecord};
use crate::partnership::PartnershipRegistry;
use crate::relationships::EditSession;
use crate::{PartnershipError, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Owner of every partnership, the edit session and the pending counters
#[derive(Debug)]
pub struct PartnershipManager {
    config: PartnershipsConfig,
    gateway: Arc<dyn PartnerGateway>,
    hooks: HookRegistry,
    registry: PartnershipRegistry,
    counters: CounterAggregator,
    session: Option<EditSession>,
    local_users: Vec<LocalUser>,
    /// Partner departments fetched alongside each loaded graph
    departments: HashMap<PartnershipId, Vec<PartnerDepartment>>,
    _log_guard: LogGuard,
}

impl PartnershipManager {
    pub fn new(
        config: PartnershipsConfig,
        gateway: Arc<dyn PartnerGateway>,
        local_users: Vec<LocalUser>,
    ) -> Self {
        let hooks = HookRegistry::with_default_timeout_ms(config.hooks.default_timeout_ms);
        Self {
            config,
            gateway,
            hooks,
            registry: PartnershipRegistry::new(),
            counters: CounterAggregator::new(),
            session: None,
            local_users,
            departments: HashMap::new(),
            _log_guard: LogGuard::default(),
        }
    }

    /// Use an existing hook registry (it may be shared with other components)
    pub fn with_hooks(mut self, hooks: HookRegistry) -> Self {
        self.hooks = hooks;
        self
    }

    pub(crate) fn with_log_guard(mut self, guard: LogGuard) -> Self {
        self._log_guard = guard;
        self
    }

    pub fn config(&self) -> &PartnershipsConfig {
        &self.config
    }

    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    pub fn registry(&self) -> &PartnershipRegistry {
        &self.registry
    }

    pub fn local_users(&self) -> &[LocalUser] {
        &self.local_users
    }

    pub fn global_pending(&self) -> u32 {
        self.counters.global()
    }

    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    /// Partnership currently under edit
    pub fn editing(&self) -> Option<PartnershipId> {
        self.session.as_ref().map(EditSession::partnership_id)
    }

    pub fn partnership(&self, id: PartnershipId) -> Option<&PartnershipRecord> {
        self.registry.get(id)
    }

    /// Partner departments cached with a loaded graph
    pub fn departments(&self, id: PartnershipId) -> Option<&[PartnerDepartment]> {
        self.departments.get(&id).map(Vec::as_slice)
    }

    /// Counters for the partnership under edit and its selected user
    pub fn pending_summary(&self) -> PendingSummary {
        let record = self
            .session
            .as_ref()
            .and_then(|s| self.registry.get(s.partnership_id()));
        let selected = self.session.as_ref().and_then(EditSession::selected_user);
        PendingSummary::compute(&self.counters, record, selected)
    }

    /// How a local/partner user pair currently relates on a partnership
    pub fn edge_state(
        &self,
        id: PartnershipId,
        local_user: LocalUserId,
        partner_user: PartnerUserId,
    ) -> Result<EdgeState> {
        let record = self.registry.require(id)?;
        if !record.relationships.is_loaded() {
            return Err(PartnershipError::NotLoaded(id));
        }
        Ok(record.relationships.edge_state(local_user, partner_user))
    }

    async fn emit(&self, notification: Notification) {
        self.hooks.notify(&notification).await;
    }

    async fn badge(&self, delta: i64) {
        self.hooks.update_badge(delta).await;
    }

    /// Report a gateway failure to the hooks and hand it back as an error
    async fn gateway_failure(&self, operation: Operation, err: GatewayError) -> PartnershipError {
        warn!(%operation, error = %err, "Gateway operation failed");
        self.emit(Notification::failure(operation, &err)).await;
        PartnershipError::PersistenceFailure(err)
    }

    /// Drop the session if it is open on `id`, returning whether it was
    fn end_session_on(&mut self, id: PartnershipId) -> bool {
        if self.editing() == Some(id) {
            self.session = None;
            true
        } else {
            false
        }
    }

    /// Drop a loaded graph so the next load fetches the listing again
    ///
    /// `unlisted` is added to the partnership count first; the rescan on
    /// reload settles any difference with the global counter.
    fn invalidate_graph(&mut self, id: PartnershipId, unlisted: u32) {
        if let Some(record) = self.registry.get_mut(id) {
            record.relationships.clear();
            record.increment_pending(unlisted);
            debug!(partnership_id = %id, pending = record.pending_request_count, "Relationship graph dropped");
        }
        self.departments.remove(&id);
    }

    /// Split borrow of the open session and the record it edits
    fn session_parts(&mut self) -> Result<(&mut EditSession, &mut PartnershipRecord)> {
        let session = self.session.as_mut().ok_or(PartnershipError::NoActiveSession)?;
        let record = self.registry.require_mut(session.partnership_id())?;
        Ok((session, record))
    }
}
