//! Shared fixtures: an in-memory gateway and a hook that records everything

#![allow(dead_code)]

use async_trait::async_trait;
use partnerships::config::ConfigBuilder;
use partnerships::prelude::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering::SeqCst};
use std::sync::{Arc, Mutex};

pub const ACME: PartnerId = PartnerId(100);
pub const ACME_PARTNERSHIP: PartnershipId = PartnershipId(10);
pub const GLOBEX: PartnerId = PartnerId(200);
pub const GLOBEX_PARTNERSHIP: PartnershipId = PartnershipId(20);
pub const INITECH: PartnerId = PartnerId(300);
pub const INITECH_PARTNERSHIP: PartnershipId = PartnershipId(30);
pub const UMBRELLA: PartnerId = PartnerId(400);
pub const UMBRELLA_PARTNERSHIP: PartnershipId = PartnershipId(40);
pub const HOOLI: PartnerId = PartnerId(500);
pub const HOOLI_PARTNERSHIP: PartnershipId = PartnershipId(50);

pub const ALICE: LocalUserId = LocalUserId(1);
pub const BRUNO: LocalUserId = LocalUserId(2);
pub const CARLA: LocalUserId = LocalUserId(3);

pub const SALES: DepartmentId = DepartmentId(1);
pub const SUPPORT: DepartmentId = DepartmentId(2);

/// Gateway fake backed by plain collections
#[derive(Debug, Default)]
pub struct FakeGateway {
    pub partnerships: Mutex<Vec<PartnershipSummary>>,
    pub departments: Mutex<HashMap<PartnerId, Vec<PartnerDepartment>>>,
    pub persisted: Mutex<Vec<(PartnerId, Vec<UserRelationshipDiff>)>>,
    pub responses: Mutex<Vec<(LocalUserId, PartnerUserId, bool)>>,
    pub calls: Mutex<Vec<String>>,
    fail_next: Mutex<Option<GatewayError>>,
    next_id: AtomicU64,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1000),
            ..Default::default()
        }
    }

    /// Acme is approved with a loaded listing; Globex asked us; we asked
    /// Initech; Umbrella is closed.
    pub fn seeded() -> Self {
        let gateway = Self::new();
        *gateway.partnerships.lock().unwrap() = vec![
            summary(ACME, ACME_PARTNERSHIP, "Acme", PartnershipStatus::Approved, 2),
            summary(GLOBEX, GLOBEX_PARTNERSHIP, "Globex", PartnershipStatus::PendingReceived, 0),
            summary(INITECH, INITECH_PARTNERSHIP, "Initech", PartnershipStatus::PendingSent, 0),
            summary(UMBRELLA, UMBRELLA_PARTNERSHIP, "Umbrella", PartnershipStatus::Closed, 0),
        ];
        gateway
            .departments
            .lock()
            .unwrap()
            .insert(ACME, acme_departments());
        gateway
    }

    /// Make the next gateway call fail with `err`
    pub fn fail_next(&self, err: GatewayError) {
        *self.fail_next.lock().unwrap() = Some(err);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn persisted(&self) -> Vec<(PartnerId, Vec<UserRelationshipDiff>)> {
        self.persisted.lock().unwrap().clone()
    }

    fn call(&self, name: &str) -> std::result::Result<(), GatewayError> {
        self.calls.lock().unwrap().push(name.to_string());
        match self.fail_next.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PartnerGateway for FakeGateway {
    async fn list_partnerships(&self) -> std::result::Result<Vec<PartnershipSummary>, GatewayError> {
        self.call("list_partnerships")?;
        Ok(self.partnerships.lock().unwrap().clone())
    }

    async fn fetch_partner_users(
        &self,
        partner: PartnerId,
    ) -> std::result::Result<Vec<PartnerDepartment>, GatewayError> {
        self.call("fetch_partner_users")?;
        Ok(self
            .departments
            .lock()
            .unwrap()
            .get(&partner)
            .cloned()
            .unwrap_or_default())
    }

    async fn persist_relationship_diff(
        &self,
        partner: PartnerId,
        diff: &[UserRelationshipDiff],
    ) -> std::result::Result<(), GatewayError> {
        self.call("persist_relationship_diff")?;
        self.persisted.lock().unwrap().push((partner, diff.to_vec()));
        Ok(())
    }

    async fn respond_to_relationship_request(
        &self,
        local_user: LocalUserId,
        external_user: PartnerUserId,
        accept: bool,
    ) -> std::result::Result<(), GatewayError> {
        self.call("respond_to_relationship_request")?;
        self.responses
            .lock()
            .unwrap()
            .push((local_user, external_user, accept));
        Ok(())
    }

    async fn request_partnership(&self, _partner: PartnerId) -> std::result::Result<PartnershipId, GatewayError> {
        self.call("request_partnership")?;
        Ok(PartnershipId(self.next_id.fetch_add(1, SeqCst)))
    }

    async fn accept_partnership(&self, _partnership: PartnershipId) -> std::result::Result<(), GatewayError> {
        self.call("accept_partnership")
    }

    async fn deny_partnership(&self, _partnership: PartnershipId) -> std::result::Result<(), GatewayError> {
        self.call("deny_partnership")
    }

    async fn close_partnership(&self, _partnership: PartnershipId) -> std::result::Result<(), GatewayError> {
        self.call("close_partnership")
    }

    async fn delete_partnership(&self, _partnership: PartnershipId) -> std::result::Result<(), GatewayError> {
        self.call("delete_partnership")
    }
}

/// Hook that keeps every notification and the running badge total
#[derive(Debug, Default)]
pub struct RecordingHook {
    pub notifications: Mutex<Vec<Notification>>,
    pub badge: AtomicI64,
}

impl RecordingHook {
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<Notification> {
        self.notifications.lock().unwrap().last().cloned()
    }

    pub fn levels(&self) -> Vec<NotifyLevel> {
        self.notifications().iter().map(|n| n.level).collect()
    }

    pub fn badge(&self) -> i64 {
        self.badge.load(SeqCst)
    }

    pub fn clear(&self) {
        self.notifications.lock().unwrap().clear();
    }
}

#[async_trait]
impl NotificationHook for RecordingHook {
    async fn on_notify(&self, notification: &Notification) {
        self.notifications.lock().unwrap().push(notification.clone());
    }

    async fn on_badge_update(&self, delta: i64) {
        self.badge.fetch_add(delta, SeqCst);
    }

    fn name(&self) -> &str {
        "recording"
    }
}

pub fn summary(
    partner: PartnerId,
    partnership: PartnershipId,
    name: &str,
    status: PartnershipStatus,
    pending: u32,
) -> PartnershipSummary {
    PartnershipSummary {
        partner_id: partner,
        partnership_id: partnership,
        name: name.to_string(),
        status,
        pending_requests: pending,
    }
}

fn partner_user(id: u64, name: &str, relationships: Vec<RemoteEdge>) -> PartnerUser {
    PartnerUser {
        id: PartnerUserId(id),
        name: name.to_string(),
        relationships,
    }
}

fn edge(local: LocalUserId, approved: bool, request: bool) -> RemoteEdge {
    RemoteEdge {
        id: local,
        approved,
        request,
    }
}

/// Sales: 7 (approved with Alice), 8 (requests Bruno).
/// Support: 9 (requests Alice), 11 (points at a local user that is gone).
pub fn acme_departments() -> Vec<PartnerDepartment> {
    vec![
        PartnerDepartment {
            id: SALES,
            name: "Sales".to_string(),
            users: vec![
                partner_user(7, "Davi", vec![edge(ALICE, true, false)]),
                partner_user(8, "Elis", vec![edge(BRUNO, false, true)]),
            ],
        },
        PartnerDepartment {
            id: SUPPORT,
            name: "Support".to_string(),
            users: vec![
                partner_user(9, "Fabio", vec![edge(ALICE, false, true)]),
                partner_user(11, "Gil", vec![edge(LocalUserId(99), true, false)]),
            ],
        },
    ]
}

pub fn local_users() -> Vec<LocalUser> {
    vec![
        LocalUser::new(ALICE, "Alice"),
        LocalUser::new(BRUNO, "Bruno"),
        LocalUser::new(CARLA, "Carla"),
    ]
}

/// A manager over `gateway` with every alert enabled and a recording hook
pub async fn manager_with(gateway: Arc<FakeGateway>) -> (PartnershipManager, Arc<RecordingHook>) {
    let config = ConfigBuilder::new().with_hook_timeout_ms(250).build().unwrap();
    manager_with_config(gateway, config).await
}

pub async fn manager_with_config(
    gateway: Arc<FakeGateway>,
    config: PartnershipsConfig,
) -> (PartnershipManager, Arc<RecordingHook>) {
    let manager = PartnershipManager::new(config, gateway, local_users());
    let hook = Arc::new(RecordingHook::default());
    manager.hooks().register(hook.clone()).await;
    (manager, hook)
}

/// A seeded, loaded manager
pub async fn loaded_manager() -> (PartnershipManager, Arc<FakeGateway>, Arc<RecordingHook>) {
    let gateway = Arc::new(FakeGateway::seeded());
    let (mut manager, hook) = manager_with(gateway.clone()).await;
    manager.load().await.unwrap();
    (manager, gateway, hook)
}

/// Every loaded graph agrees with its incremental pending count
pub fn assert_counts_consistent(manager: &PartnershipManager) {
    for record in manager.registry().iter() {
        assert!(
            record.pending_count_is_consistent(),
            "partnership {} has count {} but {} request edges",
            record.partnership_id,
            record.pending_request_count,
            record.relationships.pending_requests()
        );
    }
}

impl FakeGateway {
    /// List a new inbound request from `partner_user` to `local` on the partner side
    pub fn add_listed_request(&self, partner: PartnerId, partner_user: PartnerUserId, local: LocalUserId) {
        let mut departments = self.departments.lock().unwrap();
        let user = departments
            .get_mut(&partner)
            .into_iter()
            .flatten()
            .flat_map(|department| department.users.iter_mut())
            .find(|user| user.id == partner_user)
            .expect("partner user is listed");
        user.relationships.push(edge(local, false, true));
    }
}
