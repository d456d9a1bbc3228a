//! Integration tests for the operator-driven partnership lifecycle
//!
//! These tests verify that:
//! 1. Loading replaces the registry and recomputes the global badge
//! 2. Requests, approvals and removals follow the status machine
//! 3. Gateway failures leave state untouched and are reported to hooks

mod common;

use common::*;
use partnerships::hooks::Operation;
use partnerships::prelude::*;
use std::sync::Arc;

#[tokio::test]
async fn test_load_populates_registry_and_badge() {
    let (manager, _gateway, hook) = loaded_manager().await;

    assert_eq!(manager.registry().len(), 4);
    // Globex request plus Acme's two relationship requests
    assert_eq!(manager.global_pending(), 3);
    assert_eq!(hook.badge(), 3);

    let acme = manager.partnership(ACME_PARTNERSHIP).unwrap();
    assert_eq!(acme.status, PartnershipStatus::Approved);
    assert_eq!(acme.pending_request_count, 2);
    assert!(!acme.relationships.is_loaded());
}

#[tokio::test]
async fn test_reload_resets_badge_by_delta() {
    let (mut manager, gateway, hook) = loaded_manager().await;

    gateway.partnerships.lock().unwrap().retain(|s| s.partner_id != GLOBEX);
    manager.load().await.unwrap();

    assert_eq!(manager.registry().len(), 3);
    assert_eq!(manager.global_pending(), 2);
    assert_eq!(hook.badge(), 2);
}

#[tokio::test]
async fn test_load_failure_is_reported() {
    let gateway = Arc::new(FakeGateway::seeded());
    let (mut manager, hook) = manager_with(gateway.clone()).await;
    gateway.fail_next(GatewayError::Unavailable("connection refused".to_string()));

    let err = manager.load().await.unwrap_err();
    assert!(matches!(err, PartnershipError::PersistenceFailure(_)));
    assert!(manager.registry().is_empty());

    let last = hook.last().unwrap();
    assert_eq!(last.level, NotifyLevel::Error);
    assert!(matches!(
        last.event,
        NotificationEvent::OperationFailed {
            operation: Operation::LoadPartnerships,
            ..
        }
    ));
}

#[tokio::test]
async fn test_request_partnership() {
    let (mut manager, gateway, hook) = loaded_manager().await;

    let id = manager.request_partnership(HOOLI, "Hooli").await.unwrap();
    assert_eq!(id, PartnershipId(1000));
    assert_eq!(
        manager.partnership(id).unwrap().status,
        PartnershipStatus::PendingSent
    );
    assert!(gateway.calls().contains(&"request_partnership".to_string()));

    let last = hook.last().unwrap();
    assert_eq!(last.level, NotifyLevel::Success);
    assert_eq!(
        last.event,
        NotificationEvent::PartnershipRequested {
            partner_id: HOOLI,
            partnership_id: id,
        }
    );
}

#[tokio::test]
async fn test_request_refused_for_live_partner() {
    let (mut manager, gateway, _hook) = loaded_manager().await;

    for partner in [ACME, GLOBEX, INITECH] {
        let err = manager.request_partnership(partner, "again").await.unwrap_err();
        assert!(matches!(err, PartnershipError::PartnerUnavailable(p) if p == partner));
    }
    assert!(!gateway.calls().contains(&"request_partnership".to_string()));

    // A closed partnership does not block a new one
    let id = manager.request_partnership(UMBRELLA, "Umbrella").await.unwrap();
    assert_ne!(id, UMBRELLA_PARTNERSHIP);
    assert_eq!(manager.registry().len(), 5);
}

#[tokio::test]
async fn test_approve_received_request() {
    let (mut manager, _gateway, hook) = loaded_manager().await;

    manager.approve(GLOBEX_PARTNERSHIP).await.unwrap();

    assert_eq!(
        manager.partnership(GLOBEX_PARTNERSHIP).unwrap().status,
        PartnershipStatus::Approved
    );
    assert_eq!(manager.global_pending(), 2);
    assert_eq!(hook.badge(), 2);
    assert!(matches!(
        hook.last().unwrap().event,
        NotificationEvent::PartnershipApproved { .. }
    ));
}

#[tokio::test]
async fn test_illegal_transition_skips_gateway() {
    let (mut manager, gateway, _hook) = loaded_manager().await;

    let err = manager.approve(ACME_PARTNERSHIP).await.unwrap_err();
    assert!(matches!(err, PartnershipError::InvalidTransition(_)));

    let err = manager.approve(INITECH_PARTNERSHIP).await.unwrap_err();
    assert!(matches!(err, PartnershipError::InvalidTransition(_)));

    let err = manager.delete(ACME_PARTNERSHIP).await.unwrap_err();
    assert!(matches!(err, PartnershipError::InvalidTransition(_)));

    assert_eq!(gateway.calls(), vec!["list_partnerships".to_string()]);
}

#[tokio::test]
async fn test_unknown_partnership() {
    let (mut manager, _gateway, _hook) = loaded_manager().await;

    let err = manager.close(PartnershipId(999)).await.unwrap_err();
    assert!(matches!(
        err,
        PartnershipError::StaleReference(StaleReference::UnknownPartnership(PartnershipId(999)))
    ));
}

#[tokio::test]
async fn test_end_partnership_picks_removal_by_status() {
    let (mut manager, gateway, hook) = loaded_manager().await;

    let kind = manager.end_partnership(INITECH_PARTNERSHIP).await.unwrap();
    assert_eq!(kind, RemovalKind::CancelPartnership);
    assert!(manager.partnership(INITECH_PARTNERSHIP).is_none());

    let kind = manager.end_partnership(GLOBEX_PARTNERSHIP).await.unwrap();
    assert_eq!(kind, RemovalKind::DenyPartnership);
    assert_eq!(
        manager.partnership(GLOBEX_PARTNERSHIP).unwrap().status,
        PartnershipStatus::Denied
    );
    assert_eq!(manager.global_pending(), 2);

    let kind = manager.end_partnership(UMBRELLA_PARTNERSHIP).await.unwrap();
    assert_eq!(kind, RemovalKind::DeletePartnership);
    assert!(manager.partnership(UMBRELLA_PARTNERSHIP).is_none());

    let kind = manager.end_partnership(GLOBEX_PARTNERSHIP).await.unwrap();
    assert_eq!(kind, RemovalKind::DeletePartnership);
    assert!(manager.partnership(GLOBEX_PARTNERSHIP).is_none());

    assert_eq!(
        gateway.calls()[1..],
        [
            "delete_partnership",
            "deny_partnership",
            "delete_partnership",
            "delete_partnership",
        ]
    );
    assert_eq!(
        hook.last().unwrap().event,
        NotificationEvent::PartnershipEnded {
            partner_id: GLOBEX,
            partnership_id: GLOBEX_PARTNERSHIP,
            removal: RemovalKind::DeletePartnership,
        }
    );
}

#[tokio::test]
async fn test_cancel_received_request_resolves_badge() {
    let (mut manager, _gateway, hook) = loaded_manager().await;

    manager.cancel_request(GLOBEX_PARTNERSHIP).await.unwrap();

    assert!(manager.partnership(GLOBEX_PARTNERSHIP).is_none());
    assert_eq!(manager.global_pending(), 2);
    assert_eq!(hook.badge(), 2);
}

#[tokio::test]
async fn test_close_clears_graph_and_session() {
    let (mut manager, gateway, _hook) = loaded_manager().await;
    manager.begin_edit(ACME_PARTNERSHIP).await.unwrap();
    manager.toggle_relationship(CARLA, PartnerUserId(7)).unwrap();

    let kind = manager.end_partnership(ACME_PARTNERSHIP).await.unwrap();
    assert_eq!(kind, RemovalKind::ClosePartnership);
    assert!(gateway.calls().contains(&"close_partnership".to_string()));

    let acme = manager.partnership(ACME_PARTNERSHIP).unwrap();
    assert_eq!(acme.status, PartnershipStatus::Closed);
    assert_eq!(acme.pending_request_count, 0);
    assert!(!acme.relationships.is_loaded());
    assert!(manager.departments(ACME_PARTNERSHIP).is_none());
    assert!(manager.editing().is_none());
    // The global badge is not touched by a closure
    assert_eq!(manager.global_pending(), 3);
}

#[tokio::test]
async fn test_gateway_failure_leaves_partnership_untouched() {
    let (mut manager, gateway, hook) = loaded_manager().await;
    gateway.fail_next(GatewayError::rejected(409, "partnership is locked"));

    let err = manager.close(ACME_PARTNERSHIP).await.unwrap_err();
    assert!(matches!(
        err,
        PartnershipError::PersistenceFailure(GatewayError::Rejected { status: Some(409), .. })
    ));
    assert_eq!(
        manager.partnership(ACME_PARTNERSHIP).unwrap().status,
        PartnershipStatus::Approved
    );

    let last = hook.last().unwrap();
    assert_eq!(last.level, NotifyLevel::Error);
    assert_eq!(
        last.event,
        NotificationEvent::OperationFailed {
            operation: Operation::EndPartnership(RemovalKind::ClosePartnership),
            reason: "Request rejected (409): partnership is locked".to_string(),
        }
    );
}

#[tokio::test]
async fn test_init_builds_manager_from_config() {
    let gateway = Arc::new(FakeGateway::seeded());
    let config = ConfigBuilder::testing().with_hook_timeout_ms(100).build().unwrap();

    let mut manager = partnerships::init(config, gateway, local_users()).unwrap();
    assert_eq!(manager.config().hooks.default_timeout_ms, 100);
    assert_eq!(manager.load().await.unwrap(), 4);
}
