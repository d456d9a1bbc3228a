//! Semantic notifications sent to hooks
//!
//! Notifications carry what happened and the ids involved, never
//! presentation text; hooks decide how (and whether) to show them.

use crate::models::{LocalUserId, PartnerId, PartnerUserId, PartnershipId};
use crate::partnership::RemovalKind;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyLevel {
    /// A local operation completed
    Success,
    /// A local operation failed at the gateway
    Error,
    /// Nothing to do
    Info,
    /// A remote organization did something the operator should see
    Alert,
}

/// A gateway-backed operation that can fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    LoadPartnerships,
    LoadRelationships,
    RequestPartnership,
    ApprovePartnership,
    EndPartnership(RemovalKind),
    SaveRelationships,
    RespondToRelationshipRequest,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::LoadPartnerships => write!(f, "load_partnerships"),
            Operation::LoadRelationships => write!(f, "load_relationships"),
            Operation::RequestPartnership => write!(f, "request_partnership"),
            Operation::ApprovePartnership => write!(f, "approve_partnership"),
            Operation::EndPartnership(kind) => write!(f, "{}", kind),
            Operation::SaveRelationships => write!(f, "save_relationships"),
            Operation::RespondToRelationshipRequest => write!(f, "respond_to_relationship_request"),
        }
    }
}

/// What a notification is about
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NotificationEvent {
    PartnershipRequested {
        partner_id: PartnerId,
        partnership_id: PartnershipId,
    },
    PartnershipApproved {
        partner_id: PartnerId,
        partnership_id: PartnershipId,
    },
    /// A local deny, cancel, close or delete went through
    PartnershipEnded {
        partner_id: PartnerId,
        partnership_id: PartnershipId,
        removal: RemovalKind,
    },
    RelationshipsSaved {
        partnership_id: PartnershipId,
        users_changed: usize,
    },
    NoChanges {
        partnership_id: PartnershipId,
    },
    RelationshipRequestResolved {
        partnership_id: PartnershipId,
        local_user: LocalUserId,
        partner_user: PartnerUserId,
        accepted: bool,
    },
    OperationFailed {
        operation: Operation,
        reason: String,
    },
    PartnershipRequestReceived {
        partner_id: PartnerId,
        partnership_id: PartnershipId,
        partner_name: String,
        admin_name: String,
    },
    PartnershipResponseReceived {
        partner_id: PartnerId,
        partnership_id: PartnershipId,
        approved: bool,
        admin_name: String,
    },
    PartnershipClosureReceived {
        partner_id: PartnerId,
        partnership_id: PartnershipId,
        admin_name: String,
    },
    RelationshipRequestReceived {
        partner_id: PartnerId,
        partnership_id: PartnershipId,
        requests_count: u32,
    },
}

/// A notification as delivered to hooks
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotifyLevel,
    #[serde(flatten)]
    pub event: NotificationEvent,
    pub at: DateTime<Utc>,
}

impl Notification {
    pub fn new(level: NotifyLevel, event: NotificationEvent) -> Self {
        Self {
            level,
            event,
            at: Utc::now(),
        }
    }

    pub fn success(event: NotificationEvent) -> Self {
        Self::new(NotifyLevel::Success, event)
    }

    pub fn info(event: NotificationEvent) -> Self {
        Self::new(NotifyLevel::Info, event)
    }

    pub fn alert(event: NotificationEvent) -> Self {
        Self::new(NotifyLevel::Alert, event)
    }

    /// An error-level notification for a failed gateway operation
    pub fn failure(operation: Operation, reason: impl fmt::Display) -> Self {
        Self::new(
            NotifyLevel::Error,
            NotificationEvent::OperationFailed {
                operation,
                reason: reason.to_string(),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_flat_with_kind_tag() {
        let notification = Notification::alert(NotificationEvent::RelationshipRequestReceived {
            partner_id: PartnerId(3),
            partnership_id: PartnershipId(30),
            requests_count: 2,
        });
        let json = serde_json::to_value(&notification).unwrap();
        assert_eq!(json["level"], "alert");
        assert_eq!(json["kind"], "relationship_request_received");
        assert_eq!(json["requests_count"], 2);
        assert!(json["at"].is_string());
    }

    #[test]
    fn test_failure_names_operation() {
        let notification = Notification::failure(
            Operation::EndPartnership(RemovalKind::ClosePartnership),
            "boom",
        );
        assert_eq!(notification.level, NotifyLevel::Error);
        match notification.event {
            NotificationEvent::OperationFailed { operation, reason } => {
                assert_eq!(operation.to_string(), "close_partnership");
                assert_eq!(reason, "boom");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
