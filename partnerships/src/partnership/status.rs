//! Partnership status state machine
//!
//! The lifecycle is a pure function over `(current status, event)`. A
//! partnership that does not exist yet has no status; a transition either
//! enters a status or removes the record from the registry.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a partnership
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartnershipStatus {
    /// The local organization asked the partner
    PendingSent,
    /// The partner asked the local organization
    PendingReceived,
    Approved,
    Denied,
    Closed,
}

impl PartnershipStatus {
    /// Pending in either direction
    pub fn is_pending(self) -> bool {
        matches!(self, Self::PendingSent | Self::PendingReceived)
    }

    /// Denied and closed partnerships can only be deleted
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Denied | Self::Closed)
    }

    /// Relationship edges can only be edited on approved partnerships
    pub fn allows_relationship_edits(self) -> bool {
        self == Self::Approved
    }

    /// The kind of removal the operator performs from this status
    pub fn removal_kind(self) -> RemovalKind {
        match self {
            Self::PendingSent => RemovalKind::CancelPartnership,
            Self::PendingReceived => RemovalKind::DenyPartnership,
            Self::Approved => RemovalKind::ClosePartnership,
            Self::Denied | Self::Closed => RemovalKind::DeletePartnership,
        }
    }
}

impl fmt::Display for PartnershipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PendingSent => write!(f, "pending_sent"),
            Self::PendingReceived => write!(f, "pending_received"),
            Self::Approved => write!(f, "approved"),
            Self::Denied => write!(f, "denied"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

impl FromStr for PartnershipStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending_sent" => Ok(Self::PendingSent),
            "pending_received" => Ok(Self::PendingReceived),
            "approved" => Ok(Self::Approved),
            "denied" => Ok(Self::Denied),
            "closed" => Ok(Self::Closed),
            _ => Err(format!("Invalid partnership status: {}", s)),
        }
    }
}

/// Semantic name of an operator-initiated removal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalKind {
    CancelPartnership,
    DenyPartnership,
    ClosePartnership,
    DeletePartnership,
}

impl fmt::Display for RemovalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CancelPartnership => "cancel_partnership",
            Self::DenyPartnership => "deny_partnership",
            Self::ClosePartnership => "close_partnership",
            Self::DeletePartnership => "delete_partnership",
        };
        f.write_str(name)
    }
}

/// Something that happens to a partnership
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusEvent {
    LocalRequest,
    RemoteRequest,
    LocalApprove,
    LocalDeny,
    RemoteApprove,
    RemoteDeny,
    LocalClose,
    RemoteClose,
    LocalCancel,
    LocalDelete,
}

impl fmt::Display for StatusEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::LocalRequest => "local_request",
            Self::RemoteRequest => "remote_request",
            Self::LocalApprove => "local_approve",
            Self::LocalDeny => "local_deny",
            Self::RemoteApprove => "remote_approve",
            Self::RemoteDeny => "remote_deny",
            Self::LocalClose => "local_close",
            Self::RemoteClose => "remote_close",
            Self::LocalCancel => "local_cancel",
            Self::LocalDelete => "local_delete",
        };
        f.write_str(name)
    }
}

/// Outcome of a legal transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The partnership moves to (or is created in) this status
    Enter(PartnershipStatus),
    /// The record leaves the registry
    Remove,
}

/// An event that is not legal from the current status
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid transition: {event} from {}", describe_origin(.from))]
pub struct TransitionError {
    pub from: Option<PartnershipStatus>,
    pub event: StatusEvent,
}

fn describe_origin(from: &Option<PartnershipStatus>) -> String {
    match from {
        Some(status) => status.to_string(),
        None => "no partnership".to_string(),
    }
}

/// Apply `event` to a partnership currently in `from` (`None` when it does not exist)
pub fn transition(
    from: Option<PartnershipStatus>,
    event: StatusEvent,
) -> Result<Transition, TransitionError> {
    use PartnershipStatus::*;
    use StatusEvent::*;

    let next = match (from, event) {
        (None, LocalRequest) => Transition::Enter(PendingSent),
        (None, RemoteRequest) => Transition::Enter(PendingReceived),
        (Some(PendingSent), RemoteApprove) => Transition::Enter(Approved),
        (Some(PendingSent), RemoteDeny) => Transition::Enter(Denied),
        (Some(PendingReceived), LocalApprove) => Transition::Enter(Approved),
        (Some(PendingReceived), LocalDeny) => Transition::Enter(Denied),
        (Some(Approved), LocalClose | RemoteClose) => Transition::Enter(Closed),
        (Some(PendingSent | PendingReceived), LocalCancel) => Transition::Remove,
        (Some(Denied | Closed), LocalDelete) => Transition::Remove,
        _ => return Err(TransitionError { from, event }),
    };

    Ok(next)
}
