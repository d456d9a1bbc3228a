//! # Partnerships
//!
//! Relationship reconciliation engine for inter-organization partnerships.
//!
//! A partnership moves through a small lifecycle (requested, approved,
//! denied, closed). Once approved, it carries a bipartite graph linking
//! local users to partner-side users. An operator edits that graph inside
//! an edit session. Committing persists only the edges that were added or
//! removed, and cancelling restores the graph exactly as it was.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use partnerships::prelude::*;
//! use std::sync::Arc;
//!
//! # #[derive(Debug)] struct MyGateway;
//! # #[async_trait::async_trait]
//! # impl PartnerGateway for MyGateway {
//! #     async fn list_partnerships(&self) -> std::result::Result<Vec<PartnershipSummary>, GatewayError> { Ok(vec![]) }
//! #     async fn fetch_partner_users(&self, _: PartnerId) -> std::result::Result<Vec<PartnerDepartment>, GatewayError> { Ok(vec![]) }
//! #     async fn persist_relationship_diff(&self, _: PartnerId, _: &[UserRelationshipDiff]) -> std::result::Result<(), GatewayError> { Ok(()) }
//! #     async fn respond_to_relationship_request(&self, _: LocalUserId, _: PartnerUserId, _: bool) -> std::result::Result<(), GatewayError> { Ok(()) }
//! #     async fn request_partnership(&self, _: PartnerId) -> std::result::Result<PartnershipId, GatewayError> { Ok(PartnershipId(1)) }
//! #     async fn accept_partnership(&self, _: PartnershipId) -> std::result::Result<(), GatewayError> { Ok(()) }
//! #     async fn deny_partnership(&self, _: PartnershipId) -> std::result::Result<(), GatewayError> { Ok(()) }
//! #     async fn close_partnership(&self, _: PartnershipId) -> std::result::Result<(), GatewayError> { Ok(()) }
//! #     async fn delete_partnership(&self, _: PartnershipId) -> std::result::Result<(), GatewayError> { Ok(()) }
//! # }
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ConfigBuilder::production().build()?;
//!     let local_users = vec![LocalUser::new(1, "Alice")];
//!     let mut manager = init(config, Arc::new(MyGateway), local_users)?;
//!
//!     manager.load().await?;
//!     manager.begin_edit(PartnershipId(10)).await?;
//!     manager.toggle_relationship(LocalUserId(1), PartnerUserId(7))?;
//!     manager.commit().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod counters;
pub mod gateway;
pub mod hooks;
pub mod logging;
pub mod manager;
pub mod models;
pub mod partnership;
pub mod relationships;

/// The prelude re-exports commonly used types for convenience
pub mod prelude {
    pub use crate::init;

    pub use crate::config::{
        ConfigBuilder, ConfigLoader, LogFormat, LogLevel, NotificationSettings, PartnershipsConfig,
    };

    pub use crate::counters::PendingSummary;

    pub use crate::gateway::{
        GatewayError, LocalUser, PartnerDepartment, PartnerGateway, PartnerUser,
        PartnershipSummary, RemoteEdge,
    };

    pub use crate::hooks::{
        HookRegistry, Notification, NotificationEvent, NotificationHook, NotifyLevel,
    };

    pub use crate::manager::{
        CommitOutcome, PartnershipManager, PartnershipRequestEvent, PartnershipResponseEvent,
        RelationshipRequestBatch,
    };

    pub use crate::models::{
        DepartmentId, EdgeState, LocalUserId, PartnerId, PartnerUserId, PartnershipId,
        PartnershipRecord, RelationshipEdge,
    };

    pub use crate::partnership::{PartnershipStatus, RemovalKind};

    pub use crate::relationships::{SelectionState, ToggleOutcome, UserRelationshipDiff};

    pub use crate::{PartnershipError, Result, StaleReference};
}

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

use models::{DepartmentId, LocalUserId, PartnerId, PartnerUserId, PartnershipId};
use partnership::PartnershipStatus;

/// An identifier that no longer resolves to anything
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StaleReference {
    #[error("unknown partnership {0}")]
    UnknownPartnership(PartnershipId),

    /// No partnership in the expected status exists for this partner
    #[error("no matching partnership for partner {0}")]
    UnknownPartner(PartnerId),

    /// A partner-side edge pointing at a local user that does not exist
    #[error("edge from partner user {partner_user} names unknown local user {local_user}")]
    UnknownLocalUser {
        local_user: LocalUserId,
        partner_user: PartnerUserId,
    },

    #[error("unknown local user {0}")]
    UnknownUser(LocalUserId),

    #[error("unknown partner user {0}")]
    UnknownPartnerUser(PartnerUserId),

    #[error("no relationship between local user {local_user} and partner user {partner_user}")]
    UnknownEdge {
        local_user: LocalUserId,
        partner_user: PartnerUserId,
    },

    #[error("unknown department {0}")]
    UnknownDepartment(DepartmentId),
}

/// Error type for partnership operations
#[derive(Debug, thiserror::Error)]
pub enum PartnershipError {
    /// The lifecycle does not allow this event from the current status
    #[error(transparent)]
    InvalidTransition(#[from] partnership::TransitionError),

    /// An edit session is already open on this partnership
    #[error("An edit session is already active for partnership {0}")]
    SessionAlreadyActive(PartnershipId),

    /// Another partnership is being edited and implicit cancel is disabled
    #[error("Partnership {open} is being edited; cancel or commit it before editing {requested}")]
    SessionConflict {
        open: PartnershipId,
        requested: PartnershipId,
    },

    #[error("Stale reference: {0}")]
    StaleReference(#[from] StaleReference),

    /// The gateway refused or could not perform the operation
    #[error("Persistence failed: {0}")]
    PersistenceFailure(#[from] gateway::GatewayError),

    #[error("No edit session is active")]
    NoActiveSession,

    #[error("Relationships of partnership {0} are not loaded")]
    NotLoaded(PartnershipId),

    #[error("Relationships of partnership {partnership_id} cannot be edited while it is {status}")]
    NotEditable {
        partnership_id: PartnershipId,
        status: PartnershipStatus,
    },

    /// The partner already has a pending or approved partnership
    #[error("Partner {0} already has a live partnership")]
    PartnerUnavailable(PartnerId),

    #[error("Partnership {0} already exists")]
    DuplicatePartnership(PartnershipId),

    #[error("Configuration error: {0}")]
    Configuration(#[from] config::ConfigError),

    #[error("Logging error: {0}")]
    Logging(#[from] logging::LogError),
}

/// Result type for partnership operations
pub type Result<T> = std::result::Result<T, PartnershipError>;

/// Build a manager from `config`, installing logging and a hook registry
/// with the configured default timeout.
///
/// Logging is left alone when the host application already installed a
/// subscriber.
pub fn init(
    config: config::PartnershipsConfig,
    gateway: std::sync::Arc<dyn gateway::PartnerGateway>,
    local_users: Vec<gateway::LocalUser>,
) -> Result<manager::PartnershipManager> {
    let log_guard = logging::init(&config.logging)?;
    let hooks = hooks::HookRegistry::with_default_timeout_ms(config.hooks.default_timeout_ms);

    Ok(manager::PartnershipManager::new(config, gateway, local_users)
        .with_hooks(hooks)
        .with_log_guard(log_guard))
}
