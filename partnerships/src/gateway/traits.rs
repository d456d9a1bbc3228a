//! Trait definitions for the remote side of the partnership system

use async_trait::async_trait;
use std::fmt::Debug;

use super::GatewayError;
use super::types::{PartnerDepartment, PartnershipSummary};
use crate::models::{LocalUserId, PartnerId, PartnerUserId, PartnershipId};
use crate::relationships::diff::UserRelationshipDiff;

/// Remote operations the engine depends on
///
/// Transport, encoding and authentication belong to the implementation.
/// Every call either succeeds or reports a [`GatewayError`]; the engine
/// never retries on its own.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PartnerGateway: Send + Sync + Debug {
    /// List every partnership of the local organization
    async fn list_partnerships(&self) -> Result<Vec<PartnershipSummary>, GatewayError>;

    /// Partner-side departments with their users and reported edges
    async fn fetch_partner_users(
        &self,
        partner: PartnerId,
    ) -> Result<Vec<PartnerDepartment>, GatewayError>;

    /// Persist the per-user edge changes of a committed edit session
    async fn persist_relationship_diff(
        &self,
        partner: PartnerId,
        diff: &[UserRelationshipDiff],
    ) -> Result<(), GatewayError>;

    /// Accept or deny an inbound relationship request
    async fn respond_to_relationship_request(
        &self,
        local_user: LocalUserId,
        external_user: PartnerUserId,
        accept: bool,
    ) -> Result<(), GatewayError>;

    /// Ask a partner organization for a partnership, returning its id
    async fn request_partnership(&self, partner: PartnerId) -> Result<PartnershipId, GatewayError>;

    /// Approve an inbound partnership request
    async fn accept_partnership(&self, partnership: PartnershipId) -> Result<(), GatewayError>;

    /// Deny an inbound partnership request
    async fn deny_partnership(&self, partnership: PartnershipId) -> Result<(), GatewayError>;

    /// End an approved partnership
    async fn close_partnership(&self, partnership: PartnershipId) -> Result<(), GatewayError>;

    /// Cancel a pending partnership or delete a terminal one
    async fn delete_partnership(&self, partnership: PartnershipId) -> Result<(), GatewayError>;
}
