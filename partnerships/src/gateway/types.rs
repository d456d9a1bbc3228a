//! Data exchanged with the partnership gateway

use crate::models::{
    DepartmentId, LocalUserId, PartnerId, PartnerUserId, PartnershipId, PartnershipRecord,
};
use crate::partnership::PartnershipStatus;
use serde::{Deserialize, Serialize};

/// One row of the partnership listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnershipSummary {
    pub partner_id: PartnerId,
    pub partnership_id: PartnershipId,
    pub name: String,
    pub status: PartnershipStatus,
    #[serde(default)]
    pub pending_requests: u32,
}

impl From<PartnershipSummary> for PartnershipRecord {
    fn from(summary: PartnershipSummary) -> Self {
        PartnershipRecord::new(
            summary.partner_id,
            summary.partnership_id,
            summary.name,
            summary.status,
        )
        .with_pending_requests(summary.pending_requests)
    }
}

/// A department of the partner organization with its users
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerDepartment {
    pub id: DepartmentId,
    pub name: String,
    #[serde(default)]
    pub users: Vec<PartnerUser>,
}

/// A partner-side user and the edges it reports towards local users
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerUser {
    pub id: PartnerUserId,
    pub name: String,
    #[serde(default)]
    pub relationships: Vec<RemoteEdge>,
}

/// An edge as reported by the partner side
///
/// `id` names the local user the edge points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEdge {
    pub id: LocalUserId,
    pub approved: bool,
    #[serde(default)]
    pub request: bool,
}

/// A local user known to the system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalUser {
    pub id: LocalUserId,
    pub name: String,
}

impl LocalUser {
    pub fn new(id: impl Into<LocalUserId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_department_listing_deserializes() {
        let json = serde_json::json!([{
            "id": 3,
            "name": "Sales",
            "users": [{
                "id": 50,
                "name": "Ana",
                "relationships": [
                    {"id": 1, "approved": true},
                    {"id": 2, "approved": false, "request": true}
                ]
            }]
        }]);

        let departments: Vec<PartnerDepartment> = serde_json::from_value(json).unwrap();
        let user = &departments[0].users[0];
        assert_eq!(user.id, PartnerUserId(50));
        assert!(!user.relationships[0].request);
        assert!(user.relationships[1].request);
    }

    #[test]
    fn test_summary_into_record() {
        let summary = PartnershipSummary {
            partner_id: PartnerId(1),
            partnership_id: PartnershipId(10),
            name: "Acme".to_string(),
            status: PartnershipStatus::Approved,
            pending_requests: 3,
        };
        let record: PartnershipRecord = summary.into();
        assert_eq!(record.pending_request_count, 3);
        assert!(!record.relationships.is_loaded());
    }
}
