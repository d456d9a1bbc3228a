//! Domain models for partnerships and relationship graphs

pub mod ids;
pub mod partnership;
pub mod relationship;

// Re-export important models
pub use ids::{DepartmentId, LocalUserId, PartnerId, PartnerUserId, PartnershipId};
pub use partnership::PartnershipRecord;
pub use relationship::{EdgeState, RelationshipEdge, RelationshipGraph, UserRelationshipSet};
