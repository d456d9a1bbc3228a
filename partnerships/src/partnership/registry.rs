//! Partnership Registry
//!
//! The authoritative store of partnership records, keyed by partnership id.
//! A partner organization may appear in several records over time (a
//! denied or closed partnership stays listed until deleted, and a new one
//! can be requested alongside it), but at most one of them is live.

use super::status::PartnershipStatus;
use crate::models::{PartnerId, PartnershipId, PartnershipRecord};
use crate::{PartnershipError, Result, StaleReference};
use std::collections::HashMap;
use tracing::debug;

/// Owned store of every partnership known to this session
#[derive(Debug, Clone, Default)]
pub struct PartnershipRegistry {
    records: HashMap<PartnershipId, PartnershipRecord>,
}

impl PartnershipRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
        }
    }

    /// Replace every record, e.g. after loading the partnership listing
    pub fn set(&mut self, records: impl IntoIterator<Item = PartnershipRecord>) {
        self.records = records
            .into_iter()
            .map(|record| (record.partnership_id, record))
            .collect();
        debug!(count = self.records.len(), "Partnership registry replaced");
    }

    /// Add a new record
    pub fn insert(&mut self, record: PartnershipRecord) -> Result<()> {
        if self.records.contains_key(&record.partnership_id) {
            return Err(PartnershipError::DuplicatePartnership(record.partnership_id));
        }
        if !record.status.is_terminal() && !self.is_available(record.id) {
            return Err(PartnershipError::PartnerUnavailable(record.id));
        }

        debug!(
            partner_id = %record.id,
            partnership_id = %record.partnership_id,
            status = %record.status,
            "Partnership added to registry"
        );
        self.records.insert(record.partnership_id, record);
        Ok(())
    }

    pub fn get(&self, id: PartnershipId) -> Option<&PartnershipRecord> {
        self.records.get(&id)
    }

    pub fn get_mut(&mut self, id: PartnershipId) -> Option<&mut PartnershipRecord> {
        self.records.get_mut(&id)
    }

    /// Look up a record, failing with a stale reference when it is gone
    pub fn require(&self, id: PartnershipId) -> Result<&PartnershipRecord> {
        self.records
            .get(&id)
            .ok_or(PartnershipError::StaleReference(StaleReference::UnknownPartnership(id)))
    }

    pub fn require_mut(&mut self, id: PartnershipId) -> Result<&mut PartnershipRecord> {
        self.records
            .get_mut(&id)
            .ok_or(PartnershipError::StaleReference(StaleReference::UnknownPartnership(id)))
    }

    pub fn remove(&mut self, id: PartnershipId) -> Option<PartnershipRecord> {
        let removed = self.records.remove(&id);
        if removed.is_some() {
            debug!(partnership_id = %id, "Partnership removed from registry");
        }
        removed
    }

    /// The partner's record currently in one of `statuses`
    pub fn find_by_partner(
        &self,
        partner: PartnerId,
        statuses: &[PartnershipStatus],
    ) -> Option<&PartnershipRecord> {
        self.records
            .values()
            .find(|r| r.id == partner && statuses.contains(&r.status))
    }

    /// The partner's live (neither denied nor closed) record
    pub fn find_live(&self, partner: PartnerId) -> Option<&PartnershipRecord> {
        self.records.values().find(|r| r.id == partner && r.is_live())
    }

    /// Whether a new partnership may be requested with this partner
    pub fn is_available(&self, partner: PartnerId) -> bool {
        self.find_live(partner).is_none()
    }

    /// Every record ordered by name, then partnership id
    pub fn list(&self) -> Vec<&PartnershipRecord> {
        let mut records: Vec<&PartnershipRecord> = self.records.values().collect();
        records.sort_by(|a, b| {
            a.name
                .cmp(&b.name)
                .then_with(|| a.partnership_id.cmp(&b.partnership_id))
        });
        records
    }

    pub fn iter(&self) -> impl Iterator<Item = &PartnershipRecord> {
        self.records.values()
    }

    /// Partnerships with at least one pending relationship request
    pub fn with_pending_requests(&self) -> Vec<&PartnershipRecord> {
        self.list()
            .into_iter()
            .filter(|r| r.pending_request_count > 0)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
