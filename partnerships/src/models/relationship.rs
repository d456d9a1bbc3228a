//! Relationship graph data structures
//!
//! A partnership's graph is bipartite: every local user owns one
//! [`UserRelationshipSet`] holding the edges to partner-side users.

use super::ids::{LocalUserId, PartnerUserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn is_false(value: &bool) -> bool {
    !*value
}

/// A single link between one local user and one partner-side user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipEdge {
    /// Partner-side user on the other end of the edge
    pub id: PartnerUserId,

    /// True once both sides have confirmed the link
    pub approved: bool,

    /// True only while the edge is an inbound request awaiting accept/deny
    #[serde(default, skip_serializing_if = "is_false")]
    pub request: bool,
}

impl RelationshipEdge {
    /// An edge proposed locally, waiting for the partner to confirm it
    pub fn waiting(id: PartnerUserId) -> Self {
        Self {
            id,
            approved: false,
            request: false,
        }
    }

    /// An edge confirmed by both sides
    pub fn approved(id: PartnerUserId) -> Self {
        Self {
            id,
            approved: true,
            request: false,
        }
    }

    /// An inbound request from the partner side
    pub fn requested(id: PartnerUserId) -> Self {
        Self {
            id,
            approved: false,
            request: true,
        }
    }

    /// Resolve an inbound request as accepted
    pub fn accept(&mut self) {
        self.approved = true;
        self.request = false;
    }
}

/// How a local/partner user pair currently relates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeState {
    /// No edge
    Unlinked,
    /// Proposed locally, not yet confirmed by the partner
    Waiting,
    Approved,
    /// Inbound request awaiting accept/deny
    Requested,
}

impl From<Option<&RelationshipEdge>> for EdgeState {
    fn from(edge: Option<&RelationshipEdge>) -> Self {
        match edge {
            None => EdgeState::Unlinked,
            Some(e) if e.request => EdgeState::Requested,
            Some(e) if e.approved => EdgeState::Approved,
            Some(_) => EdgeState::Waiting,
        }
    }
}

/// The edges owned by one local user, keyed by partner-user id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRelationshipSet {
    pub user_id: LocalUserId,
    relationships: BTreeMap<PartnerUserId, RelationshipEdge>,
}

impl UserRelationshipSet {
    pub fn new(user_id: LocalUserId) -> Self {
        Self {
            user_id,
            relationships: BTreeMap::new(),
        }
    }

    pub fn get(&self, partner_user: PartnerUserId) -> Option<&RelationshipEdge> {
        self.relationships.get(&partner_user)
    }

    pub fn get_mut(&mut self, partner_user: PartnerUserId) -> Option<&mut RelationshipEdge> {
        self.relationships.get_mut(&partner_user)
    }

    pub fn contains(&self, partner_user: PartnerUserId) -> bool {
        self.relationships.contains_key(&partner_user)
    }

    /// Insert an edge, returning the edge it replaced (if any)
    pub fn insert(&mut self, edge: RelationshipEdge) -> Option<RelationshipEdge> {
        self.relationships.insert(edge.id, edge)
    }

    pub fn remove(&mut self, partner_user: PartnerUserId) -> Option<RelationshipEdge> {
        self.relationships.remove(&partner_user)
    }

    /// Iterate edges in partner-user id order
    pub fn edges(&self) -> impl Iterator<Item = &RelationshipEdge> {
        self.relationships.values()
    }

    pub fn partner_users(&self) -> impl Iterator<Item = PartnerUserId> + '_ {
        self.relationships.keys().copied()
    }

    /// Number of edges still awaiting a local accept/deny
    pub fn pending_requests(&self) -> usize {
        self.relationships.values().filter(|e| e.request).count()
    }

    pub fn has_pending_request(&self) -> bool {
        self.relationships.values().any(|e| e.request)
    }

    pub fn len(&self) -> usize {
        self.relationships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relationships.is_empty()
    }
}

/// The full bipartite graph of a partnership
///
/// A graph is either unloaded (no user sets at all) or loaded with exactly
/// one set per known local user.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RelationshipGraph {
    loaded: bool,
    users: Vec<UserRelationshipSet>,
}

impl RelationshipGraph {
    /// A loaded graph with one empty set per local user, in the given order
    pub fn for_users(users: impl IntoIterator<Item = LocalUserId>) -> Self {
        let mut sets: Vec<UserRelationshipSet> = Vec::new();
        for user_id in users {
            if !sets.iter().any(|s| s.user_id == user_id) {
                sets.push(UserRelationshipSet::new(user_id));
            }
        }
        Self {
            loaded: true,
            users: sets,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn user(&self, user_id: LocalUserId) -> Option<&UserRelationshipSet> {
        self.users.iter().find(|s| s.user_id == user_id)
    }

    pub fn user_mut(&mut self, user_id: LocalUserId) -> Option<&mut UserRelationshipSet> {
        self.users.iter_mut().find(|s| s.user_id == user_id)
    }

    pub fn users(&self) -> impl Iterator<Item = &UserRelationshipSet> {
        self.users.iter()
    }

    pub fn edge(&self, user_id: LocalUserId, partner_user: PartnerUserId) -> Option<&RelationshipEdge> {
        self.user(user_id).and_then(|s| s.get(partner_user))
    }

    pub fn edge_state(&self, user_id: LocalUserId, partner_user: PartnerUserId) -> EdgeState {
        self.edge(user_id, partner_user).into()
    }

    /// Full rescan of inbound request edges across every local user
    pub fn pending_requests(&self) -> usize {
        self.users.iter().map(UserRelationshipSet::pending_requests).sum()
    }

    /// Drop every user set, returning the graph to the unloaded state
    pub fn clear(&mut self) {
        self.loaded = false;
        self.users.clear();
    }
}
