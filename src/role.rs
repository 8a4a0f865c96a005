//! Role candidates and the pool that holds them

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::constants::MIN_ROLE_GROUPS;
use crate::{GroupId, RoleId, UserId};

/// A bundle of permission groups shared by a cluster of users
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCandidate {
    /// Group that seeded the candidate
    pub id: RoleId,
    pub color: Color,
    pub groups: BTreeSet<GroupId>,
    pub users: BTreeSet<UserId>,
    /// Set once committed; a used role is frozen
    pub used: bool,
}

impl RoleCandidate {
    pub fn new(id: RoleId, groups: BTreeSet<GroupId>, users: BTreeSet<UserId>) -> Self {
        let color = Color::from_id(&id);
        RoleCandidate { id, color, groups, users, used: false }
    }

    /// Fewer than two groups is not a role
    #[inline]
    pub fn is_meaningful(&self) -> bool {
        self.groups.len() >= MIN_ROLE_GROUPS
    }

    #[inline]
    pub fn covers(&self, user: &str, group: &str) -> bool {
        self.groups.contains(group) && self.users.contains(user)
    }
}

/// Role id -> candidate. Iteration is by id; display order comes from the scorer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePool {
    roles: BTreeMap<RoleId, RoleCandidate>,
}

impl RolePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&RoleCandidate> {
        self.roles.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut RoleCandidate> {
        self.roles.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoleCandidate> {
        self.roles.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut RoleCandidate> {
        self.roles.values_mut()
    }

    /// Insert a candidate; candidates with fewer than two groups are dropped
    pub(crate) fn insert(&mut self, role: RoleCandidate) -> bool {
        if !role.is_meaningful() {
            return false;
        }
        self.roles.insert(role.id.clone(), role);
        true
    }

    /// Drop every candidate that no longer spans two groups, returning their ids
    pub(crate) fn prune(&mut self) -> Vec<RoleId> {
        let mut pruned = Vec::new();
        self.roles.retain(|id, r| {
            let keep = r.is_meaningful();
            if !keep {
                pruned.push(id.clone());
            }
            keep
        });
        pruned
    }
}
