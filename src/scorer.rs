//! Consolidation-value ordering of candidates

use std::cmp::Ordering;

use crate::role::{RoleCandidate, RolePool};

/// `|groups| * |users|^2`. User coverage is weighted quadratically.
pub fn score(role: &RoleCandidate) -> u64 {
    let groups = role.groups.len() as u64;
    let users = role.users.len() as u64;
    groups.saturating_mul(users.saturating_mul(users))
}

/// Highest score first, ties by role id
pub fn compare(a: &RoleCandidate, b: &RoleCandidate) -> Ordering {
    score(b).cmp(&score(a)).then_with(|| a.id.cmp(&b.id))
}

pub fn ordered(pool: &RolePool) -> Vec<&RoleCandidate> {
    let mut roles: Vec<&RoleCandidate> = pool.iter().collect();
    roles.sort_by(|a, b| compare(a, b));
    roles
}
