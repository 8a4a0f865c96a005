//! Role candidate generation by intersection closure
//!
//! Every active group acts as a seed key. The candidate under a seed is the
//! intersection of the active sets of all users that have the seed group
//! active, built incrementally in one pass over the users. A user with a
//! single active group seeds or narrows its group down to one group, and that
//! candidate is discarded with the other one-group footprints.
//!
//! Afterwards candidates with an identical footprint collapse to the first
//! seed that produced it. Membership of the dropped duplicates is not merged
//! into the survivor.

use std::collections::{BTreeSet, HashMap, HashSet};

use tracing::debug;

use crate::matrix::PermissionMatrix;
use crate::role::{RoleCandidate, RolePool};
use crate::GroupId;

/// Derive a fresh, deduplicated candidate pool from the matrix
pub fn generate(matrix: &PermissionMatrix) -> RolePool {
    // seed order is the order candidates are created in
    let mut seeds: Vec<RoleCandidate> = Vec::new();
    let mut by_seed: HashMap<GroupId, usize> = HashMap::new();

    for user in matrix.users() {
        let active = matrix.active_groups_of(user);
        let active_set: BTreeSet<GroupId> = active.iter().cloned().collect();

        for g in &active {
            match by_seed.get(g) {
                Some(&i) => {
                    let c = &mut seeds[i];
                    c.groups.retain(|x| active_set.contains(x));
                    c.users.insert(user.id.clone());
                }
                None => {
                    by_seed.insert(g.clone(), seeds.len());
                    seeds.push(RoleCandidate::new(
                        g.clone(),
                        active_set.clone(),
                        BTreeSet::from([user.id.clone()]),
                    ));
                }
            }
        }
    }

    let seeded = seeds.len();
    let mut footprints: HashSet<BTreeSet<GroupId>> = HashSet::with_capacity(seeded);
    let mut pool = RolePool::new();
    for c in seeds {
        if !footprints.insert(c.groups.clone()) {
            continue;
        }
        pool.insert(c);
    }

    debug!(seeded, candidates = pool.len(), "role candidates generated");
    pool
}
