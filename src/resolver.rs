//! Commitment and conflict repair
//!
//! Committing a role records it against its member users, freezes it, and
//! strips its groups from every other live candidate so the pool never
//! proposes a permission twice. Candidates left with fewer than two groups
//! are pruned in the same step.

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::matrix::PermissionMatrix;
use crate::role::RolePool;
use crate::RoleId;

/// What a commit changed besides the role itself
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitOutcome {
    /// Users the role was recorded against
    pub members: usize,
    /// Live candidates that lost groups but survived
    pub narrowed: Vec<RoleId>,
    /// Live candidates removed from the pool
    pub pruned: Vec<RoleId>,
}

/// Check that `role` may be committed
pub fn check_commit(pool: &RolePool, role: &str) -> Result<()> {
    match pool.get(role) {
        None => Err(Error::UnknownRole(role.into())),
        Some(r) if r.used => Err(Error::AlreadyUsed(role.into())),
        Some(_) => Ok(()),
    }
}

/// Commit `role`. Validation happens before any mutation, so a rejected
/// commit leaves matrix and pool untouched.
pub fn commit(
    matrix: &mut PermissionMatrix,
    pool: &mut RolePool,
    role: &str,
) -> Result<CommitOutcome> {
    check_commit(pool, role)?;
    let committed = match pool.get_mut(role) {
        Some(r) => {
            r.used = true;
            r.clone()
        }
        None => return Err(Error::UnknownRole(role.into())),
    };

    let mut out = CommitOutcome::default();
    for uid in &committed.users {
        match matrix.user_mut(uid) {
            Some(u) => {
                u.push_committed_role(committed.id.clone());
                out.members += 1;
            }
            None => warn!(role = %committed.id, user = %uid, "role member missing from matrix"),
        }
    }

    for other in pool.iter_mut().filter(|r| !r.used) {
        let before = other.groups.len();
        other.groups.retain(|g| !committed.groups.contains(g));
        if other.groups.len() != before && other.is_meaningful() {
            out.narrowed.push(other.id.clone());
        }
    }
    out.pruned = pool.prune();

    info!(
        role = %committed.id,
        members = out.members,
        narrowed = out.narrowed.len(),
        pruned = out.pruned.len(),
        "role committed"
    );
    Ok(out)
}
