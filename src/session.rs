//! Administrator session: the single owner of matrix, candidate pool and hover
//!
//! Every mutation goes through a `&mut self` command. Commands either apply
//! completely or leave the session as it was.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::color::Color;
use crate::error::{Error, Result};
use crate::generator::generate;
use crate::highlight::{self, CellHighlight};
use crate::matrix::{AssignmentState, PermissionMatrix, User};
use crate::resolver::{self, CommitOutcome};
use crate::role::{RoleCandidate, RolePool};
use crate::scorer;
use crate::tx::transact;
use crate::{GroupId, RoleId, UserId};

/// Persistent part of a session. The hover is transient and not included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub matrix: PermissionMatrix,
    pub pool: RolePool,
}

/// Candidate as shown to the administrator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateView {
    pub id: RoleId,
    pub color: String,
    pub groups: Vec<GroupId>,
    pub users: Vec<UserId>,
    pub used: bool,
    pub score: u64,
}

impl From<&RoleCandidate> for CandidateView {
    fn from(r: &RoleCandidate) -> Self {
        CandidateView {
            id: r.id.clone(),
            color: r.color.to_hex(),
            groups: r.groups.iter().cloned().collect(),
            users: r.users.iter().cloned().collect(),
            used: r.used,
            score: scorer::score(r),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    state: SessionState,
    hover: Option<RoleId>,
}

impl Session {
    /// Build the matrix and run the first generation pass
    pub fn load<I>(
        users: Vec<(UserId, String)>,
        groups: Vec<GroupId>,
        assignments: I,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = (UserId, GroupId, AssignmentState)>,
    {
        Ok(Self::from_matrix(PermissionMatrix::load(users, groups, assignments)?))
    }

    pub fn from_matrix(matrix: PermissionMatrix) -> Self {
        let pool = generate(&matrix);
        Session { state: SessionState { matrix, pool }, hover: None }
    }

    pub fn from_state(state: SessionState) -> Self {
        Session { state, hover: None }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn matrix(&self) -> &PermissionMatrix {
        &self.state.matrix
    }

    pub fn pool(&self) -> &RolePool {
        &self.state.pool
    }

    // Queries

    pub fn list_users(&self) -> &[User] {
        self.state.matrix.users()
    }

    pub fn groups(&self) -> &[GroupId] {
        self.state.matrix.groups()
    }

    pub fn groups_by_assignment_count(&self) -> Vec<GroupId> {
        self.state.matrix.groups_by_assignment_count()
    }

    pub fn assignment_count(&self, group: &str) -> usize {
        self.state.matrix.assignment_count(group)
    }

    pub fn active_groups(&self, user: &str) -> Result<Vec<GroupId>> {
        self.state.matrix.active_groups(user)
    }

    pub fn cell_state(&self, user: &str, group: &str) -> Result<AssignmentState> {
        self.state.matrix.cell_state(user, group)
    }

    pub fn is_editable(&self, user: &str, group: &str) -> Result<bool> {
        self.state.matrix.is_editable(user, group)
    }

    /// Candidates in no particular order
    pub fn list_candidates(&self) -> Vec<&RoleCandidate> {
        self.state.pool.iter().collect()
    }

    pub fn ordered_candidates(&self) -> Vec<&RoleCandidate> {
        scorer::ordered(&self.state.pool)
    }

    pub fn candidate(&self, id: &str) -> Option<&RoleCandidate> {
        self.state.pool.get(id)
    }

    pub fn hovered_role(&self) -> Option<&RoleCandidate> {
        self.hover.as_deref().and_then(|id| self.state.pool.get(id))
    }

    pub fn primary_role_color(&self, user: &str, group: &str) -> Result<Option<Color>> {
        let u = self.cell_user(user, group)?;
        Ok(highlight::primary_role(&self.state.pool, u, group).map(|r| r.color))
    }

    pub fn preview_role_color(&self, user: &str, group: &str) -> Result<Option<Color>> {
        let u = self.cell_user(user, group)?;
        let hover = self.hover.as_deref();
        Ok(highlight::preview_role(&self.state.pool, hover, u, group).map(|r| r.color))
    }

    pub fn cell_highlight(&self, user: &str, group: &str) -> Result<CellHighlight> {
        let u = self.cell_user(user, group)?;
        highlight::resolve(&self.state.pool, self.hover.as_deref(), u, group)
            .ok_or_else(|| Error::UnknownCell { user: user.into(), group: group.into() })
    }

    fn cell_user(&self, user: &str, group: &str) -> Result<&User> {
        self.state.matrix.cell_state(user, group)?;
        self.state.matrix.user(user).ok_or_else(|| Error::UnknownUser(user.into()))
    }

    // Commands

    /// Flip an unassigned cell. The candidate pool is left as is until `recompute`.
    pub fn toggle_cell(&mut self, user: &str, group: &str) -> Result<AssignmentState> {
        match self.state.matrix.toggle_cell(user, group) {
            Ok(s) => {
                debug!(user, group, state = ?s, "cell toggled");
                Ok(s)
            }
            Err(e) => {
                warn!(user, group, error = %e, "toggle rejected");
                Err(e)
            }
        }
    }

    /// Set or clear the hover. Unknown and committed roles are refused and
    /// leave the hover as it was.
    pub fn set_hover(&mut self, role: Option<&str>) -> bool {
        match role {
            None => {
                self.hover = None;
                true
            }
            Some(id) => match self.state.pool.get(id) {
                Some(r) if !r.used => {
                    self.hover = Some(id.to_string());
                    true
                }
                _ => {
                    debug!(role = id, "hover refused");
                    false
                }
            },
        }
    }

    /// Commit a candidate to its users and repair the rest of the pool
    pub fn commit(&mut self, role: &str) -> Result<CommitOutcome> {
        let out = transact(&mut self.state, |s| resolver::commit(&mut s.matrix, &mut s.pool, role));
        match out {
            Ok(out) => {
                self.hover = None;
                Ok(out)
            }
            Err(e) => {
                warn!(role, error = %e, "commit rejected");
                Err(e)
            }
        }
    }

    /// Regenerate the pool from the current matrix, dropping committed roles and hover
    pub fn recompute(&mut self) {
        let pool = generate(&self.state.matrix);
        self.state.matrix.reset_committed_roles();
        self.state.pool = pool;
        self.hover = None;
        info!(candidates = self.state.pool.len(), "roles recomputed");
    }
}
