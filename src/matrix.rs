//! Permission matrix: users, permission groups and per-cell assignment state

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::{GroupId, RoleId, UserId};

/// Tri-state access marker for one user×group cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentState {
    /// Ground truth, never changed by the engine
    Assigned,
    #[default]
    NotAssigned,
    /// Hypothetical access proposed for planning
    Assumed,
}

impl AssignmentState {
    /// Assigned and assumed access both count towards consolidation
    #[inline]
    pub fn is_active(self) -> bool {
        matches!(self, AssignmentState::Assigned | AssignmentState::Assumed)
    }
}

/// A principal and its per-group assignment states
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    permissions: HashMap<GroupId, AssignmentState>,
    committed_roles: Vec<RoleId>,
}

impl User {
    pub fn state(&self, group: &str) -> Option<AssignmentState> {
        self.permissions.get(group).copied()
    }

    /// Roles committed for this user, earliest first
    pub fn committed_roles(&self) -> &[RoleId] {
        &self.committed_roles
    }

    pub(crate) fn push_committed_role(&mut self, role: RoleId) {
        self.committed_roles.push(role);
    }
}

/// Users × groups grid of assignment states
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionMatrix {
    users: Vec<User>,
    groups: Vec<GroupId>,
}

impl PermissionMatrix {
    /// Build a matrix. Cells not named in `assignments` start `NotAssigned`;
    /// a later assignment for the same cell overrides an earlier one.
    pub fn load<I>(
        users: Vec<(UserId, String)>,
        groups: Vec<GroupId>,
        assignments: I,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = (UserId, GroupId, AssignmentState)>,
    {
        let mut seen = HashSet::with_capacity(groups.len());
        for g in &groups {
            if !seen.insert(g.as_str()) {
                return Err(Error::InvalidMatrix(format!("duplicate group {}", g)));
            }
        }

        let mut index = HashMap::with_capacity(users.len());
        let mut rows = Vec::with_capacity(users.len());
        for (i, (id, name)) in users.into_iter().enumerate() {
            if index.insert(id.clone(), i).is_some() {
                return Err(Error::InvalidMatrix(format!("duplicate user {}", id)));
            }
            let permissions =
                groups.iter().map(|g| (g.clone(), AssignmentState::NotAssigned)).collect();
            rows.push(User { id, name, permissions, committed_roles: Vec::new() });
        }

        for (user, group, state) in assignments {
            let i = *index.get(&user).ok_or_else(|| {
                Error::InvalidMatrix(format!("assignment for unknown user {}", user))
            })?;
            let cell = rows[i].permissions.get_mut(&group).ok_or_else(|| {
                Error::InvalidMatrix(format!("assignment for unknown group {}", group))
            })?;
            *cell = state;
        }

        debug!(users = rows.len(), groups = groups.len(), "matrix loaded");
        Ok(PermissionMatrix { users: rows, groups })
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Groups in column order
    pub fn groups(&self) -> &[GroupId] {
        &self.groups
    }

    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub(crate) fn user_mut(&mut self, id: &str) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.id == id)
    }

    pub fn cell_state(&self, user: &str, group: &str) -> Result<AssignmentState> {
        self.user(user).and_then(|u| u.state(group)).ok_or_else(|| unknown_cell(user, group))
    }

    /// Assigned cells are ground truth and offer no edit
    pub fn is_editable(&self, user: &str, group: &str) -> Result<bool> {
        Ok(self.cell_state(user, group)? != AssignmentState::Assigned)
    }

    /// Flip `NotAssigned <-> Assumed` and return the new state
    pub fn toggle_cell(&mut self, user: &str, group: &str) -> Result<AssignmentState> {
        let cell = self
            .user_mut(user)
            .and_then(|u| u.permissions.get_mut(group))
            .ok_or_else(|| unknown_cell(user, group))?;
        *cell = match *cell {
            AssignmentState::Assigned => {
                return Err(Error::InvalidTransition { user: user.into(), group: group.into() })
            }
            AssignmentState::NotAssigned => AssignmentState::Assumed,
            AssignmentState::Assumed => AssignmentState::NotAssigned,
        };
        Ok(*cell)
    }

    /// Groups the user holds or is assumed to hold, in column order
    pub fn active_groups(&self, user: &str) -> Result<Vec<GroupId>> {
        let u = self.user(user).ok_or_else(|| Error::UnknownUser(user.into()))?;
        Ok(self.active_groups_of(u))
    }

    pub(crate) fn active_groups_of(&self, user: &User) -> Vec<GroupId> {
        self.groups
            .iter()
            .filter(|g| user.state(g).is_some_and(AssignmentState::is_active))
            .cloned()
            .collect()
    }

    pub fn reset_committed_roles(&mut self) {
        for u in &mut self.users {
            u.committed_roles.clear();
        }
    }

    /// Number of users with ground-truth access to `group`
    pub fn assignment_count(&self, group: &str) -> usize {
        self.users.iter().filter(|u| u.state(group) == Some(AssignmentState::Assigned)).count()
    }

    /// Default column order: most-assigned groups first, ties in column order
    pub fn groups_by_assignment_count(&self) -> Vec<GroupId> {
        let mut groups: Vec<(usize, &GroupId)> =
            self.groups.iter().map(|g| (self.assignment_count(g), g)).collect();
        groups.sort_by(|a, b| b.0.cmp(&a.0));
        groups.into_iter().map(|(_, g)| g.clone()).collect()
    }
}

fn unknown_cell(user: &str, group: &str) -> Error {
    Error::UnknownCell { user: user.into(), group: group.into() }
}
