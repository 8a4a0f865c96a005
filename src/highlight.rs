//! Highlight precedence for a single user×group cell
//!
//! 1. the earliest committed role of the user covering the group
//! 2. the hovered role, if it is live and covers the cell
//! 3. plain assignment-state styling

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::matrix::{AssignmentState, User};
use crate::role::{RoleCandidate, RolePool};
use crate::RoleId;

/// What a cell should show
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CellHighlight {
    Committed { role: RoleId, color: Color },
    Preview { role: RoleId, color: Color },
    Plain { state: AssignmentState },
}

impl CellHighlight {
    pub fn color(&self) -> Option<Color> {
        match self {
            CellHighlight::Committed { color, .. } | CellHighlight::Preview { color, .. } => {
                Some(*color)
            }
            CellHighlight::Plain { .. } => None,
        }
    }
}

/// First committed role (in commitment order) whose groups contain `group`
pub fn primary_role<'a>(pool: &'a RolePool, user: &User, group: &str) -> Option<&'a RoleCandidate> {
    user.committed_roles()
        .iter()
        .filter_map(|id| pool.get(id))
        .find(|r| r.groups.contains(group))
}

/// The hovered role, if it is still live and covers this cell
pub fn preview_role<'a>(
    pool: &'a RolePool,
    hover: Option<&str>,
    user: &User,
    group: &str,
) -> Option<&'a RoleCandidate> {
    hover
        .and_then(|id| pool.get(id))
        .filter(|r| !r.used && r.covers(&user.id, group))
}

/// Resolve a cell. `None` when the user has no such group.
pub fn resolve(
    pool: &RolePool,
    hover: Option<&str>,
    user: &User,
    group: &str,
) -> Option<CellHighlight> {
    let state = user.state(group)?;
    if let Some(r) = primary_role(pool, user, group) {
        return Some(CellHighlight::Committed { role: r.id.clone(), color: r.color });
    }
    if let Some(r) = preview_role(pool, hover, user, group) {
        return Some(CellHighlight::Preview { role: r.id.clone(), color: r.color });
    }
    Some(CellHighlight::Plain { state })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::matrix::PermissionMatrix;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn fixture() -> (PermissionMatrix, RolePool) {
        let mut m = PermissionMatrix::load(
            vec![("u1".into(), "Ada".into())],
            vec!["a".into(), "b".into(), "c".into()],
            vec![("u1".into(), "a".into(), AssignmentState::Assigned)],
        )
        .unwrap();
        let mut pool = RolePool::new();
        let mut early = RoleCandidate::new("early".into(), set(&["a", "b"]), set(&["u1"]));
        early.used = true;
        let mut late = RoleCandidate::new("late".into(), set(&["a", "c"]), set(&["u1"]));
        late.used = true;
        pool.insert(early);
        pool.insert(late);
        let u = m.user_mut("u1").unwrap();
        u.push_committed_role("early".into());
        u.push_committed_role("late".into());
        (m, pool)
    }

    #[test]
    fn first_committed_role_wins_on_overlap() {
        let (m, pool) = fixture();
        let u = m.user("u1").unwrap();
        assert_eq!(primary_role(&pool, u, "a").unwrap().id, "early");
        assert_eq!(primary_role(&pool, u, "c").unwrap().id, "late");
        assert!(primary_role(&pool, u, "zzz").is_none());
    }

    #[test]
    fn stale_hover_on_used_role_is_ignored() {
        let (m, pool) = fixture();
        let u = m.user("u1").unwrap();
        assert!(preview_role(&pool, Some("late"), u, "c").is_none());
        assert!(preview_role(&pool, Some("gone"), u, "c").is_none());
        assert_eq!(resolve(&pool, Some("late"), u, "b"), Some(CellHighlight::Committed {
            role: "early".into(),
            color: Color::from_id("early"),
        }));
        assert_eq!(resolve(&pool, None, u, "missing"), None);
    }
}
