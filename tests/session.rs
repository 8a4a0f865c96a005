//! Session commands: toggling, ordering, hover and recompute

use rolemine::{AssignmentState, CandidateView, Color, Error, Session};
use AssignmentState::*;

fn session(groups: &[&str], rows: &[(&str, &[(&str, AssignmentState)])]) -> Session {
    let users = rows.iter().map(|(u, _)| (u.to_string(), u.to_uppercase())).collect();
    let cells = rows
        .iter()
        .flat_map(|(u, cells)| cells.iter().map(move |(g, s)| (u.to_string(), g.to_string(), *s)));
    Session::load(users, groups.iter().map(|g| g.to_string()).collect(), cells).unwrap()
}

/// Pool: A = {A,B,C,D} for u1 (score 4), B = {B,C} for u1 and u2 (score 8)
fn fixture() -> Session {
    session(
        &["A", "B", "C", "D"],
        &[
            ("u1", &[("A", Assigned), ("B", Assigned), ("C", Assigned), ("D", Assigned)]),
            ("u2", &[("B", Assumed), ("C", Assumed)]),
        ],
    )
}

// ============================================================================
// Queries
// ============================================================================

#[test]
fn load_generates_candidates() {
    let s = fixture();
    assert_eq!(s.list_users().len(), 2);
    assert_eq!(s.groups(), ["A", "B", "C", "D"]);
    assert_eq!(s.list_candidates().len(), 2);
    assert_eq!(s.active_groups("u2").unwrap(), ["B", "C"]);
    assert_eq!(s.cell_state("u2", "B").unwrap(), Assumed);
    assert!(s.hovered_role().is_none());
}

#[test]
fn candidates_order_by_score() {
    let s = fixture();
    let ids: Vec<&str> = s.ordered_candidates().into_iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["B", "A"]);

    let view = CandidateView::from(s.ordered_candidates()[0]);
    assert_eq!(view.score, 8);
    assert_eq!(view.groups, ["B", "C"]);
    assert_eq!(view.users, ["u1", "u2"]);
    assert_eq!(view.color, Color::from_id("B").to_hex());
    assert!(!view.used);
}

#[test]
fn ties_order_by_id() {
    let s = session(
        &["A", "B", "C", "D"],
        &[
            ("u1", &[("C", Assigned), ("D", Assigned)]),
            ("u2", &[("A", Assigned), ("B", Assigned)]),
        ],
    );
    let ids: Vec<&str> = s.ordered_candidates().into_iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["A", "C"]);
}

#[test]
fn used_candidates_stay_listed() {
    let mut s = fixture();
    s.commit("B").unwrap();
    let ordered = s.ordered_candidates();
    assert_eq!(ordered.len(), 2);
    assert!(ordered.iter().any(|r| r.id == "B" && r.used));
}

// ============================================================================
// Toggle
// ============================================================================

#[test]
fn toggle_does_not_touch_the_pool() {
    let mut s = fixture();
    let pool = s.pool().clone();
    assert_eq!(s.toggle_cell("u2", "A").unwrap(), Assumed);
    assert_eq!(s.toggle_cell("u2", "D").unwrap(), Assumed);
    assert_eq!(s.pool(), &pool);
    assert_eq!(s.active_groups("u2").unwrap(), ["A", "B", "C", "D"]);
}

#[test]
fn toggle_on_assigned_is_rejected() {
    let mut s = fixture();
    let before = s.state().clone();
    assert_eq!(
        s.toggle_cell("u1", "A").unwrap_err(),
        Error::InvalidTransition { user: "u1".into(), group: "A".into() }
    );
    assert_eq!(s.state(), &before);
}

// ============================================================================
// Recompute
// ============================================================================

#[test]
fn recompute_picks_up_edits() {
    let mut s = fixture();
    s.toggle_cell("u2", "A").unwrap();
    s.toggle_cell("u2", "D").unwrap();
    s.recompute();

    // u2 now matches u1 everywhere: one role for both
    assert_eq!(s.pool().len(), 1);
    let a = s.candidate("A").unwrap();
    assert_eq!(a.groups.len(), 4);
    assert_eq!(a.users.len(), 2);
}

#[test]
fn recompute_clears_commitments_and_hover() {
    let mut s = fixture();
    s.commit("B").unwrap();
    assert!(s.set_hover(Some("A")));
    s.toggle_cell("u2", "A").unwrap();
    s.recompute();

    for u in s.list_users() {
        assert!(u.committed_roles().is_empty());
    }
    assert!(s.hovered_role().is_none());
    assert!(s.list_candidates().iter().all(|r| !r.used));
}

#[test]
fn recompute_on_untouched_matrix_restores_initial_pool() {
    let mut s = fixture();
    let initial = s.pool().clone();
    s.commit("A").unwrap();
    s.recompute();
    assert_eq!(s.pool(), &initial);
}

#[test]
fn groups_by_assignment_count() {
    let s = session(
        &["A", "B", "C"],
        &[
            ("u1", &[("C", Assigned), ("B", Assumed)]),
            ("u2", &[("C", Assigned), ("A", Assigned)]),
        ],
    );
    assert_eq!(s.groups_by_assignment_count(), ["C", "A", "B"]);
    assert_eq!(s.assignment_count("C"), 2);
}
