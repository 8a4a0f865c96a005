//! Permission matrix construction and cell transitions

use rolemine::{AssignmentState, Error, PermissionMatrix};
use AssignmentState::*;

fn matrix() -> PermissionMatrix {
    PermissionMatrix::load(
        vec![("u1".into(), "Ada".into()), ("u2".into(), "Bo".into())],
        vec!["payroll".into(), "hr".into(), "crm".into()],
        vec![
            ("u1".into(), "payroll".into(), Assigned),
            ("u1".into(), "hr".into(), Assumed),
            ("u2".into(), "payroll".into(), Assigned),
            ("u2".into(), "crm".into(), Assigned),
        ],
    )
    .unwrap()
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn unnamed_cells_start_not_assigned() {
    let m = matrix();
    assert_eq!(m.cell_state("u1", "crm").unwrap(), NotAssigned);
    assert_eq!(m.cell_state("u2", "hr").unwrap(), NotAssigned);
    assert_eq!(m.users().len(), 2);
    assert_eq!(m.groups(), ["payroll", "hr", "crm"]);
}

#[test]
fn later_assignment_overrides_earlier() {
    let m = PermissionMatrix::load(
        vec![("u1".into(), "Ada".into())],
        vec!["a".into()],
        vec![("u1".into(), "a".into(), Assumed), ("u1".into(), "a".into(), Assigned)],
    )
    .unwrap();
    assert_eq!(m.cell_state("u1", "a").unwrap(), Assigned);
}

#[test]
fn rejects_duplicates_and_dangling_assignments() {
    let dup_user = PermissionMatrix::load(
        vec![("u1".into(), "Ada".into()), ("u1".into(), "Ada again".into())],
        vec!["a".into()],
        vec![],
    );
    assert!(matches!(dup_user, Err(Error::InvalidMatrix(_))));

    let dup_group = PermissionMatrix::load(
        vec![("u1".into(), "Ada".into())],
        vec!["a".into(), "a".into()],
        vec![],
    );
    assert!(matches!(dup_group, Err(Error::InvalidMatrix(_))));

    let unknown_group = PermissionMatrix::load(
        vec![("u1".into(), "Ada".into())],
        vec!["a".into()],
        vec![("u1".into(), "zzz".into(), Assigned)],
    );
    assert!(matches!(unknown_group, Err(Error::InvalidMatrix(_))));

    let unknown_user = PermissionMatrix::load(
        vec![("u1".into(), "Ada".into())],
        vec!["a".into()],
        vec![("nobody".into(), "a".into(), Assigned)],
    );
    assert!(matches!(unknown_user, Err(Error::InvalidMatrix(_))));
}

// ============================================================================
// Toggling
// ============================================================================

#[test]
fn toggle_flips_between_not_assigned_and_assumed() {
    let mut m = matrix();
    assert_eq!(m.toggle_cell("u1", "crm").unwrap(), Assumed);
    assert_eq!(m.cell_state("u1", "crm").unwrap(), Assumed);
    assert_eq!(m.toggle_cell("u1", "crm").unwrap(), NotAssigned);
    assert_eq!(m.toggle_cell("u1", "hr").unwrap(), NotAssigned);
}

#[test]
fn assigned_cells_never_change() {
    let mut m = matrix();
    let before = m.clone();
    for _ in 0..3 {
        let e = m.toggle_cell("u1", "payroll").unwrap_err();
        assert_eq!(e, Error::InvalidTransition { user: "u1".into(), group: "payroll".into() });
    }
    assert_eq!(m, before);
    assert!(!m.is_editable("u1", "payroll").unwrap());
    assert!(m.is_editable("u1", "hr").unwrap());
}

#[test]
fn unknown_cells_are_reported() {
    let mut m = matrix();
    assert!(matches!(m.toggle_cell("u9", "hr"), Err(Error::UnknownCell { .. })));
    assert!(matches!(m.toggle_cell("u1", "nope"), Err(Error::UnknownCell { .. })));
    assert!(matches!(m.cell_state("u1", "nope"), Err(Error::UnknownCell { .. })));
    assert!(matches!(m.active_groups("u9"), Err(Error::UnknownUser(_))));
}

// ============================================================================
// Derived values
// ============================================================================

#[test]
fn active_groups_count_assigned_and_assumed_in_column_order() {
    let mut m = matrix();
    assert_eq!(m.active_groups("u1").unwrap(), ["payroll", "hr"]);
    assert_eq!(m.active_groups("u2").unwrap(), ["payroll", "crm"]);
    m.toggle_cell("u2", "hr").unwrap();
    assert_eq!(m.active_groups("u2").unwrap(), ["payroll", "hr", "crm"]);
}

#[test]
fn groups_order_by_assignment_count() {
    let m = matrix();
    assert_eq!(m.assignment_count("payroll"), 2);
    // assumed access is not counted
    assert_eq!(m.assignment_count("hr"), 0);
    assert_eq!(m.assignment_count("crm"), 1);
    assert_eq!(m.groups_by_assignment_count(), ["payroll", "crm", "hr"]);
}
