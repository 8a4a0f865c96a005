//! Rolemine - interactive role mining over a user/permission matrix
//!
//! Candidates are derived by intersection closure over each permission
//! group, ordered by consolidation value, and committed one at a time by an
//! administrator. Committing a role strips its groups from every other live
//! candidate so the pool never overlaps what is already consolidated.

pub mod color;
pub mod config;
pub mod constants;
pub mod error;
pub mod generator;
pub mod highlight;
pub mod matrix;
pub mod resolver;
pub mod role;
pub mod scorer;
pub mod session;
pub mod store;
mod tx;

pub type UserId = String;
pub type GroupId = String;
/// Id of the group that seeded the role
pub type RoleId = String;

pub use color::Color;
pub use config::Config;
pub use error::{Error, Result};
pub use generator::generate;
pub use highlight::CellHighlight;
pub use matrix::{AssignmentState, PermissionMatrix, User};
pub use resolver::CommitOutcome;
pub use role::{RoleCandidate, RolePool};
pub use scorer::score;
pub use session::{CandidateView, Session, SessionState};
pub use store::SnapshotStore;
