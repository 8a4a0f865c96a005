//! Error types for rolemine

use thiserror::Error;

use crate::{GroupId, RoleId, UserId};

/// The main error type for rolemine operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Attempted to toggle a cell that is ground-truth `Assigned`
    #[error("cell {user}/{group} is assigned and cannot be toggled")]
    InvalidTransition { user: UserId, group: GroupId },
    #[error("no cell for user {user} and group {group}")]
    UnknownCell { user: UserId, group: GroupId },
    #[error("unknown user {0}")]
    UnknownUser(UserId),
    #[error("unknown role {0}")]
    UnknownRole(RoleId),
    /// The role has already been committed
    #[error("role {0} is already committed")]
    AlreadyUsed(RoleId),
    #[error("invalid matrix: {0}")]
    InvalidMatrix(String),
    #[error("store error: {0}")]
    Store(String),
    #[error("config error: {0}")]
    Config(String),
}

/// Result type alias for rolemine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Convert a storage or encoding error into `Error::Store`
pub(crate) fn err<E: std::error::Error>(e: E) -> Error {
    Error::Store(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_ids() {
        let e = Error::InvalidTransition { user: "u1".into(), group: "payroll".into() };
        assert_eq!(e.to_string(), "cell u1/payroll is assigned and cannot be toggled");
        let e = Error::AlreadyUsed("payroll".into());
        assert_eq!(e.to_string(), "role payroll is already committed");
        assert_eq!(Error::UnknownRole("x".into()).to_string(), "unknown role x");
    }

    #[test]
    fn foreign_errors_map_to_store() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        assert_eq!(err(io), Error::Store("disk gone".into()));
    }
}
