//! Engine constants and defaults

/// A role needs at least this many groups to be worth proposing
pub const MIN_ROLE_GROUPS: usize = 2;

// Snapshot store
pub const DEFAULT_MAP_SIZE: usize = 1 << 30;
pub const MAX_DBS: u32 = 2;
pub const SNAPSHOTS_DB: &str = "snapshots";
pub const REVISIONS_DB: &str = "revisions";

// Server defaults
pub const DEFAULT_DB_PATH: &str = "./data/rolemine.mdb";
pub const DEFAULT_PORT: u16 = 3000;

// Environment variables
pub const ENV_DB: &str = "ROLEMINE_DB";
pub const ENV_PORT: &str = "PORT";
pub const ENV_MAP_SIZE: &str = "ROLEMINE_MAP_SIZE";
