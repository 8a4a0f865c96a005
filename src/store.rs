//! LMDB-backed snapshot store for sessions
//!
//! Storage patterns:
//! - `snapshots`: name -> JSON-encoded `SessionState`
//! - `revisions`: name -> revision counter, bumped on every save

use std::path::Path;

use heed::types::{Bytes, Str, U64};
use heed::{Database, Env, EnvOpenOptions, RoTxn, RwTxn};
use tracing::{debug, info};

use crate::constants::{MAX_DBS, REVISIONS_DB, SNAPSHOTS_DB};
use crate::error::{err, Result};
use crate::session::{Session, SessionState};

type Revisions = Database<Str, U64<byteorder::BigEndian>>;

pub struct SnapshotStore {
    env: Env,
    snapshots: Database<Str, Bytes>,
    revisions: Revisions,
}

impl SnapshotStore {
    /// Open (or create) the store at `path`
    pub fn open(path: impl AsRef<Path>, map_size: usize) -> Result<Self> {
        let path = path.as_ref();
        std::fs::create_dir_all(path).map_err(err)?;
        let env = unsafe {
            EnvOpenOptions::new().map_size(map_size).max_dbs(MAX_DBS).open(path).map_err(err)?
        };
        let mut tx = env.write_txn().map_err(err)?;
        let snapshots = env.create_database(&mut tx, Some(SNAPSHOTS_DB)).map_err(err)?;
        let revisions = env.create_database(&mut tx, Some(REVISIONS_DB)).map_err(err)?;
        tx.commit().map_err(err)?;
        info!(path = %path.display(), "snapshot store opened");
        Ok(SnapshotStore { env, snapshots, revisions })
    }

    fn read<T, F: FnOnce(&Self, &RoTxn) -> Result<T>>(&self, f: F) -> Result<T> {
        let tx = self.env.read_txn().map_err(err)?;
        f(self, &tx)
    }

    fn write<T, F: FnOnce(&Self, &mut RwTxn) -> Result<T>>(&self, f: F) -> Result<T> {
        let mut tx = self.env.write_txn().map_err(err)?;
        let r = f(self, &mut tx)?;
        tx.commit().map_err(err)?;
        Ok(r)
    }

    /// Save the session under `name` and return the new revision
    pub fn save(&self, name: &str, session: &Session) -> Result<u64> {
        let bytes = serde_json::to_vec(session.state()).map_err(err)?;
        let rev = self.write(|s, tx| {
            let rev = s.revisions.get(tx, name).map_err(err)?.unwrap_or(0) + 1;
            s.snapshots.put(tx, name, &bytes).map_err(err)?;
            s.revisions.put(tx, name, &rev).map_err(err)?;
            Ok(rev)
        })?;
        debug!(name, rev, size = bytes.len(), "snapshot saved");
        Ok(rev)
    }

    /// Load a saved session. The hover always starts cleared.
    pub fn load(&self, name: &str) -> Result<Option<Session>> {
        let state = self.read(|s, tx| match s.snapshots.get(tx, name).map_err(err)? {
            Some(bytes) => Ok(Some(serde_json::from_slice::<SessionState>(bytes).map_err(err)?)),
            None => Ok(None),
        })?;
        Ok(state.map(Session::from_state))
    }

    pub fn delete(&self, name: &str) -> Result<bool> {
        self.write(|s, tx| {
            let r = s.snapshots.delete(tx, name).map_err(err)?;
            s.revisions.delete(tx, name).map_err(err)?;
            Ok(r)
        })
    }

    /// Snapshot names in key order
    pub fn list(&self) -> Result<Vec<String>> {
        self.read(|s, tx| {
            let mut r = Vec::new();
            for item in s.snapshots.iter(tx).map_err(err)? {
                let (k, _) = item.map_err(err)?;
                r.push(k.to_string());
            }
            Ok(r)
        })
    }

    /// Current revision of `name`, 0 if never saved
    pub fn revision(&self, name: &str) -> Result<u64> {
        self.read(|s, tx| Ok(s.revisions.get(tx, name).map_err(err)?.unwrap_or(0)))
    }

    pub fn clear(&self) -> Result<()> {
        self.write(|s, tx| {
            s.snapshots.clear(tx).map_err(err)?;
            s.revisions.clear(tx).map_err(err)
        })
    }
}
