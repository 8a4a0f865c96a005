//! Environment-driven configuration

use std::path::PathBuf;
use std::str::FromStr;

use crate::constants::{
    DEFAULT_DB_PATH, DEFAULT_MAP_SIZE, DEFAULT_PORT, ENV_DB, ENV_MAP_SIZE, ENV_PORT,
};
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Snapshot store directory
    pub db_path: PathBuf,
    pub port: u16,
    /// LMDB map size in bytes
    pub map_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            port: DEFAULT_PORT,
            map_size: DEFAULT_MAP_SIZE,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Build from any key lookup; unset keys fall back to defaults
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(get: F) -> Result<Self> {
        let d = Config::default();
        Ok(Config {
            db_path: get(ENV_DB).map(PathBuf::from).unwrap_or(d.db_path),
            port: parse(&get, ENV_PORT)?.unwrap_or(d.port),
            map_size: parse(&get, ENV_MAP_SIZE)?.unwrap_or(d.map_size),
        })
    }

    pub fn addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

fn parse<T: FromStr, F: Fn(&str) -> Option<String>>(get: &F, key: &str) -> Result<Option<T>> {
    match get(key) {
        None => Ok(None),
        Some(v) => v
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::Config(format!("{} is not a valid value for {}", v, key))),
    }
}
