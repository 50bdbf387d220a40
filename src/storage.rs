//! Key/value persistence
//!
//! A tiny string-keyed integer store behind a trait, so game logic can
//! run against an in-memory map in tests. The file implementation keeps a
//! versioned JSON document in the platform data directory and treats
//! every failure as non-fatal: a lost high score is acceptable, a crashed
//! game is not.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Storage document version, bumped on layout changes
const STORE_VERSION: u32 = 1;

/// String-keyed integer store
pub trait Store {
    fn get(&self, key: &str) -> Option<i64>;
    fn set(&mut self, key: &str, value: i64);
}

/// On-disk document
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    version: u32,
    #[serde(default)]
    values: HashMap<String, i64>,
}

/// JSON-backed store under the platform data directory.
///
/// Writes go through on every `set`, fire-and-forget; reads come from the
/// document loaded at open time.
pub struct FileStore {
    path: Option<PathBuf>,
    doc: StoreFile,
}

impl FileStore {
    /// Open the default store, loading whatever is already there.
    /// Missing or unparseable documents start empty.
    pub fn open_default() -> Self {
        Self::open(dirs::data_dir().map(|d| d.join("pyra-flap").join("store.json")))
    }

    fn open(path: Option<PathBuf>) -> Self {
        let doc = path
            .as_deref()
            .and_then(|p| fs::read_to_string(p).ok())
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_else(|| {
                log::info!("no existing store, starting fresh");
                StoreFile {
                    version: STORE_VERSION,
                    ..Default::default()
                }
            });
        Self { path, doc }
    }

    fn flush(&self) {
        let Some(path) = &self.path else {
            log::warn!("no data directory available, value not persisted");
            return;
        };
        let json = match serde_json::to_string(&self.doc) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("store serialization failed: {e}");
                return;
            }
        };
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                log::warn!("store directory creation failed: {e}");
                return;
            }
        }
        if let Err(e) = fs::write(path, json) {
            log::warn!("store write failed: {e}");
        }
    }
}

impl Store for FileStore {
    fn get(&self, key: &str) -> Option<i64> {
        self.doc.values.get(key).copied()
    }

    fn set(&mut self, key: &str, value: i64) {
        self.doc.version = STORE_VERSION;
        self.doc.values.insert(key.to_string(), value);
        self.flush();
    }
}

/// In-memory store for tests and environments without a data directory
#[derive(Debug, Default)]
pub struct MemStore {
    values: HashMap<String, i64>,
    /// Number of `set` calls, for assertions on write counts
    pub writes: u32,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemStore {
    fn get(&self, key: &str) -> Option<i64> {
        self.values.get(key).copied()
    }

    fn set(&mut self, key: &str, value: i64) {
        self.writes += 1;
        self.values.insert(key.to_string(), value);
    }
}
