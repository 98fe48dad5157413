//! Key-value persistence for the tracker snapshot.
//!
//! The tracker stores three JSON blobs: the canonical records, the user's
//! options, and small app state such as the prefill level map. Stores only
//! move strings; (de)serialization happens in [`load_snapshot`] and
//! [`persist_snapshot`].

use rt_common::UpgradeRecord;
use rt_config::Options;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

pub const LOGS_KEY: &str = "rt.logs";
pub const OPTIONS_KEY: &str = "rt.opts";
pub const STATE_KEY: &str = "rt.state";

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to resolve data directory")]
    DataDirUnavailable,

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize {key}: {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl From<StoreError> for rt_common::Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Io { source, .. } => rt_common::Error::Io(source),
            StoreError::Json { source, .. } => rt_common::Error::Json(source),
            other => rt_common::Error::Store(other.to_string()),
        }
    }
}

/// String blobs by logical key.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Volatile store, mostly for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blobs: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.blobs.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per key in a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn from_data_dir(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    /// Store under the resolved data directory.
    pub fn from_env() -> Result<Self, StoreError> {
        Ok(Self {
            dir: resolve_data_dir()?,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io { path, source: e }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|e| StoreError::Io {
            path: self.dir.clone(),
            source: e,
        })?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(|e| StoreError::Io {
            path: tmp.clone(),
            source: e,
        })?;
        fs::rename(&tmp, &path).map_err(|e| StoreError::Io { path, source: e })?;
        debug!(key, "blob written");
        Ok(())
    }
}

fn resolve_data_dir() -> Result<PathBuf, StoreError> {
    const ENV_DATA_DIR: &str = "RT_DATA_DIR";
    const DIR_NAME: &str = "rollertap";

    if let Ok(dir) = std::env::var(ENV_DATA_DIR) {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        return Ok(PathBuf::from(xdg).join(DIR_NAME));
    }
    if let Some(base) = dirs::data_dir() {
        return Ok(base.join(DIR_NAME));
    }
    Err(StoreError::DataDirUnavailable)
}

/// Small persisted app state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    #[serde(rename = "lastHamLevels", default)]
    pub last_levels: BTreeMap<String, u32>,
}

/// Everything the tracker persists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub records: Vec<UpgradeRecord>,
    pub options: Options,
    pub state: AppState,
}

/// Read a snapshot. Missing or unparseable blobs fall back to defaults.
pub fn load_snapshot(store: &dyn KeyValueStore) -> Result<Snapshot, StoreError> {
    Ok(Snapshot {
        records: load_blob(store, LOGS_KEY)?,
        options: load_blob(store, OPTIONS_KEY)?,
        state: load_blob(store, STATE_KEY)?,
    })
}

fn load_blob<T>(store: &dyn KeyValueStore, key: &str) -> Result<T, StoreError>
where
    T: for<'de> Deserialize<'de> + Default,
{
    let Some(raw) = store.get(key)? else {
        return Ok(T::default());
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(value),
        Err(e) => {
            warn!(key, error = %e, "stored blob unreadable, using defaults");
            Ok(T::default())
        }
    }
}

/// Write every part of `snapshot`.
pub fn persist_snapshot(
    store: &mut dyn KeyValueStore,
    snapshot: &Snapshot,
) -> Result<(), StoreError> {
    save_blob(store, LOGS_KEY, &snapshot.records)?;
    save_blob(store, OPTIONS_KEY, &snapshot.options)?;
    save_blob(store, STATE_KEY, &snapshot.state)
}

fn save_blob<T: Serialize>(
    store: &mut dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(value).map_err(|e| StoreError::Json {
        key: key.to_string(),
        source: e,
    })?;
    store.set(key, &raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn snapshot() -> Snapshot {
        let mut state = AppState::default();
        state.last_levels.insert("Nibbles".to_string(), 4);
        Snapshot {
            records: vec![UpgradeRecord::new("Nibbles", 3, 1500.0, 12.5)],
            options: Options {
                kmb_input: false,
                ..Options::default()
            },
            state,
        }
    }

    #[test]
    fn empty_store_yields_defaults() {
        let store = MemoryStore::new();
        assert_eq!(load_snapshot(&store).unwrap(), Snapshot::default());
    }

    #[test]
    fn memory_store_keeps_snapshot() {
        let mut store = MemoryStore::new();
        persist_snapshot(&mut store, &snapshot()).unwrap();
        assert_eq!(load_snapshot(&store).unwrap(), snapshot());
        let state = store.get(STATE_KEY).unwrap().unwrap();
        assert!(state.contains("lastHamLevels"));
    }

    #[test]
    fn corrupt_blob_falls_back() {
        let mut store = MemoryStore::new();
        persist_snapshot(&mut store, &snapshot()).unwrap();
        store.set(LOGS_KEY, "{not json").unwrap();
        let loaded = load_snapshot(&store).unwrap();
        assert!(loaded.records.is_empty());
        assert!(!loaded.options.kmb_input);
    }

    #[test]
    fn file_store_writes_one_file_per_key() {
        let tmp = TempDir::new().unwrap();
        let mut store = FileStore::from_data_dir(&tmp.path().join("nested"));
        persist_snapshot(&mut store, &snapshot()).unwrap();

        assert!(store.dir().join("rt.logs.json").exists());
        assert!(store.dir().join("rt.opts.json").exists());
        assert!(!store.dir().join("rt.logs.json.tmp").exists());
        assert_eq!(load_snapshot(&store).unwrap(), snapshot());
    }

    #[test]
    fn file_store_missing_key_is_none() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::from_data_dir(tmp.path());
        assert!(store.get("absent").unwrap().is_none());
    }

    #[test]
    fn store_error_maps_to_common_error() {
        let err: rt_common::Error = StoreError::DataDirUnavailable.into();
        assert_eq!(err.code(), 62);
    }
}
