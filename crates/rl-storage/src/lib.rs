use anyhow::{Context, Result, anyhow};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

mod persistence;

pub use persistence::{LEGACY_TABS_KEY, PersistenceAdapter, RecordKeys};

/// String key-value store backing the persisted wheel records.
pub trait KvStore: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn save(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

#[derive(Default)]
pub struct NoopStore;

impl KvStore for NoopStore {
    fn load(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn save(&self, _key: &str, _value: &str) -> Result<()> {
        Ok(())
    }

    fn remove(&self, _key: &str) -> Result<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let values = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            values: RwLock::new(values),
        }
    }
}

impl KvStore for InMemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let guard = self.values.read().map_err(|_| anyhow!("store lock poisoned"))?;
        Ok(guard.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        let mut guard = self.values.write().map_err(|_| anyhow!("store lock poisoned"))?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut guard = self.values.write().map_err(|_| anyhow!("store lock poisoned"))?;
        guard.remove(key);
        Ok(())
    }
}

/// All records in one JSON object file, rewritten on every save.
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create store directory: {}", parent.display()))?;
            }
        }
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read store file: {}", self.path.display()))?;
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw)
            .with_context(|| format!("store file is not a JSON object: {}", self.path.display()))
    }

    fn write_all(&self, values: &BTreeMap<String, String>) -> Result<()> {
        let raw = serde_json::to_string_pretty(values)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, raw).with_context(|| format!("failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("failed to replace store file: {}", self.path.display()))?;
        Ok(())
    }

    fn update<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let _guard = self.write_lock.lock().map_err(|_| anyhow!("store lock poisoned"))?;
        let mut values = self.read_all()?;
        f(&mut values);
        self.write_all(&values)
    }
}

impl KvStore for JsonFileStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        self.update(|values| {
            values.insert(key.to_owned(), value.to_owned());
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.update(|values| {
            values.remove(key);
        })
    }
}

#[cfg(feature = "rocksdb")]
pub use rocks::RocksDbStore;

#[cfg(feature = "rocksdb")]
mod rocks {
    use super::KvStore;
    use anyhow::Result;
    use rocksdb::{DB, Options};
    use std::sync::Arc;

    pub struct RocksDbStore {
        db: Arc<DB>,
    }

    impl RocksDbStore {
        pub fn open_default(path: &str) -> Result<Self> {
            let mut options = Options::default();
            options.create_if_missing(true);
            let db = DB::open(&options, path)?;
            Ok(Self { db: Arc::new(db) })
        }

        fn key_for_record(key: &str) -> String {
            format!("record:{key}")
        }
    }

    impl KvStore for RocksDbStore {
        fn load(&self, key: &str) -> Result<Option<String>> {
            let value = self.db.get(Self::key_for_record(key).as_bytes())?;
            match value {
                Some(raw) => Ok(Some(String::from_utf8(raw)?)),
                None => Ok(None),
            }
        }

        fn save(&self, key: &str, value: &str) -> Result<()> {
            self.db.put(Self::key_for_record(key).as_bytes(), value.as_bytes())?;
            Ok(())
        }

        fn remove(&self, key: &str) -> Result<()> {
            self.db.delete(Self::key_for_record(key).as_bytes())?;
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn rocksdb_store_survives_reopen() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("wheel-db");
            let path = path.to_str().unwrap();

            let store = RocksDbStore::open_default(path).unwrap();
            assert_eq!(store.load("roulette.tabs").unwrap(), None);
            store.save("roulette.tabs", "[]").unwrap();
            store.save("roulette.history", "[]").unwrap();
            drop(store);

            let reopened = RocksDbStore::open_default(path).unwrap();
            assert_eq!(reopened.load("roulette.tabs").unwrap().as_deref(), Some("[]"));
            reopened.remove("roulette.tabs").unwrap();
            assert_eq!(reopened.load("roulette.tabs").unwrap(), None);
            assert_eq!(reopened.load("roulette.history").unwrap().as_deref(), Some("[]"));
        }
    }
}
