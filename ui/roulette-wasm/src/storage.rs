//! `localStorage` backend for the wheel records.

use anyhow::{Result, anyhow};
use gloo_storage::{LocalStorage, Storage};
use rl_core::KvStore;

#[derive(Default, Clone, Copy)]
pub struct LocalStorageStore;

impl KvStore for LocalStorageStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        LocalStorage::raw()
            .get_item(key)
            .map_err(|e| anyhow!("localStorage read failed for {key}: {e:?}"))
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        LocalStorage::raw()
            .set_item(key, value)
            .map_err(|e| anyhow!("localStorage write failed for {key}: {e:?}"))
    }

    fn remove(&self, key: &str) -> Result<()> {
        LocalStorage::delete(key);
        Ok(())
    }
}
