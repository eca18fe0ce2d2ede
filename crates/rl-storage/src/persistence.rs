//! Typed load/save of the three wheel records.
//!
//! Loads validate shape and invariants and discard the whole record when it is
//! unusable. Saves never fail the caller: errors are logged and reported as
//! `false`, since the in-memory state stays valid for the session.

use crate::KvStore;
use rl_types::{HISTORY_LIMIT, HistoryEntry, MAX_OPTIONS, MAX_TABS, Tab, WheelError, WheelResult};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Single-record key used by the first version of the widget.
pub const LEGACY_TABS_KEY: &str = "rouletteData";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordKeys {
    pub tabs: String,
    pub active_tab_id: String,
    pub history: String,
}

impl RecordKeys {
    pub fn for_namespace(namespace: &str) -> Self {
        Self {
            tabs: format!("{namespace}.tabs"),
            active_tab_id: format!("{namespace}.activeTabId"),
            history: format!("{namespace}.history"),
        }
    }
}

pub struct PersistenceAdapter<K> {
    store: Arc<K>,
    keys: RecordKeys,
}

impl<K> Clone for PersistenceAdapter<K> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            keys: self.keys.clone(),
        }
    }
}

impl<K> PersistenceAdapter<K>
where
    K: KvStore,
{
    pub fn new(store: Arc<K>, namespace: &str) -> Self {
        Self {
            store,
            keys: RecordKeys::for_namespace(namespace),
        }
    }

    pub fn keys(&self) -> &RecordKeys {
        &self.keys
    }

    pub fn store(&self) -> &Arc<K> {
        &self.store
    }

    /// Stored tabs, or `None` when absent or corrupt. Falls back to the
    /// legacy record and migrates it when the current key is missing.
    pub fn load_tabs(&self) -> Option<Vec<Tab>> {
        if let Some(raw) = self.read(&self.keys.tabs) {
            return self.accept(&self.keys.tabs, decode_tabs(&raw));
        }

        let raw = self.read(LEGACY_TABS_KEY)?;
        let tabs = self.accept(LEGACY_TABS_KEY, decode_legacy_tabs(&raw))?;
        info!("migrating {} tabs from legacy record {}", tabs.len(), LEGACY_TABS_KEY);
        self.save_tabs(&tabs);
        Some(tabs)
    }

    pub fn load_active_tab_id(&self) -> Option<String> {
        let raw = self.read(&self.keys.active_tab_id)?;
        self.accept(&self.keys.active_tab_id, decode_active_tab_id(&raw))
    }

    pub fn load_history(&self) -> Option<Vec<HistoryEntry>> {
        let raw = self.read(&self.keys.history)?;
        self.accept(&self.keys.history, decode_history(&raw))
    }

    pub fn save_tabs(&self, tabs: &[Tab]) -> bool {
        self.write(&self.keys.tabs, tabs)
    }

    pub fn save_active_tab_id(&self, id: &str) -> bool {
        self.write(&self.keys.active_tab_id, id)
    }

    pub fn save_history(&self, history: &[HistoryEntry]) -> bool {
        self.write(&self.keys.history, history)
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.load(key) {
            Ok(value) => value,
            Err(err) => {
                error!("failed to load record {}: {:#}", key, err);
                None
            }
        }
    }

    fn accept<T>(&self, key: &str, decoded: WheelResult<T>) -> Option<T> {
        match decoded {
            Ok(value) => Some(value),
            Err(err) => {
                warn!("discarding record {}: {}", key, err);
                None
            }
        }
    }

    fn write<T>(&self, key: &str, value: &T) -> bool
    where
        T: Serialize + ?Sized,
    {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(err) => {
                error!("failed to encode record {}: {}", key, err);
                return false;
            }
        };
        match self.store.save(key, &raw) {
            Ok(()) => true,
            Err(err) => {
                error!("failed to save record {}: {:#}", key, err);
                false
            }
        }
    }
}

fn corrupt(reason: impl Into<String>) -> WheelError {
    WheelError::StorageCorrupt(reason.into())
}

fn parse_array<T>(raw: &str) -> WheelResult<Vec<T>>
where
    T: DeserializeOwned,
{
    let value: Value = serde_json::from_str(raw).map_err(|err| corrupt(format!("invalid json: {err}")))?;
    if !value.is_array() {
        return Err(corrupt("expected an array"));
    }
    serde_json::from_value(value).map_err(|err| corrupt(format!("malformed entry: {err}")))
}

pub(crate) fn decode_tabs(raw: &str) -> WheelResult<Vec<Tab>> {
    check_tabs(parse_array(raw)?)
}

/// The first widget never capped or de-duplicated options, so its record is
/// repaired before the usual checks: repeated options keep their first copy,
/// and options and tabs are cut to the current limits.
pub(crate) fn decode_legacy_tabs(raw: &str) -> WheelResult<Vec<Tab>> {
    let mut tabs: Vec<Tab> = parse_array(raw)?;
    if tabs.len() > MAX_TABS {
        warn!("dropping {} legacy tabs over the limit of {}", tabs.len() - MAX_TABS, MAX_TABS);
        tabs.truncate(MAX_TABS);
    }
    for tab in &mut tabs {
        let before = tab.options.len();
        let mut seen = HashSet::new();
        tab.options.retain(|o| seen.insert(o.clone()));
        tab.options.truncate(MAX_OPTIONS);
        if tab.options.len() != before {
            warn!("repaired legacy tab {}: {} options kept of {}", tab.id, tab.options.len(), before);
        }
    }
    check_tabs(tabs)
}

fn check_tabs(tabs: Vec<Tab>) -> WheelResult<Vec<Tab>> {
    if tabs.is_empty() {
        return Err(corrupt("no tabs"));
    }
    if tabs.len() > MAX_TABS {
        return Err(corrupt(format!("{} tabs exceeds limit of {MAX_TABS}", tabs.len())));
    }

    let mut ids = HashSet::new();
    for tab in &tabs {
        if tab.id.trim().is_empty() {
            return Err(corrupt("tab with empty id"));
        }
        if !ids.insert(tab.id.as_str()) {
            return Err(corrupt(format!("duplicate tab id {}", tab.id)));
        }
        if tab.options.len() > MAX_OPTIONS {
            return Err(corrupt(format!("tab {} has {} options", tab.id, tab.options.len())));
        }
        let mut seen = HashSet::new();
        if !tab.options.iter().all(|o| seen.insert(o.as_str())) {
            return Err(corrupt(format!("tab {} has duplicate options", tab.id)));
        }
    }
    Ok(tabs)
}

pub(crate) fn decode_active_tab_id(raw: &str) -> WheelResult<String> {
    let id: String = serde_json::from_str(raw).map_err(|err| corrupt(format!("expected a string: {err}")))?;
    if id.trim().is_empty() {
        return Err(corrupt("empty active tab id"));
    }
    Ok(id)
}

pub(crate) fn decode_history(raw: &str) -> WheelResult<Vec<HistoryEntry>> {
    let mut history: Vec<HistoryEntry> = parse_array(raw)?;
    if history.len() > HISTORY_LIMIT {
        warn!("truncating {} stored history entries to {}", history.len(), HISTORY_LIMIT);
        history.truncate(HISTORY_LIMIT);
    }
    Ok(history)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryStore;
    use anyhow::anyhow;

    struct FailingStore;

    impl KvStore for FailingStore {
        fn load(&self, _key: &str) -> anyhow::Result<Option<String>> {
            Err(anyhow!("disk on fire"))
        }

        fn save(&self, _key: &str, _value: &str) -> anyhow::Result<()> {
            Err(anyhow!("quota exceeded"))
        }

        fn remove(&self, _key: &str) -> anyhow::Result<()> {
            Err(anyhow!("quota exceeded"))
        }
    }

    fn adapter_with(entries: &[(&str, &str)]) -> PersistenceAdapter<InMemoryStore> {
        let store = InMemoryStore::with_entries(entries.iter().map(|(k, v)| (*k, *v)));
        PersistenceAdapter::new(Arc::new(store), "roulette")
    }

    #[test]
    fn keys_are_namespaced() {
        let keys = RecordKeys::for_namespace("office");
        assert_eq!(keys.tabs, "office.tabs");
        assert_eq!(keys.active_tab_id, "office.activeTabId");
        assert_eq!(keys.history, "office.history");
    }

    #[test]
    fn absent_records_load_as_none() {
        let adapter = adapter_with(&[]);
        assert_eq!(adapter.load_tabs(), None);
        assert_eq!(adapter.load_active_tab_id(), None);
        assert_eq!(adapter.load_history(), None);
    }

    #[test]
    fn tabs_round_trip() {
        let adapter = adapter_with(&[]);
        let mut second = Tab::new("tab-2", "Movies");
        second.options = vec!["Alien".into(), "Heat".into()];
        let tabs = vec![Tab::default_lunch(), second];

        assert!(adapter.save_tabs(&tabs));
        assert!(adapter.save_active_tab_id("tab-2"));
        assert_eq!(adapter.load_tabs(), Some(tabs));
        assert_eq!(adapter.load_active_tab_id().as_deref(), Some("tab-2"));
    }

    #[test]
    fn non_array_tabs_are_discarded() {
        let adapter = adapter_with(&[("roulette.tabs", r#"{"id":"tab-1"}"#)]);
        assert_eq!(adapter.load_tabs(), None);
    }

    #[test]
    fn tabs_missing_fields_are_discarded() {
        let adapter = adapter_with(&[("roulette.tabs", r#"[{"id":"tab-1","name":"Lunch"}]"#)]);
        assert_eq!(adapter.load_tabs(), None);
    }

    #[test]
    fn broken_invariants_are_corrupt() {
        assert!(matches!(decode_tabs("[]"), Err(WheelError::StorageCorrupt(_))));
        assert!(decode_tabs(r#"[{"id":"a","name":"A","options":[]},{"id":"a","name":"B","options":[]}]"#).is_err());
        assert!(decode_tabs(r#"[{"id":"a","name":"A","options":["x","x"]}]"#).is_err());

        let too_many: Vec<Tab> = (0..=MAX_TABS).map(|i| Tab::new(format!("t{i}"), "T")).collect();
        let raw = serde_json::to_string(&too_many).unwrap();
        assert!(decode_tabs(&raw).is_err());
    }

    #[test]
    fn active_tab_id_must_be_a_json_string() {
        let adapter = adapter_with(&[("roulette.activeTabId", "tab-1")]);
        assert_eq!(adapter.load_active_tab_id(), None);
        assert_eq!(decode_active_tab_id("\"tab-9\"").unwrap(), "tab-9");
    }

    #[test]
    fn oversized_history_is_truncated_not_discarded() {
        let entries: Vec<HistoryEntry> = (0..HISTORY_LIMIT + 3)
            .map(|i| HistoryEntry {
                winner: format!("w{i}"),
                tab_name: "Lunch".into(),
                timestamp: "2024-01-01T00:00:00.000Z".into(),
            })
            .collect();
        let raw = serde_json::to_string(&entries).unwrap();
        let adapter = adapter_with(&[("roulette.history", raw.as_str())]);

        let loaded = adapter.load_history().unwrap();
        assert_eq!(loaded.len(), HISTORY_LIMIT);
        assert_eq!(loaded[0].winner, "w0");
    }

    #[test]
    fn history_uses_camel_case_tab_name() {
        let adapter = adapter_with(&[(
            "roulette.history",
            r#"[{"winner":"Pizza","tabName":"Lunch","timestamp":"2024-05-01T12:00:00.000Z"}]"#,
        )]);
        let loaded = adapter.load_history().unwrap();
        assert_eq!(loaded[0].tab_name, "Lunch");
    }

    #[test]
    fn legacy_record_is_migrated() {
        let legacy = r#"[{"id":"tab-1","name":"Lunch","options":["Pizza","Burger"]}]"#;
        let adapter = adapter_with(&[(LEGACY_TABS_KEY, legacy)]);

        let tabs = adapter.load_tabs().unwrap();
        assert_eq!(tabs[0].options, vec!["Pizza".to_owned(), "Burger".to_owned()]);
        assert!(adapter.store().load("roulette.tabs").unwrap().is_some());
    }

    #[test]
    fn legacy_duplicates_and_overflow_are_repaired() {
        let mut crowded = Tab::new("tab-2", "Numbers");
        crowded.options = (0..MAX_OPTIONS + 5).map(|i| format!("n{i}")).collect();
        let mut legacy = vec![
            Tab::new("tab-1", "Lunch"),
            Tab::new("tab-3", "Movies"),
            crowded,
        ];
        legacy[0].options = vec!["Pizza".into(), "Burger".into()];
        legacy[1].options = vec!["Alien".into(), "Heat".into(), "Alien".into()];
        let raw = serde_json::to_string(&legacy).unwrap();
        let adapter = adapter_with(&[(LEGACY_TABS_KEY, raw.as_str())]);

        let tabs = adapter.load_tabs().unwrap();
        assert_eq!(tabs.len(), 3);
        assert_eq!(tabs[1].options, vec!["Alien".to_owned(), "Heat".to_owned()]);
        assert_eq!(tabs[2].options.len(), MAX_OPTIONS);
        assert_eq!(tabs[2].options[0], "n0");

        // Migrated copy passes the strict checks on the next load.
        let saved = adapter.store().load("roulette.tabs").unwrap().unwrap();
        assert_eq!(decode_tabs(&saved).unwrap(), tabs);
    }

    #[test]
    fn legacy_tabs_over_limit_are_cut() {
        let legacy: Vec<Tab> = (0..MAX_TABS + 2).map(|i| Tab::new(format!("tab-{i}"), "T")).collect();
        let raw = serde_json::to_string(&legacy).unwrap();
        assert_eq!(decode_legacy_tabs(&raw).unwrap().len(), MAX_TABS);
        assert!(decode_tabs(&raw).is_err());
    }

    #[test]
    fn backend_failures_are_swallowed() {
        let adapter = PersistenceAdapter::new(Arc::new(FailingStore), "roulette");
        assert_eq!(adapter.load_tabs(), None);
        assert!(!adapter.save_tabs(&[Tab::default_lunch()]));
        assert!(!adapter.save_history(&[]));
    }
}
