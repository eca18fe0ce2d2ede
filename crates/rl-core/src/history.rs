use crate::clock::{Clock, iso8601};
use rl_storage::{KvStore, PersistenceAdapter};
use rl_types::{HISTORY_LIMIT, HistoryEntry};
use std::sync::Arc;
use tracing::info;

/// Newest-first record of spin results, capped at [`HISTORY_LIMIT`].
pub struct HistoryLog<K> {
    entries: Vec<HistoryEntry>,
    clock: Arc<dyn Clock>,
    persistence: PersistenceAdapter<K>,
}

impl<K> HistoryLog<K>
where
    K: KvStore,
{
    pub fn load(persistence: PersistenceAdapter<K>, clock: Arc<dyn Clock>) -> Self {
        let entries = persistence.load_history().unwrap_or_default();
        Self {
            entries,
            clock,
            persistence,
        }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn record(&mut self, winner: &str, tab_name: &str) -> HistoryEntry {
        let entry = HistoryEntry {
            winner: winner.to_owned(),
            tab_name: tab_name.to_owned(),
            timestamp: iso8601(self.clock.now()),
        };
        self.entries.insert(0, entry.clone());
        self.entries.truncate(HISTORY_LIMIT);
        self.persistence.save_history(&self.entries);
        entry
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.persistence.save_history(&self.entries);
        info!("history cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::{Duration, TimeZone, Utc};
    use rl_storage::InMemoryStore;

    #[test]
    fn record_uses_injected_clock() {
        let clock = Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2024, 3, 9, 18, 30, 0).unwrap()));
        let adapter = PersistenceAdapter::new(Arc::new(InMemoryStore::new()), "roulette");
        let mut log = HistoryLog::load(adapter, clock.clone());

        log.record("Pizza", "Lunch");
        clock.advance(Duration::milliseconds(250));
        let second = log.record("Sushi", "Lunch");

        assert_eq!(second.timestamp, "2024-03-09T18:30:00.250Z");
        assert_eq!(log.entries()[1].timestamp, "2024-03-09T18:30:00.000Z");
    }

    #[test]
    fn clear_persists_empty_list() {
        let store = Arc::new(InMemoryStore::new());
        let adapter = PersistenceAdapter::new(store.clone(), "roulette");
        let mut log = HistoryLog::load(adapter, Arc::new(crate::clock::SystemClock));

        log.record("Tacos", "Lunch");
        log.clear();

        assert!(log.is_empty());
        assert_eq!(store.load("roulette.history").unwrap().as_deref(), Some("[]"));
    }
}
