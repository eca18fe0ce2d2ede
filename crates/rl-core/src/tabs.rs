use rl_storage::{KvStore, PersistenceAdapter};
use rl_types::{MAX_OPTIONS, MAX_TABS, Tab, WheelError, WheelResult};
use tracing::{debug, info};
use uuid::Uuid;

/// Owns the tabs and the active-tab reference.
///
/// There is always at least one tab and the active id always names one of
/// them. Every successful mutation is written through before returning.
pub struct TabStore<K> {
    tabs: Vec<Tab>,
    active_tab_id: String,
    persistence: PersistenceAdapter<K>,
}

impl<K> TabStore<K>
where
    K: KvStore,
{
    /// Loads stored tabs, falling back to the default `Lunch` tab when the
    /// record is missing or unusable.
    pub fn load(persistence: PersistenceAdapter<K>) -> Self {
        let (tabs, restored) = match persistence.load_tabs() {
            Some(tabs) => (tabs, true),
            None => (vec![Tab::default_lunch()], false),
        };

        let active_tab_id = persistence
            .load_active_tab_id()
            .filter(|id| tabs.iter().any(|t| &t.id == id))
            .unwrap_or_else(|| tabs[0].id.clone());

        let store = Self {
            tabs,
            active_tab_id,
            persistence,
        };
        if restored {
            info!("restored {} tabs, active {}", store.tabs.len(), store.active_tab_id);
        } else {
            info!("no usable stored tabs, seeding defaults");
            store.persist();
        }
        store
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn tab(&self, id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    pub fn active_tab_id(&self) -> &str {
        &self.active_tab_id
    }

    pub fn active_tab(&self) -> &Tab {
        self.tab(&self.active_tab_id).unwrap_or(&self.tabs[0])
    }

    pub fn create_tab(&mut self, name: &str) -> WheelResult<Tab> {
        if self.tabs.len() >= MAX_TABS {
            return Err(WheelError::CapacityExceeded {
                what: "tabs",
                limit: MAX_TABS,
            });
        }

        let name = match name.trim() {
            "" => format!("Tab {}", self.tabs.len() + 1),
            trimmed => trimmed.to_owned(),
        };
        let tab = Tab::new(self.fresh_id(), name);

        self.tabs.push(tab.clone());
        self.active_tab_id = tab.id.clone();
        self.persist();
        info!("created tab {} ({})", tab.id, tab.name);
        Ok(tab)
    }

    pub fn rename_tab(&mut self, id: &str, new_name: &str) -> WheelResult<()> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(WheelError::EmptyInput("tab name"));
        }
        let tab = self.tab_mut(id)?;
        tab.name = new_name.to_owned();
        self.persist();
        Ok(())
    }

    pub fn delete_tab(&mut self, id: &str) -> WheelResult<()> {
        let position = self
            .tabs
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| WheelError::NotFound(id.to_owned()))?;
        if self.tabs.len() <= 1 {
            return Err(WheelError::LastTabProtected);
        }

        let removed = self.tabs.remove(position);
        if self.active_tab_id == removed.id {
            self.active_tab_id = self.tabs[0].id.clone();
        }
        self.persist();
        info!("deleted tab {} ({}), active {}", removed.id, removed.name, self.active_tab_id);
        Ok(())
    }

    pub fn select_tab(&mut self, id: &str) -> WheelResult<()> {
        if self.tab(id).is_none() {
            return Err(WheelError::NotFound(id.to_owned()));
        }
        self.active_tab_id = id.to_owned();
        self.persistence.save_active_tab_id(&self.active_tab_id);
        Ok(())
    }

    /// Appends a trimmed option. Returns the stored text.
    pub fn add_option(&mut self, tab_id: &str, text: &str) -> WheelResult<String> {
        let text = text.trim();
        if text.is_empty() {
            return Err(WheelError::EmptyInput("option"));
        }
        let tab = self.tab_mut(tab_id)?;
        if tab.has_option(text) {
            return Err(WheelError::DuplicateOption(text.to_owned()));
        }
        if tab.options.len() >= MAX_OPTIONS {
            return Err(WheelError::CapacityExceeded {
                what: "options",
                limit: MAX_OPTIONS,
            });
        }

        tab.options.push(text.to_owned());
        debug!("added option {:?} to {}", text, tab_id);
        self.persist_tabs();
        Ok(text.to_owned())
    }

    /// Removes the option at `index`, shifting later options down.
    pub fn remove_option(&mut self, tab_id: &str, index: usize) -> WheelResult<String> {
        let tab = self.tab_mut(tab_id)?;
        if index >= tab.options.len() {
            return Err(WheelError::IndexOutOfRange {
                index,
                len: tab.options.len(),
            });
        }

        let removed = tab.options.remove(index);
        debug!("removed option {:?} from {}", removed, tab_id);
        self.persist_tabs();
        Ok(removed)
    }

    fn tab_mut(&mut self, id: &str) -> WheelResult<&mut Tab> {
        self.tabs
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| WheelError::NotFound(id.to_owned()))
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = format!("tab-{}", Uuid::new_v4());
            if self.tab(&id).is_none() {
                return id;
            }
        }
    }

    fn persist_tabs(&self) {
        self.persistence.save_tabs(&self.tabs);
    }

    fn persist(&self) {
        self.persist_tabs();
        self.persistence.save_active_tab_id(&self.active_tab_id);
    }
}
