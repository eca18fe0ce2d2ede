use crate::clock::{Clock, SystemClock};
use crate::history::HistoryLog;
use crate::ports::{Dialogs, Renderer};
use crate::tabs::TabStore;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rl_spin::{SpinEngine, SpinState, resolve};
use rl_storage::{KvStore, PersistenceAdapter};
use rl_types::{HistoryEntry, MIN_SPIN_OPTIONS, SpinOutcome, Tab, WheelConfig, WheelError, WheelResult};
use std::sync::Arc;
use tracing::{info, warn};

const DIALOG_TITLE: &str = "Roulette";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpinRequest {
    Started { target_rotation: f64 },
    /// A spin was already running; nothing changed.
    Ignored,
}

/// Ties tabs, history and the spin engine together and reports to the
/// renderer and dialog collaborators.
///
/// Tab and option changes are refused with `SpinInProgress` while the wheel
/// turns, so the winner is always resolved against the options the spin
/// started with.
pub struct WheelController<K, R, D> {
    tabs: TabStore<K>,
    history: HistoryLog<K>,
    engine: SpinEngine,
    renderer: R,
    dialogs: D,
    rng: Box<dyn RngCore>,
    config: WheelConfig,
    rotation: f64,
}

impl<K, R, D> WheelController<K, R, D>
where
    K: KvStore,
    R: Renderer,
    D: Dialogs,
{
    pub fn new(store: Arc<K>, renderer: R, dialogs: D, config: WheelConfig) -> Self {
        Self::with_providers(
            store,
            renderer,
            dialogs,
            config,
            Box::new(StdRng::from_entropy()),
            Arc::new(SystemClock),
        )
    }

    pub fn with_providers(
        store: Arc<K>,
        renderer: R,
        dialogs: D,
        config: WheelConfig,
        rng: Box<dyn RngCore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let config = config.validate();
        let persistence = PersistenceAdapter::new(store, &config.storage_namespace);
        let tabs = TabStore::load(persistence.clone());
        let history = HistoryLog::load(persistence, clock);

        let mut controller = Self {
            tabs,
            history,
            engine: SpinEngine::from_config(&config),
            renderer,
            dialogs,
            rng,
            config,
            rotation: 0.0,
        };
        controller.notify_state_changed();
        controller
    }

    pub fn tabs(&self) -> &[Tab] {
        self.tabs.tabs()
    }

    pub fn active_tab(&self) -> &Tab {
        self.tabs.active_tab()
    }

    pub fn history(&self) -> &[HistoryEntry] {
        self.history.entries()
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn spin_state(&self) -> SpinState {
        self.engine.state()
    }

    pub fn is_spinning(&self) -> bool {
        self.engine.is_spinning()
    }

    pub fn config(&self) -> &WheelConfig {
        &self.config
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn dialogs(&self) -> &D {
        &self.dialogs
    }

    pub fn dialogs_mut(&mut self) -> &mut D {
        &mut self.dialogs
    }

    // ── Spinning ──

    pub fn request_spin(&mut self) -> WheelResult<SpinRequest> {
        if self.engine.is_spinning() {
            return Ok(SpinRequest::Ignored);
        }

        let have = self.tabs.active_tab().options.len();
        if have < MIN_SPIN_OPTIONS {
            return self.surface(Err(WheelError::InsufficientOptions {
                have,
                need: MIN_SPIN_OPTIONS,
            }));
        }

        match self
            .engine
            .spin(self.rotation, self.config.spin_duration_ms, self.rng.as_mut())
        {
            Some(target_rotation) => Ok(SpinRequest::Started { target_rotation }),
            None => Ok(SpinRequest::Ignored),
        }
    }

    /// Advances a running spin to `timestamp_ms`. Returns the outcome on the
    /// frame that finishes the spin.
    pub fn on_animation_frame(&mut self, timestamp_ms: f64) -> Option<SpinOutcome> {
        let tick = self.engine.tick(timestamp_ms)?;
        self.rotation = tick.rotation;
        self.renderer.on_frame(self.tabs.active_tab(), tick.rotation);

        if !tick.finished {
            return None;
        }
        self.finish_spin(tick.rotation)
    }

    /// Feeds frame timestamps until the running spin produces an outcome.
    pub fn run_spin<I>(&mut self, timestamps: I) -> Option<SpinOutcome>
    where
        I: IntoIterator<Item = f64>,
    {
        timestamps
            .into_iter()
            .find_map(|timestamp| self.on_animation_frame(timestamp))
    }

    fn finish_spin(&mut self, rotation: f64) -> Option<SpinOutcome> {
        let tab = self.tabs.active_tab();
        let index = match resolve(rotation, tab.options.len()) {
            Ok(index) => index,
            Err(err) => {
                warn!("spin on {} finished without a winner: {}", tab.id, err);
                return None;
            }
        };

        let outcome = SpinOutcome {
            winner: tab.options[index].clone(),
            tab_name: tab.name.clone(),
            index,
            rotation,
        };
        info!("winner on {}: {} (slice {})", outcome.tab_name, outcome.winner, index);

        self.history.record(&outcome.winner, &outcome.tab_name);
        self.renderer.on_spin_complete(&outcome);
        Some(outcome)
    }

    // ── Tabs and options ──

    pub fn create_tab(&mut self, name: &str) -> WheelResult<Tab> {
        let result = self.ensure_idle().and_then(|()| self.tabs.create_tab(name));
        self.after_change(result)
    }

    pub fn rename_tab(&mut self, id: &str, new_name: &str) -> WheelResult<()> {
        let result = self.ensure_idle().and_then(|()| self.tabs.rename_tab(id, new_name));
        self.after_change(result)
    }

    pub fn delete_tab(&mut self, id: &str) -> WheelResult<()> {
        let result = self.ensure_idle().and_then(|()| self.tabs.delete_tab(id));
        self.after_change(result)
    }

    pub fn select_tab(&mut self, id: &str) -> WheelResult<()> {
        let result = self.ensure_idle().and_then(|()| self.tabs.select_tab(id));
        self.after_change(result)
    }

    /// Adds an option to the active tab.
    pub fn add_option(&mut self, text: &str) -> WheelResult<String> {
        let tab_id = self.tabs.active_tab_id().to_owned();
        self.add_option_to(&tab_id, text)
    }

    pub fn add_option_to(&mut self, tab_id: &str, text: &str) -> WheelResult<String> {
        let result = self.ensure_idle().and_then(|()| self.tabs.add_option(tab_id, text));
        self.after_change(result)
    }

    /// Removes an option from the active tab.
    pub fn remove_option(&mut self, index: usize) -> WheelResult<String> {
        let tab_id = self.tabs.active_tab_id().to_owned();
        self.remove_option_from(&tab_id, index)
    }

    pub fn remove_option_from(&mut self, tab_id: &str, index: usize) -> WheelResult<String> {
        let result = self.ensure_idle().and_then(|()| self.tabs.remove_option(tab_id, index));
        self.after_change(result)
    }

    // ── History ──

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    // ── Dialog-driven flows ──

    /// Asks before deleting. `Ok(false)` when the user declines.
    pub fn delete_tab_with_confirm(&mut self, id: &str) -> WheelResult<bool> {
        self.surface(self.ensure_idle())?;
        if self.tabs.tab(id).is_none() {
            return Err(WheelError::NotFound(id.to_owned()));
        }
        if self.tabs.len() <= 1 {
            return self.surface(Err(WheelError::LastTabProtected));
        }
        if !self.dialogs.confirm("Delete tab", "Delete this tab?") {
            return Ok(false);
        }
        self.delete_tab(id).map(|()| true)
    }

    /// Prompts for a new name. `Ok(false)` when cancelled or left blank.
    pub fn rename_tab_with_prompt(&mut self, id: &str) -> WheelResult<bool> {
        self.surface(self.ensure_idle())?;
        let current = self
            .tabs
            .tab(id)
            .map(|t| t.name.clone())
            .ok_or_else(|| WheelError::NotFound(id.to_owned()))?;

        let Some(new_name) = self.dialogs.prompt("Rename tab", "Enter new name:", &current) else {
            return Ok(false);
        };
        if new_name.trim().is_empty() {
            return Ok(false);
        }
        self.rename_tab(id, &new_name).map(|()| true)
    }

    pub fn clear_history_with_confirm(&mut self) -> bool {
        if self.history.is_empty() {
            return false;
        }
        if !self
            .dialogs
            .confirm("Clear history", "Clear all past spin results?")
        {
            return false;
        }
        self.clear_history();
        true
    }

    fn ensure_idle(&self) -> WheelResult<()> {
        if self.engine.is_spinning() {
            Err(WheelError::SpinInProgress)
        } else {
            Ok(())
        }
    }

    fn after_change<T>(&mut self, result: WheelResult<T>) -> WheelResult<T> {
        if result.is_ok() {
            self.notify_state_changed();
        }
        self.surface(result)
    }

    fn surface<T>(&mut self, result: WheelResult<T>) -> WheelResult<T> {
        if let Err(err) = &result {
            if err.is_user_facing() {
                self.dialogs.alert(DIALOG_TITLE, &err.user_message());
            }
        }
        result
    }

    fn notify_state_changed(&mut self) {
        self.renderer.on_state_changed(self.tabs.active_tab(), self.rotation);
    }
}
