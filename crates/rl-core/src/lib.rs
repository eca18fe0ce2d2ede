//! Roulette wheel core: tabs, history and spin orchestration.

pub mod clock;
pub mod controller;
pub mod history;
pub mod ports;
pub mod tabs;

pub use clock::{Clock, FixedClock, SystemClock, iso8601};
pub use controller::{SpinRequest, WheelController};
pub use history::HistoryLog;
pub use ports::{Dialogs, NoopDialogs, NoopRenderer, Renderer};
pub use tabs::TabStore;

pub use rl_spin::{SpinState, SpinTick, resolve};
pub use rl_storage::{InMemoryStore, JsonFileStore, KvStore, PersistenceAdapter};
pub use rl_types::{
    HISTORY_LIMIT, HistoryEntry, MAX_OPTIONS, MAX_TABS, SpinOutcome, Tab, WheelConfig, WheelError, WheelResult,
};
