use serde::{Deserialize, Serialize};

mod config;
mod error;

pub use config::WheelConfig;
pub use error::{WheelError, WheelResult};

pub const MAX_TABS: usize = 10;
pub const MAX_OPTIONS: usize = 50;
pub const HISTORY_LIMIT: usize = 20;

/// Fewest options a wheel needs before it can be spun.
pub const MIN_SPIN_OPTIONS: usize = 2;

pub const DEFAULT_TAB_ID: &str = "tab-1";
pub const DEFAULT_TAB_NAME: &str = "Lunch";
pub const DEFAULT_OPTIONS: [&str; 5] = ["Pizza", "Burger", "Salad", "Sushi", "Tacos"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tab {
    pub id: String,
    pub name: String,
    pub options: Vec<String>,
}

impl Tab {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            options: Vec::new(),
        }
    }

    /// The tab seeded on first run and whenever stored tabs are unusable.
    pub fn default_lunch() -> Self {
        Self {
            id: DEFAULT_TAB_ID.to_owned(),
            name: DEFAULT_TAB_NAME.to_owned(),
            options: DEFAULT_OPTIONS.iter().map(|o| (*o).to_owned()).collect(),
        }
    }

    pub fn has_option(&self, text: &str) -> bool {
        self.options.iter().any(|o| o == text)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryEntry {
    pub winner: String,
    #[serde(rename = "tabName")]
    pub tab_name: String,
    /// ISO-8601 UTC timestamp.
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpinOutcome {
    pub winner: String,
    #[serde(rename = "tabName")]
    pub tab_name: String,
    pub index: usize,
    pub rotation: f64,
}
