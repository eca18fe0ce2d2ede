use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::warn;

/// Tunables for the wheel. Everything else (tab/option/history limits) is fixed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct WheelConfig {
    pub spin_duration_ms: f64,
    pub min_extra_spins: f64,
    pub max_extra_spins: f64,
    /// Prefix for the persisted record keys.
    pub storage_namespace: String,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            spin_duration_ms: 4000.0,
            min_extra_spins: 5.0,
            max_extra_spins: 10.0,
            storage_namespace: "roulette".to_owned(),
        }
    }
}

impl WheelConfig {
    /// Defaults overridden by `ROULETTE_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(v) = parse_var(&lookup, "ROULETTE_SPIN_DURATION_MS") {
            config.spin_duration_ms = v;
        }
        if let Some(v) = parse_var(&lookup, "ROULETTE_MIN_EXTRA_SPINS") {
            config.min_extra_spins = v;
        }
        if let Some(v) = parse_var(&lookup, "ROULETTE_MAX_EXTRA_SPINS") {
            config.max_extra_spins = v;
        }
        if let Some(ns) = lookup("ROULETTE_STORAGE_NAMESPACE") {
            let ns = ns.trim();
            if !ns.is_empty() {
                config.storage_namespace = ns.to_owned();
            }
        }
        config.validate()
    }

    /// Replaces out-of-range values with their defaults.
    pub fn validate(mut self) -> Self {
        let defaults = Self::default();
        if !self.spin_duration_ms.is_finite() || self.spin_duration_ms < 0.0 {
            warn!("invalid spin duration {}, using default", self.spin_duration_ms);
            self.spin_duration_ms = defaults.spin_duration_ms;
        }
        let spins_ok = self.min_extra_spins.is_finite()
            && self.max_extra_spins.is_finite()
            && self.min_extra_spins > 0.0
            && self.min_extra_spins < self.max_extra_spins;
        if !spins_ok {
            warn!(
                "invalid extra spin range [{}, {}), using default",
                self.min_extra_spins, self.max_extra_spins
            );
            self.min_extra_spins = defaults.min_extra_spins;
            self.max_extra_spins = defaults.max_extra_spins;
        }
        if self.storage_namespace.trim().is_empty() {
            self.storage_namespace = defaults.storage_namespace;
        }
        self
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("ignoring unparsable {}={:?}", key, raw);
            None
        }
    }
}
