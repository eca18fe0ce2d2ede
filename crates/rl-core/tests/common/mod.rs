// Shared fixtures for the rl-core integration tests.
#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rl_core::{Dialogs, FixedClock, InMemoryStore, Renderer, SpinOutcome, Tab, WheelConfig, WheelController};
use std::collections::VecDeque;
use std::sync::{Arc, Once};

static TRACING: Once = Once::new();

pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

#[derive(Default)]
pub struct RecordingRenderer {
    pub frames: Vec<f64>,
    pub state_changes: Vec<(String, usize)>,
    pub outcomes: Vec<SpinOutcome>,
}

impl Renderer for RecordingRenderer {
    fn on_frame(&mut self, _tab: &Tab, rotation: f64) {
        self.frames.push(rotation);
    }

    fn on_state_changed(&mut self, tab: &Tab, _rotation: f64) {
        self.state_changes.push((tab.id.clone(), tab.options.len()));
    }

    fn on_spin_complete(&mut self, outcome: &SpinOutcome) {
        self.outcomes.push(outcome.clone());
    }
}

/// Dialogs that answer from queues and remember every alert.
#[derive(Default)]
pub struct ScriptedDialogs {
    pub confirms: VecDeque<bool>,
    pub prompts: VecDeque<Option<String>>,
    pub alerts: Vec<String>,
    pub asked: Vec<String>,
}

impl Dialogs for ScriptedDialogs {
    fn confirm(&mut self, title: &str, _message: &str) -> bool {
        self.asked.push(title.to_owned());
        self.confirms.pop_front().unwrap_or(false)
    }

    fn prompt(&mut self, title: &str, _message: &str, _default: &str) -> Option<String> {
        self.asked.push(title.to_owned());
        self.prompts.pop_front().flatten()
    }

    fn alert(&mut self, _title: &str, message: &str) {
        self.alerts.push(message.to_owned());
    }
}

pub type TestWheel = WheelController<InMemoryStore, RecordingRenderer, ScriptedDialogs>;

pub fn test_wheel(store: Arc<InMemoryStore>, seed: u64) -> TestWheel {
    init_tracing();
    let clock = Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()));
    WheelController::with_providers(
        store,
        RecordingRenderer::default(),
        ScriptedDialogs::default(),
        WheelConfig::default(),
        Box::new(StdRng::seed_from_u64(seed)),
        clock,
    )
}

/// 60 fps frame timestamps covering `duration_ms` and a little more.
pub fn frames(duration_ms: f64) -> impl Iterator<Item = f64> {
    let step = 1000.0 / 60.0;
    let count = (duration_ms / step).ceil() as usize + 2;
    (0..count).map(move |i| 500.0 + i as f64 * step)
}
