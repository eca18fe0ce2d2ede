//! Forwards wheel updates to JavaScript callbacks.
//!
//! The page owns the canvas. Each callback receives plain JS objects produced
//! by `serde-wasm-bindgen`: `(tab, rotation)` for frames and state changes,
//! `(outcome)` when a spin completes.
//!
//! Updates are queued while the wheel is borrowed and delivered by
//! [`Callbacks::dispatch`] once it is released, so a callback may call back
//! into the app (for example to refresh the history list).

use js_sys::Function;
use rl_core::{Renderer, SpinOutcome, Tab};
use serde::Serialize;
use wasm_bindgen::prelude::*;

pub enum RenderEvent {
    Frame(JsValue, f64),
    StateChanged(JsValue, f64),
    SpinComplete(JsValue),
}

/// Collects render events for later dispatch.
#[derive(Default)]
pub struct JsRenderer {
    pending: Vec<RenderEvent>,
}

impl JsRenderer {
    pub fn take_pending(&mut self) -> Vec<RenderEvent> {
        std::mem::take(&mut self.pending)
    }

    fn encode<T: Serialize>(what: &str, value: &T) -> Option<JsValue> {
        match serde_wasm_bindgen::to_value(value) {
            Ok(value) => Some(value),
            Err(e) => {
                gloo_console::error!(format!("failed to encode {what}: {e}"));
                None
            }
        }
    }
}

impl Renderer for JsRenderer {
    fn on_frame(&mut self, tab: &Tab, rotation: f64) {
        if let Some(tab) = Self::encode("tab", tab) {
            self.pending.push(RenderEvent::Frame(tab, rotation));
        }
    }

    fn on_state_changed(&mut self, tab: &Tab, rotation: f64) {
        if let Some(tab) = Self::encode("tab", tab) {
            self.pending.push(RenderEvent::StateChanged(tab, rotation));
        }
    }

    fn on_spin_complete(&mut self, outcome: &SpinOutcome) {
        if let Some(outcome) = Self::encode("outcome", outcome) {
            self.pending.push(RenderEvent::SpinComplete(outcome));
        }
    }
}

#[derive(Default)]
pub struct Callbacks {
    pub on_frame: Option<Function>,
    pub on_state_changed: Option<Function>,
    pub on_spin_complete: Option<Function>,
}

impl Callbacks {
    /// Delivers queued events in order. Must not be called while the wheel
    /// is borrowed.
    pub fn dispatch(&self, events: Vec<RenderEvent>) {
        for event in events {
            let result = match &event {
                RenderEvent::Frame(tab, rotation) => self
                    .on_frame
                    .as_ref()
                    .map(|cb| cb.call2(&JsValue::NULL, tab, &JsValue::from_f64(*rotation))),
                RenderEvent::StateChanged(tab, rotation) => self
                    .on_state_changed
                    .as_ref()
                    .map(|cb| cb.call2(&JsValue::NULL, tab, &JsValue::from_f64(*rotation))),
                RenderEvent::SpinComplete(outcome) => self
                    .on_spin_complete
                    .as_ref()
                    .map(|cb| cb.call1(&JsValue::NULL, outcome)),
            };
            if let Some(Err(e)) = result {
                gloo_console::error!("renderer callback threw", e);
            }
        }
    }
}
