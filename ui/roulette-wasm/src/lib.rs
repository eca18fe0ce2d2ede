//! Roulette wheel WASM binding.
//!
//! Exposes the wheel controller to the page as `RouletteApp`, with
//! `localStorage` persistence, native browser dialogs, JS drawing callbacks
//! and a `requestAnimationFrame` spin loop.

pub mod dialogs;
pub mod frame;
pub mod renderer;
pub mod storage;

use dialogs::BrowserDialogs;
use js_sys::Function;
use renderer::{Callbacks, JsRenderer};
use rl_core::{SpinRequest, WheelConfig, WheelController, WheelError};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use storage::LocalStorageStore;
use wasm_bindgen::prelude::*;

type BrowserWheel = WheelController<LocalStorageStore, JsRenderer, BrowserDialogs>;

/// WASM entry point – called automatically when the module is instantiated.
#[wasm_bindgen(start)]
pub fn start() {
    // Improve panic messages in the browser console
    console_error_panic_hook::set_once();
}

#[wasm_bindgen]
pub struct RouletteApp {
    wheel: Rc<RefCell<BrowserWheel>>,
    callbacks: Rc<Callbacks>,
    frame: frame::FrameSlot,
}

#[wasm_bindgen]
impl RouletteApp {
    /// `config` is an optional plain object with `spinDurationMs`,
    /// `minExtraSpins`, `maxExtraSpins` and `storageNamespace`.
    #[wasm_bindgen(constructor)]
    pub fn new(
        on_frame: Option<Function>,
        on_state_changed: Option<Function>,
        on_spin_complete: Option<Function>,
        config: JsValue,
    ) -> Result<RouletteApp, JsValue> {
        let config: WheelConfig = if config.is_undefined() || config.is_null() {
            WheelConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };

        let callbacks = Rc::new(Callbacks {
            on_frame,
            on_state_changed,
            on_spin_complete,
        });
        let mut wheel = WheelController::new(Arc::new(LocalStorageStore), JsRenderer::default(), BrowserDialogs, config);
        gloo_console::log!(format!("roulette ready with {} tabs", wheel.tabs().len()));
        callbacks.dispatch(wheel.renderer_mut().take_pending());

        Ok(RouletteApp {
            wheel: Rc::new(RefCell::new(wheel)),
            callbacks,
            frame: frame::new_slot(),
        })
    }

    // ── Reads ──

    pub fn tabs(&self) -> Result<JsValue, JsValue> {
        self.read(|w| serde_wasm_bindgen::to_value(w.tabs()))
    }

    #[wasm_bindgen(js_name = activeTab)]
    pub fn active_tab(&self) -> Result<JsValue, JsValue> {
        self.read(|w| serde_wasm_bindgen::to_value(w.active_tab()))
    }

    pub fn history(&self) -> Result<JsValue, JsValue> {
        self.read(|w| serde_wasm_bindgen::to_value(w.history()))
    }

    pub fn rotation(&self) -> Result<f64, JsValue> {
        let w = self.wheel.try_borrow().map_err(|_| busy())?;
        Ok(w.rotation())
    }

    #[wasm_bindgen(js_name = isSpinning)]
    pub fn is_spinning(&self) -> Result<bool, JsValue> {
        let w = self.wheel.try_borrow().map_err(|_| busy())?;
        Ok(w.is_spinning())
    }

    // ── Spin ──

    /// Starts a spin. Resolves to `false` if one was already running.
    pub fn spin(&self) -> Result<bool, JsValue> {
        let request = self.write(|w| w.request_spin())?;
        let SpinRequest::Started { .. } = request else {
            return Ok(false);
        };

        let wheel = Rc::clone(&self.wheel);
        let callbacks = Rc::clone(&self.callbacks);
        frame::ensure_installed(&self.frame, move |timestamp| {
            let (spinning, events) = {
                let Ok(mut w) = wheel.try_borrow_mut() else {
                    // Busy; try again next frame.
                    return true;
                };
                w.on_animation_frame(timestamp);
                (w.is_spinning(), w.renderer_mut().take_pending())
            };
            callbacks.dispatch(events);
            spinning
        });
        frame::request(&self.frame);
        Ok(true)
    }

    // ── Tabs ──

    #[wasm_bindgen(js_name = createTab)]
    pub fn create_tab(&self, name: &str) -> Result<JsValue, JsValue> {
        let tab = self.write(|w| w.create_tab(name))?;
        Ok(serde_wasm_bindgen::to_value(&tab)?)
    }

    #[wasm_bindgen(js_name = selectTab)]
    pub fn select_tab(&self, id: &str) -> Result<(), JsValue> {
        self.write(|w| w.select_tab(id))
    }

    /// Prompts for a new name. `false` when cancelled.
    #[wasm_bindgen(js_name = renameTab)]
    pub fn rename_tab(&self, id: &str) -> Result<bool, JsValue> {
        self.write(|w| w.rename_tab_with_prompt(id))
    }

    /// Asks for confirmation first. `false` when declined.
    #[wasm_bindgen(js_name = deleteTab)]
    pub fn delete_tab(&self, id: &str) -> Result<bool, JsValue> {
        self.write(|w| w.delete_tab_with_confirm(id))
    }

    // ── Options ──

    #[wasm_bindgen(js_name = addOption)]
    pub fn add_option(&self, text: &str) -> Result<String, JsValue> {
        self.write(|w| w.add_option(text))
    }

    #[wasm_bindgen(js_name = removeOption)]
    pub fn remove_option(&self, index: usize) -> Result<String, JsValue> {
        self.write(|w| w.remove_option(index))
    }

    // ── History ──

    #[wasm_bindgen(js_name = clearHistory)]
    pub fn clear_history(&self) -> Result<bool, JsValue> {
        self.write(|w| Ok(w.clear_history_with_confirm()))
    }
}

impl RouletteApp {
    fn read<T, E>(&self, f: impl FnOnce(&BrowserWheel) -> Result<T, E>) -> Result<T, JsValue>
    where
        E: Into<JsValue>,
    {
        let w = self.wheel.try_borrow().map_err(|_| busy())?;
        f(&w).map_err(Into::into)
    }

    /// Runs `f` with the wheel borrowed, then delivers the render events it
    /// queued after the borrow is released.
    fn write<T>(&self, f: impl FnOnce(&mut BrowserWheel) -> Result<T, WheelError>) -> Result<T, JsValue> {
        let (result, events) = {
            let mut w = self.wheel.try_borrow_mut().map_err(|_| busy())?;
            let result = f(&mut w);
            (result, w.renderer_mut().take_pending())
        };
        self.callbacks.dispatch(events);
        result.map_err(|e| to_js_error(&e))
    }
}

fn busy() -> JsValue {
    JsValue::from_str("roulette is busy with another call")
}

fn to_js_error(err: &WheelError) -> JsValue {
    JsValue::from_str(&err.to_string())
}
