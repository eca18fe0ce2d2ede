#![cfg(target_arch = "wasm32")]

use gloo_storage::{LocalStorage, Storage};
use js_sys::Function;
use rl_core::WheelConfig;
use roulette_wasm::RouletteApp;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};

wasm_bindgen_test_configure!(run_in_browser);

fn config(namespace: &str) -> JsValue {
    LocalStorage::clear();
    let config = WheelConfig {
        storage_namespace: namespace.to_owned(),
        ..WheelConfig::default()
    };
    serde_wasm_bindgen::to_value(&config).unwrap()
}

#[wasm_bindgen_test]
fn state_callback_can_read_the_app() {
    let app_slot: Rc<RefCell<Option<Rc<RouletteApp>>>> = Rc::new(RefCell::new(None));
    let reads: Rc<RefCell<Vec<bool>>> = Rc::new(RefCell::new(Vec::new()));

    let on_state_changed = {
        let app_slot = Rc::clone(&app_slot);
        let reads = Rc::clone(&reads);
        Closure::wrap(Box::new(move |_tab: JsValue, _rotation: f64| {
            if let Some(app) = app_slot.borrow().as_ref() {
                reads
                    .borrow_mut()
                    .push(app.history().is_ok() && app.rotation().is_ok());
            }
        }) as Box<dyn FnMut(JsValue, f64)>)
    };
    let callback: Function = on_state_changed.as_ref().unchecked_ref::<Function>().clone();

    let app = RouletteApp::new(None, Some(callback), None, config("callbacks-test")).unwrap();
    let app = Rc::new(app);
    *app_slot.borrow_mut() = Some(Rc::clone(&app));

    assert_eq!(app.add_option("Ramen").unwrap(), "Ramen");
    assert_eq!(*reads.borrow(), vec![true]);

    *app_slot.borrow_mut() = None;
    drop(on_state_changed);
}

#[wasm_bindgen_test]
fn idle_app_reports_rotation() {
    let app = RouletteApp::new(None, None, None, config("rotation-test")).unwrap();
    assert_eq!(app.rotation().unwrap(), 0.0);
    assert!(!app.is_spinning().unwrap());
}
