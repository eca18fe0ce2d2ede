//! `requestAnimationFrame` loop driving a spin.
//!
//! One closure is created per app and reused for every spin. It re-schedules
//! itself while the wheel is still spinning and stops on the terminal frame.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

pub type FrameSlot = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

pub fn new_slot() -> FrameSlot {
    Rc::new(RefCell::new(None))
}

/// Installs the frame callback on first use. `on_frame` returns whether
/// another frame is needed.
pub fn ensure_installed<F>(slot: &FrameSlot, mut on_frame: F)
where
    F: FnMut(f64) -> bool + 'static,
{
    if slot.borrow().is_some() {
        return;
    }
    let weak: Weak<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::downgrade(slot);
    let cb = Closure::wrap(Box::new(move |timestamp: f64| {
        if on_frame(timestamp) {
            if let Some(slot) = weak.upgrade() {
                request(&slot);
            }
        }
    }) as Box<dyn FnMut(f64)>);
    *slot.borrow_mut() = Some(cb);
}

/// Schedules the installed callback for the next frame.
pub fn request(slot: &FrameSlot) {
    let Some(window) = web_sys::window() else {
        gloo_console::error!("no window, cannot animate");
        return;
    };
    if let Some(cb) = slot.borrow().as_ref() {
        if let Err(e) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
            gloo_console::error!("requestAnimationFrame failed", e);
        }
    }
}
