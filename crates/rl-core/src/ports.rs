//! Collaborators the wheel talks to but does not implement.

use rl_types::{SpinOutcome, Tab};

/// Draws the wheel. Rotation is in radians, clockwise.
pub trait Renderer {
    /// Called on every animation tick of a spin.
    fn on_frame(&mut self, tab: &Tab, rotation: f64);
    /// Called after the active tab or its options change.
    fn on_state_changed(&mut self, tab: &Tab, rotation: f64);
    fn on_spin_complete(&mut self, _outcome: &SpinOutcome) {}
}

/// Confirmation, input and notice dialogs.
pub trait Dialogs {
    fn confirm(&mut self, title: &str, message: &str) -> bool;
    fn prompt(&mut self, title: &str, message: &str, default: &str) -> Option<String>;
    fn alert(&mut self, title: &str, message: &str);
}

#[derive(Default)]
pub struct NoopRenderer;

impl Renderer for NoopRenderer {
    fn on_frame(&mut self, _tab: &Tab, _rotation: f64) {}

    fn on_state_changed(&mut self, _tab: &Tab, _rotation: f64) {}
}

/// Accepts every confirmation and cancels every prompt.
#[derive(Default)]
pub struct NoopDialogs;

impl Dialogs for NoopDialogs {
    fn confirm(&mut self, _title: &str, _message: &str) -> bool {
        true
    }

    fn prompt(&mut self, _title: &str, _message: &str, _default: &str) -> Option<String> {
        None
    }

    fn alert(&mut self, _title: &str, _message: &str) {}
}
