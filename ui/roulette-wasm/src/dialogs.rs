//! Native browser dialogs (`confirm`, `prompt`, `alert`).
//!
//! The browser shows no title, so only the message is used.

use rl_core::Dialogs;

#[derive(Default)]
pub struct BrowserDialogs;

impl Dialogs for BrowserDialogs {
    fn confirm(&mut self, _title: &str, message: &str) -> bool {
        web_sys::window()
            .and_then(|w| w.confirm_with_message(message).ok())
            .unwrap_or(false)
    }

    fn prompt(&mut self, _title: &str, message: &str, default: &str) -> Option<String> {
        web_sys::window()?
            .prompt_with_message_and_default(message, default)
            .ok()
            .flatten()
    }

    fn alert(&mut self, _title: &str, message: &str) {
        if let Some(w) = web_sys::window() {
            let _ = w.alert_with_message(message);
        }
    }
}
