use crate::browser;

/// Modal questions to the player
pub trait Dialog {
    /// `None` when the player cancels
    fn prompt(&self, message: &str) -> Option<String>;
    fn confirm(&self, message: &str) -> bool;
    fn alert(&self, message: &str);
}

/// `window.prompt` / `confirm` / `alert`
pub struct WebDialog;

impl Dialog for WebDialog {
    fn prompt(&self, message: &str) -> Option<String> {
        let window = browser::window().ok()?;
        match window.prompt_with_message(message) {
            Ok(answer) => answer,
            Err(err) => {
                error!("[dialog] prompt failed : {:#?}", err);
                None
            }
        }
    }

    fn confirm(&self, message: &str) -> bool {
        browser::window()
            .ok()
            .and_then(|window| window.confirm_with_message(message).ok())
            .unwrap_or(false)
    }

    fn alert(&self, message: &str) {
        match browser::window() {
            Ok(window) => {
                if let Err(err) = window.alert_with_message(message) {
                    error!("[dialog] alert failed : {:#?}", err);
                }
            }
            Err(err) => error!("[dialog] {:#?}", err),
        }
    }
}
