//! Application-wide actions
//!
//! Actions that can be triggered from menus or keyboard shortcuts.

use gpui::actions;
use std::sync::Mutex;

// Define actions for menu items
actions!(
    app,
    [
        Quit,
        PickFile,
        ConvertFile,
        CancelConversion,
        OpenOutputDir,
        OpenLogDir,
    ]
);

/// Locators for files handed to the app by the OS
///
/// The open-URLs callback stores them here and ConverterView picks them up
/// during its polling loop.
pub static PENDING_OPEN_LOCATORS: Mutex<Vec<String>> = Mutex::new(Vec::new());

/// Add locators to be opened (called from the open-URLs callback)
pub fn push_pending_locators(locators: Vec<String>) {
    if let Ok(mut pending) = PENDING_OPEN_LOCATORS.lock() {
        pending.extend(locators);
    }
}

/// Take all pending locators (clears the queue)
pub fn take_pending_locators() -> Vec<String> {
    if let Ok(mut pending) = PENDING_OPEN_LOCATORS.lock() {
        std::mem::take(&mut *pending)
    } else {
        Vec::new()
    }
}
