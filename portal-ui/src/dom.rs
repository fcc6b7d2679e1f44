//! Blocking browser dialogs

/// Modal alert; errors and day listings use it
pub fn alert(message: &str) {
    let shown = web_sys::window().map(|w| w.alert_with_message(message));
    if !matches!(shown, Some(Ok(()))) {
        web_sys::console::warn_1(&format!("alert not shown: {message}").into());
    }
}

/// Yes/no prompt; a missing window counts as "no"
pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}
