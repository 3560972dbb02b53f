//! Best-effort system clipboard sink.

/// Publish `text` as the clipboard's Unicode text contents. Failures are
/// logged and otherwise swallowed; a missed copy never interrupts the
/// overlay session.
pub fn set_text(text: &str) {
    let mut clipboard = match arboard::Clipboard::new() {
        Ok(clipboard) => clipboard,
        Err(e) => {
            tracing::warn!("failed to open clipboard: {e}");
            return;
        }
    };
    if let Err(e) = clipboard.set_text(text.to_owned()) {
        tracing::warn!("failed to publish overlay text to clipboard: {e}");
    }
}
