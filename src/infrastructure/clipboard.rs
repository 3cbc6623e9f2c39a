use crate::domain::ClipboardReader;

/// System clipboard via arboard.
///
/// A fresh handle per read; arboard contexts are cheap and not `Sync`.
/// Unavailable clipboards (headless sessions, non-text contents) read as
/// `None` rather than failing the expansion.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }
}

impl ClipboardReader for SystemClipboard {
    fn read_text(&self) -> Option<String> {
        match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.get_text()) {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::debug!(error = %e, "Clipboard read failed");
                None
            }
        }
    }
}
