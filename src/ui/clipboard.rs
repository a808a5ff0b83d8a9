use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// How long `copied` stays true after a successful write.
pub const COPIED_RESET_DELAY: Duration = Duration::from_millis(2000);

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("Clipboard write rejected: {0}")]
    Rejected(String),
}

#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Process-local clipboard, for headless use.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn contents(&self) -> Option<String> {
        self.contents.lock().ok().and_then(|guard| guard.clone())
    }
}

#[async_trait]
impl Clipboard for MemoryClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut guard = self
            .contents
            .lock()
            .map_err(|e| ClipboardError::Rejected(e.to_string()))?;
        *guard = Some(text.to_string());
        Ok(())
    }
}

/// Copy-to-clipboard with a transient `copied` flag.
///
/// Each call owns its own revert timer and earlier timers are not cancelled,
/// so a second copy within the delay can be reverted early by the first.
#[derive(Clone)]
pub struct ClipboardHook {
    clipboard: Arc<dyn Clipboard>,
    copied: Arc<watch::Sender<bool>>,
}

impl ClipboardHook {
    pub fn new(clipboard: Arc<dyn Clipboard>) -> Self {
        let (tx, _) = watch::channel(false);
        Self {
            clipboard,
            copied: Arc::new(tx),
        }
    }

    pub fn copied(&self) -> bool {
        *self.copied.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.copied.subscribe()
    }

    /// Write `text` in the background. Failures leave `copied` untouched.
    pub fn copy(&self, text: impl Into<String>) -> JoinHandle<()> {
        let text = text.into();
        let clipboard = Arc::clone(&self.clipboard);
        let copied = Arc::clone(&self.copied);

        tokio::spawn(async move {
            if let Err(e) = clipboard.write_text(&text).await {
                tracing::debug!("{}", e);
                return;
            }

            copied.send_replace(true);
            tokio::time::sleep(COPIED_RESET_DELAY).await;
            copied.send_replace(false);
        })
    }
}
