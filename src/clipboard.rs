//! System clipboard access.
//!
//! One-shot commands use [`copy`]. The interactive form keeps a
//! [`SessionClipboard`], which remembers the password it copied so that the
//! clipboard is cleared when the timer fires or when the session ends,
//! whichever comes first. Either way the clipboard is only cleared if it
//! still holds that password.

use crate::error::{PassError, Result};
use copypasta::{ClipboardContext, ClipboardProvider};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::debug;
use zeroize::Zeroizing;

/// Opens a clipboard handle. Each use gets a fresh handle.
pub type ClipboardFactory = Arc<dyn Fn() -> Result<Box<dyn ClipboardProvider>> + Send + Sync>;

/// Handle to the system clipboard.
pub fn system_clipboard() -> Result<Box<dyn ClipboardProvider>> {
    let ctx = ClipboardContext::new().map_err(|_| PassError::ClipboardFailed)?;
    Ok(Box::new(ctx))
}

/// Copy text to the system clipboard.
pub fn copy(text: &str) -> Result<()> {
    system_clipboard()?
        .set_contents(text.to_string())
        .map_err(|_| PassError::ClipboardFailed)
}

/// Clear the clipboard if it still holds `text`. Returns whether it did.
fn clear_if_holding(open: &ClipboardFactory, text: &str) -> Result<bool> {
    let mut ctx = open()?;
    let current = ctx.get_contents().map_err(|_| PassError::ClipboardFailed)?;
    if current != text {
        return Ok(false);
    }

    ctx.set_contents(String::new())
        .map_err(|_| PassError::ClipboardFailed)?;
    Ok(true)
}

struct PendingClear {
    text: Zeroizing<String>,
    timer: JoinHandle<()>,
}

/// Clipboard owned by an interactive session.
pub struct SessionClipboard {
    open: ClipboardFactory,
    pending: Option<PendingClear>,
}

impl SessionClipboard {
    /// Session clipboard backed by the system clipboard.
    pub fn system() -> Self {
        Self::with_factory(Arc::new(system_clipboard))
    }

    pub fn with_factory(open: ClipboardFactory) -> Self {
        Self {
            open,
            pending: None,
        }
    }

    /// Copy text and clear it again after `timeout_secs`. A timeout of 0
    /// leaves it on the clipboard, even after the session ends.
    ///
    /// Must be called from within a tokio runtime.
    pub fn copy(&mut self, text: &str, timeout_secs: u64) -> Result<()> {
        if let Some(previous) = self.pending.take() {
            previous.timer.abort();
        }

        (self.open)()?
            .set_contents(text.to_string())
            .map_err(|_| PassError::ClipboardFailed)?;

        if timeout_secs == 0 {
            return Ok(());
        }

        let open = Arc::clone(&self.open);
        let text_to_clear = Zeroizing::new(text.to_string());
        let timer = tokio::spawn(async move {
            sleep(Duration::from_secs(timeout_secs)).await;
            if let Ok(true) = clear_if_holding(&open, &text_to_clear) {
                debug!("cleared clipboard after timeout");
            }
        });

        self.pending = Some(PendingClear {
            text: Zeroizing::new(text.to_string()),
            timer,
        });
        Ok(())
    }

    /// Cancel the timer and clear the clipboard now if it still holds the
    /// last copied password. Returns whether anything was cleared.
    pub fn finish(&mut self) -> Result<bool> {
        let Some(pending) = self.pending.take() else {
            return Ok(false);
        };
        pending.timer.abort();

        let cleared = clear_if_holding(&self.open, &pending.text)?;
        if cleared {
            debug!("cleared clipboard at end of session");
        }
        Ok(cleared)
    }
}

impl Drop for SessionClipboard {
    fn drop(&mut self) {
        let _ = self.finish();
    }
}
