use anyhow::{Context, Result};
use arboard::Clipboard;
use tracing::{debug, warn};

use crate::export::ExportPayload;

/// Maximum clipboard size (10MB) to prevent DoS attacks
const MAX_CLIPBOARD_SIZE: usize = 10 * 1024 * 1024;

/// Clipboard operations (allows mocking in tests)
pub trait ClipboardProvider {
    fn set_text(&mut self, text: &str) -> Result<()>;

    /// Write HTML with a plain-text alternative in a single clipboard update
    fn set_html(&mut self, html: &str, alt_text: &str) -> Result<()>;
}

/// Which write path a clipboard export ended up using
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardOutcome {
    /// Both HTML and plain text were written
    RichText,
    /// The rich write failed; only the plain text was written
    PlainTextFallback,
}

/// Real clipboard implementation using arboard
pub struct SystemClipboard {
    clipboard: Clipboard,
}

impl SystemClipboard {
    pub fn new() -> Result<Self> {
        let clipboard = Clipboard::new().context("Failed to initialize clipboard")?;
        Ok(Self { clipboard })
    }
}

impl ClipboardProvider for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.clipboard.set_text(text).context("Failed to set clipboard contents")?;
        Ok(())
    }

    fn set_html(&mut self, html: &str, alt_text: &str) -> Result<()> {
        self.clipboard
            .set_html(html, Some(alt_text))
            .context("Failed to set HTML clipboard contents")?;
        Ok(())
    }
}

/// Validates clipboard text without accessing system clipboard
fn validate_clipboard_text(text: &str) -> Result<()> {
    if text.is_empty() {
        anyhow::bail!("Cannot copy empty text to clipboard");
    }

    if text.len() > MAX_CLIPBOARD_SIZE {
        anyhow::bail!(
            "Text too large for clipboard ({} bytes, max {})",
            text.len(),
            MAX_CLIPBOARD_SIZE
        );
    }

    Ok(())
}

/// Write an export payload, falling back to plain text when the rich write fails.
///
/// # Errors
/// Returns error if:
/// - The plain text is empty or larger than 10MB
/// - Both the rich write and the plain-text fallback fail
pub fn write_payload(
    payload: &ExportPayload,
    provider: &mut dyn ClipboardProvider,
) -> Result<ClipboardOutcome> {
    validate_clipboard_text(&payload.plain_text)?;

    // An oversized HTML rendering goes straight to the plain-text path
    let rich_result = if payload.html.len() > MAX_CLIPBOARD_SIZE {
        Err(anyhow::anyhow!("HTML rendering too large ({} bytes)", payload.html.len()))
    } else {
        provider.set_html(&payload.html, &payload.plain_text)
    };

    match rich_result {
        Ok(()) => {
            debug!(bytes = payload.plain_text.len(), "wrote rich clipboard payload");
            Ok(ClipboardOutcome::RichText)
        }
        Err(err) => {
            warn!(error = %err, "rich clipboard write failed, falling back to plain text");
            provider
                .set_text(&payload.plain_text)
                .context("Plain-text clipboard fallback failed")?;
            Ok(ClipboardOutcome::PlainTextFallback)
        }
    }
}

/// Copy an export payload to the system clipboard.
///
/// # Platform Support
/// - macOS: pasteboard API
/// - Linux: X11 or Wayland (wl-clipboard)
/// - Windows: not officially supported
pub fn copy_payload_to_clipboard(payload: &ExportPayload) -> Result<ClipboardOutcome> {
    // Validate first, before initializing clipboard (for better error messages in CI)
    validate_clipboard_text(&payload.plain_text)?;

    let mut clipboard = SystemClipboard::new()?;
    write_payload(payload, &mut clipboard)
}
