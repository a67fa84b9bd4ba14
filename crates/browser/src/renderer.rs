//! The renderer seam between scroll/capture logic and CDP.

use std::time::Duration;

use {
    async_trait::async_trait,
    chromiumoxide::{Page, cdp::browser_protocol::page::CaptureScreenshotFormat},
    serde_json::Value,
    tokio::time::timeout,
};

use crate::error::BrowserError;

/// The rendering operations the scroller and capturer drive.
///
/// Implemented by [`CdpRenderer`] over a live Chromium page; tests implement
/// it with scripted fakes.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Navigate to `url` and wait for the initial load to finish.
    async fn navigate(&self, url: &str) -> Result<(), BrowserError>;

    /// Evaluate JavaScript in the page and return its value.
    async fn evaluate(&self, script: &str) -> Result<Value, BrowserError>;

    /// Wait until the page reaches a quiescent load state (content loaded,
    /// network idle), or return [`BrowserError::Timeout`] after `window`.
    async fn wait_quiescent(&self, window: Duration) -> Result<(), BrowserError>;

    /// Capture the full document (not viewport-clipped) as PNG bytes.
    async fn snapshot(&self) -> Result<Vec<u8>, BrowserError>;
}

/// [`Renderer`] backed by a chromiumoxide CDP page.
pub struct CdpRenderer {
    page: Page,
}

impl CdpRenderer {
    pub(crate) fn new(page: Page) -> Self {
        Self { page }
    }
}

#[async_trait]
impl Renderer for CdpRenderer {
    async fn navigate(&self, url: &str) -> Result<(), BrowserError> {
        self.page
            .goto(url)
            .await
            .map_err(|e| BrowserError::NavigationFailed(e.to_string()))?;
        // Wait for network idle before the caller starts scrolling.
        let _ = self.page.wait_for_navigation().await;
        Ok(())
    }

    async fn evaluate(&self, script: &str) -> Result<Value, BrowserError> {
        self.page
            .evaluate(script)
            .await
            .map_err(|e| BrowserError::JsEvalFailed(e.to_string()))?
            .into_value()
            .map_err(|e| BrowserError::JsEvalFailed(format!("failed to get result: {e:?}")))
    }

    async fn wait_quiescent(&self, window: Duration) -> Result<(), BrowserError> {
        // A navigation event may legitimately never arrive (nothing left to
        // load); only the elapsed window is reported, as a soft timeout.
        match timeout(window, self.page.wait_for_navigation()).await {
            Ok(_) => Ok(()),
            Err(_) => Err(BrowserError::Timeout(format!(
                "no quiescent load state within {}ms",
                window.as_millis()
            ))),
        }
    }

    async fn snapshot(&self) -> Result<Vec<u8>, BrowserError> {
        self.page
            .screenshot(
                chromiumoxide::page::ScreenshotParams::builder()
                    .format(CaptureScreenshotFormat::Png)
                    .full_page(true)
                    .build(),
            )
            .await
            .map_err(|e| BrowserError::ScreenshotFailed(e.to_string()))
    }
}
