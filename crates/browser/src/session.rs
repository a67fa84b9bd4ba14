//! Single-page browser session.
//!
//! sitediff reuses one page handle across all targets, so there is no pool:
//! launch once, hand out the renderer, close when every diff has resolved.

use {
    chromiumoxide::{
        Browser, BrowserConfig as CdpBrowserConfig,
        cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams,
        handler::viewport::Viewport,
    },
    futures::StreamExt,
    tokio::task::JoinHandle,
    tracing::{debug, info, warn},
};

use sitediff_config::CaptureConfig;

use crate::{detect, error::BrowserError, renderer::CdpRenderer};

pub struct BrowserSession {
    browser: Browser,
    events: JoinHandle<()>,
    renderer: CdpRenderer,
}

impl BrowserSession {
    /// Detect a Chromium binary, launch it with the configured viewport, and
    /// open the single page used for every capture.
    pub async fn launch(capture: &CaptureConfig) -> Result<Self, BrowserError> {
        let chrome = detect::detect_browser(capture.chrome_path.as_deref()).ok_or_else(|| {
            BrowserError::LaunchFailed(format!(
                "Chrome/Chromium not found. {}",
                detect::install_instructions()
            ))
        })?;

        let mut builder = CdpBrowserConfig::builder()
            .chrome_executable(&chrome)
            .viewport(Viewport {
                width: capture.viewport_width,
                height: capture.viewport_height,
                device_scale_factor: Some(1.0),
                emulating_mobile: false,
                is_landscape: true,
                has_touch: false,
            });

        if !capture.headless {
            builder = builder.with_head();
        }

        builder = builder
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--no-sandbox")
            .arg("--disable-setuid-sandbox");

        let config = builder.build().map_err(|e| {
            BrowserError::LaunchFailed(format!("failed to build browser config: {e}"))
        })?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

        // Drive CDP events for the lifetime of the session.
        let events = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                debug!(?event, "browser event");
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

        // Browser-level viewport is not always applied to new pages.
        let metrics = SetDeviceMetricsOverrideParams::builder()
            .width(capture.viewport_width)
            .height(capture.viewport_height)
            .device_scale_factor(1.0)
            .mobile(false)
            .build()
            .map_err(|e| BrowserError::Cdp(e.to_string()))?;
        if let Err(e) = page.execute(metrics).await {
            warn!(error = %e, "failed to set page viewport");
        }

        info!(
            chrome = %chrome.display(),
            viewport_width = capture.viewport_width,
            viewport_height = capture.viewport_height,
            headless = capture.headless,
            "browser session started"
        );

        Ok(Self {
            browser,
            events,
            renderer: CdpRenderer::new(page),
        })
    }

    /// The page handle shared by every target in the run.
    #[must_use]
    pub fn renderer(&self) -> &CdpRenderer {
        &self.renderer
    }

    /// Close the browser. Callers must not hold outstanding captures or
    /// diffs on this session's page when this is invoked.
    pub async fn close(mut self) -> Result<(), BrowserError> {
        if let Err(e) = self.browser.close().await {
            warn!(error = %e, "browser did not close cleanly");
        }
        self.events.abort();
        info!("browser session closed");
        Ok(())
    }
}
