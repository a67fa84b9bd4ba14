//! Lazy-load-aware scrolling.
//!
//! Pages with lazy-loaded content only materialize it once scrolled into
//! view, so a full-page capture is only trustworthy after stepping through
//! the whole document height. Loading that content can itself grow the
//! document, which is why the height is re-read after every step instead of
//! being cached; caching it terminates the scan early and truncates the
//! capture.

use std::time::Duration;

use tracing::{debug, warn};

use crate::{error::BrowserError, renderer::Renderer};

/// JavaScript returning the total scrollable document height.
pub(crate) const SCROLL_HEIGHT_JS: &str = "document.documentElement.scrollHeight";

/// JavaScript scrolling the viewport to a vertical offset.
pub(crate) fn scroll_to_js(offset: u64) -> String {
    format!("window.scrollTo(0, {offset}); true")
}

/// Outcome of a settle pass, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollStats {
    /// Scroll steps taken.
    pub steps: u64,
    /// Settle waits that hit the timeout window.
    pub timeouts: u64,
    /// Document height after the last step.
    pub final_height: u64,
}

/// Step the page to the bottom so lazy content loads before capture.
///
/// Advances the scroll offset by `step` pixels at a time, waiting up to
/// `settle_timeout` for a quiescent load state after each step. A wait that
/// times out is soft: it is logged and counted, and the scan proceeds with
/// the last known height — trading completeness for forward progress.
pub async fn settle<R: Renderer + ?Sized>(
    renderer: &R,
    step: u64,
    settle_timeout: Duration,
) -> Result<ScrollStats, BrowserError> {
    if step == 0 {
        return Err(BrowserError::InvalidScrollStep(0));
    }

    let mut height = scroll_height(renderer).await?;
    let mut position = 0u64;
    let mut stats = ScrollStats {
        steps: 0,
        timeouts: 0,
        final_height: height,
    };

    while position < height {
        stats.steps += 1;
        position = stats.steps * step;
        renderer.evaluate(&scroll_to_js(position)).await?;

        match renderer.wait_quiescent(settle_timeout).await {
            Ok(()) => {},
            Err(BrowserError::Timeout(_)) => {
                stats.timeouts += 1;
                warn!(
                    offset = position,
                    "settle wait timed out, proceeding to next offset"
                );
            },
            Err(e) => return Err(e),
        }

        // Lazy content may have grown the document.
        height = scroll_height(renderer).await?;
        debug!(offset = position, height, "scroll step settled");
    }

    stats.final_height = height;
    Ok(stats)
}

async fn scroll_height<R: Renderer + ?Sized>(renderer: &R) -> Result<u64, BrowserError> {
    let value = renderer.evaluate(SCROLL_HEIGHT_JS).await?;
    value.as_u64().ok_or_else(|| {
        BrowserError::JsEvalFailed(format!("scrollHeight was not an integer: {value}"))
    })
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        serde_json::{Value, json},
        std::sync::Mutex,
    };

    use super::*;

    /// Scripted renderer: a document height plus optional growth triggered
    /// the first time a given scroll offset is visited.
    struct FakeRenderer {
        height: Mutex<u64>,
        grow_after: Mutex<Vec<(u64, u64)>>,
        time_out_waits: bool,
        offsets: Mutex<Vec<u64>>,
    }

    impl FakeRenderer {
        fn with_height(height: u64) -> Self {
            Self {
                height: Mutex::new(height),
                grow_after: Mutex::new(Vec::new()),
                time_out_waits: false,
                offsets: Mutex::new(Vec::new()),
            }
        }

        fn grow_at(self, offset: u64, new_height: u64) -> Self {
            self.grow_after.lock().unwrap().push((offset, new_height));
            self
        }
    }

    #[async_trait::async_trait]
    impl Renderer for FakeRenderer {
        async fn navigate(&self, _url: &str) -> Result<(), BrowserError> {
            Ok(())
        }

        async fn evaluate(&self, script: &str) -> Result<Value, BrowserError> {
            if script == SCROLL_HEIGHT_JS {
                return Ok(json!(*self.height.lock().unwrap()));
            }
            if let Some(rest) = script.strip_prefix("window.scrollTo(0, ") {
                let offset: u64 = rest.trim_end_matches("); true").parse().unwrap();
                self.offsets.lock().unwrap().push(offset);
                let mut grow = self.grow_after.lock().unwrap();
                if let Some(i) = grow.iter().position(|(at, _)| *at == offset) {
                    let (_, new_height) = grow.remove(i);
                    *self.height.lock().unwrap() = new_height;
                }
                return Ok(json!(true));
            }
            Err(BrowserError::JsEvalFailed(format!(
                "unexpected script: {script}"
            )))
        }

        async fn wait_quiescent(&self, _window: Duration) -> Result<(), BrowserError> {
            if self.time_out_waits {
                Err(BrowserError::Timeout("scripted".into()))
            } else {
                Ok(())
            }
        }

        async fn snapshot(&self) -> Result<Vec<u8>, BrowserError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn fixed_height_completes_in_two_steps() {
        let fake = FakeRenderer::with_height(1600);
        let stats = settle(&fake, 800, Duration::from_millis(10)).await.unwrap();
        assert_eq!(stats.steps, 2);
        assert_eq!(stats.timeouts, 0);
        assert_eq!(stats.final_height, 1600);
        assert_eq!(*fake.offsets.lock().unwrap(), vec![800, 1600]);
    }

    #[tokio::test]
    async fn mid_scan_growth_adds_a_step() {
        // Lazy content grows the document to 2400 after the first step.
        let fake = FakeRenderer::with_height(1600).grow_at(800, 2400);
        let stats = settle(&fake, 800, Duration::from_millis(10)).await.unwrap();
        assert_eq!(stats.steps, 3);
        assert_eq!(stats.final_height, 2400);
        assert_eq!(*fake.offsets.lock().unwrap(), vec![800, 1600, 2400]);
    }

    #[tokio::test]
    async fn zero_height_document_takes_no_steps() {
        let fake = FakeRenderer::with_height(0);
        let stats = settle(&fake, 800, Duration::from_millis(10)).await.unwrap();
        assert_eq!(stats.steps, 0);
    }

    #[tokio::test]
    async fn settle_timeouts_are_soft() {
        let mut fake = FakeRenderer::with_height(1600);
        fake.time_out_waits = true;
        let stats = settle(&fake, 800, Duration::from_millis(10)).await.unwrap();
        assert_eq!(stats.steps, 2);
        assert_eq!(stats.timeouts, 2);
    }

    #[tokio::test]
    async fn zero_step_is_rejected() {
        let fake = FakeRenderer::with_height(1600);
        let err = settle(&fake, 0, Duration::from_millis(10))
            .await
            .unwrap_err();
        assert!(matches!(err, BrowserError::InvalidScrollStep(0)));
    }

    #[tokio::test]
    async fn non_numeric_height_is_an_error() {
        struct BadHeight;

        #[async_trait::async_trait]
        impl Renderer for BadHeight {
            async fn navigate(&self, _url: &str) -> Result<(), BrowserError> {
                Ok(())
            }
            async fn evaluate(&self, _script: &str) -> Result<Value, BrowserError> {
                Ok(json!("tall"))
            }
            async fn wait_quiescent(&self, _window: Duration) -> Result<(), BrowserError> {
                Ok(())
            }
            async fn snapshot(&self) -> Result<Vec<u8>, BrowserError> {
                Ok(Vec::new())
            }
        }

        let err = settle(&BadHeight, 800, Duration::from_millis(10))
            .await
            .unwrap_err();
        assert!(matches!(err, BrowserError::JsEvalFailed(_)));
    }
}
