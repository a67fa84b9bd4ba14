//! Managed Chrome/Chromium rendering for full-page captures.
//!
//! One headless page is launched per run and reused across every target:
//! navigate, scroll until lazy content has materialized, then snapshot the
//! full document to disk. The [`Renderer`] trait is the seam between the
//! scroll/capture logic and CDP, so both are testable against scripted
//! fakes.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use sitediff_browser::{BrowserSession, capture, settle};
//!
//! let session = BrowserSession::launch(&config.capture).await?;
//! let renderer = session.renderer();
//! renderer.navigate("http://localhost:3000/").await?;
//! settle(renderer, 800, Duration::from_millis(1000)).await?;
//! let artifact = capture(renderer, Path::new("top.png")).await?;
//! session.close().await?;
//! ```

pub mod capture;
pub mod detect;
pub mod error;
pub mod renderer;
pub mod scroll;
pub mod session;

pub use {
    capture::{CaptureArtifact, capture},
    error::BrowserError,
    renderer::{CdpRenderer, Renderer},
    scroll::{ScrollStats, settle},
    session::BrowserSession,
};
