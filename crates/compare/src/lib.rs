//! Pixel-level divergence between two page captures.
//!
//! Decodes both captures concurrently, classifies each pixel with a
//! per-channel similarity threshold, writes a diff visualization, and
//! reports a deterministic divergence count and error rate.

pub mod diff;
pub mod error;

pub use {
    diff::{DEFAULT_THRESHOLD, DiffResult, diff_images},
    error::CompareError,
};
