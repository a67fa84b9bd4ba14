//! Diff engine error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while diffing a capture pair.
#[derive(Debug, Error)]
pub enum CompareError {
    #[error("failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// The two captures cannot be compared pixel-for-pixel. Always fatal;
    /// a partial result is never produced.
    #[error(
        "capture dimensions differ: {a_width}x{a_height} vs {b_width}x{b_height}"
    )]
    DimensionMismatch {
        a_width: u32,
        a_height: u32,
        b_width: u32,
        b_height: u32,
    },

    #[error("failed to write diff image {path}: {message}")]
    Encode { path: PathBuf, message: String },

    #[error("diff task failed: {0}")]
    Join(String),
}
