//! Full-page capture persistence.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::{error::BrowserError, renderer::Renderer};

/// A capture written to disk.
///
/// Pixel data stays on the filesystem; the diff engine re-reads it from
/// `path`. Dimensions come from the PNG header of the snapshot bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureArtifact {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Snapshot the full document and write it to `dest`, overwriting any
/// existing file.
///
/// The page must have been settled first, otherwise lazy content is missing
/// from the capture. Write and encode failures are fatal for the target.
pub async fn capture<R: Renderer + ?Sized>(
    renderer: &R,
    dest: &Path,
) -> Result<CaptureArtifact, BrowserError> {
    let bytes = renderer.snapshot().await?;
    let (width, height) = png_dimensions(&bytes)
        .ok_or_else(|| BrowserError::ScreenshotFailed("snapshot is not a valid PNG".into()))?;

    tokio::fs::write(dest, &bytes)
        .await
        .map_err(|source| BrowserError::CaptureWrite {
            path: dest.to_path_buf(),
            source,
        })?;

    info!(
        path = %dest.display(),
        width,
        height,
        bytes = bytes.len(),
        "wrote capture"
    );

    Ok(CaptureArtifact {
        path: dest.to_path_buf(),
        width,
        height,
    })
}

/// Width/height from the PNG IHDR (bytes 16..24, big-endian).
fn png_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
    if bytes.len() < 24 || !bytes.starts_with(PNG_MAGIC) {
        return None;
    }
    let width = u32::from_be_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]);
    let height = u32::from_be_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]);
    Some((width, height))
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        image::{ImageFormat, RgbaImage},
        serde_json::Value,
        std::{io::Cursor, time::Duration},
    };

    use super::*;

    /// Renderer whose snapshot returns fixed bytes.
    struct FixedSnapshot(Vec<u8>);

    #[async_trait::async_trait]
    impl Renderer for FixedSnapshot {
        async fn navigate(&self, _url: &str) -> Result<(), BrowserError> {
            Ok(())
        }
        async fn evaluate(&self, _script: &str) -> Result<Value, BrowserError> {
            Ok(Value::Null)
        }
        async fn wait_quiescent(&self, _window: Duration) -> Result<(), BrowserError> {
            Ok(())
        }
        async fn snapshot(&self) -> Result<Vec<u8>, BrowserError> {
            Ok(self.0.clone())
        }
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, image::Rgba([0, 0, 0, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[tokio::test]
    async fn writes_snapshot_and_reports_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("top.png");
        let renderer = FixedSnapshot(png_bytes(3, 2));

        let artifact = capture(&renderer, &dest).await.unwrap();
        assert_eq!(artifact.path, dest);
        assert_eq!((artifact.width, artifact.height), (3, 2));
        assert_eq!(std::fs::read(&dest).unwrap(), png_bytes(3, 2));
    }

    #[tokio::test]
    async fn overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("top.png");
        std::fs::write(&dest, b"stale").unwrap();

        capture(&FixedSnapshot(png_bytes(1, 1)), &dest).await.unwrap();
        assert_ne!(std::fs::read(&dest).unwrap(), b"stale");
    }

    #[tokio::test]
    async fn rejects_non_png_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("top.png");

        let err = capture(&FixedSnapshot(b"not a png".to_vec()), &dest)
            .await
            .unwrap_err();
        assert!(matches!(err, BrowserError::ScreenshotFailed(_)));
        // Nothing was written.
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn unwritable_destination_is_fatal() {
        let renderer = FixedSnapshot(png_bytes(1, 1));
        let err = capture(&renderer, Path::new("/nonexistent/dir/top.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, BrowserError::CaptureWrite { .. }));
    }

    #[test]
    fn png_dimensions_parses_header() {
        assert_eq!(png_dimensions(&png_bytes(120, 45)), Some((120, 45)));
        assert_eq!(png_dimensions(b"short"), None);
        assert_eq!(png_dimensions(&[0u8; 64]), None);
    }
}
