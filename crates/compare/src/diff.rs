//! Pairwise image diff.

use std::path::{Path, PathBuf};

use {
    image::{Rgba, RgbaImage},
    tracing::info,
};

use crate::error::CompareError;

/// Default per-channel similarity threshold on a normalized 0–1 scale.
pub const DEFAULT_THRESHOLD: f64 = 0.1;

/// Color for differing pixels in the visualization.
const DIFF_PIXEL: Rgba<u8> = Rgba([255, 0, 0, 255]);

/// Divergence between two captures. Immutable once computed.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffResult {
    pub diff_image_path: PathBuf,
    pub diff_pixel_count: u64,
    /// Fraction of differing pixels over the total pixel count, in [0, 1].
    pub error_rate: f64,
}

/// Decode two captures, compare them pixel-for-pixel, and persist a diff
/// visualization to `diff_path`.
///
/// The decodes run concurrently on the blocking pool and are joined before
/// any comparison starts; a failure on either side, or a dimension
/// mismatch, is fatal for the pair.
pub async fn diff_images(
    path_a: &Path,
    path_b: &Path,
    diff_path: &Path,
    threshold: f64,
) -> Result<DiffResult, CompareError> {
    let (img_a, img_b) = tokio::try_join!(decode(path_a), decode(path_b))?;

    let (diff, diff_pixel_count) = compare_pixels(&img_a, &img_b, threshold)?;

    let total = u64::from(diff.width()) * u64::from(diff.height());
    let error_rate = if total == 0 {
        0.0
    } else {
        diff_pixel_count as f64 / total as f64
    };

    let out = diff_path.to_path_buf();
    let save_path = diff_path.to_path_buf();
    tokio::task::spawn_blocking(move || {
        diff.save(&save_path).map_err(|e| CompareError::Encode {
            path: save_path.clone(),
            message: e.to_string(),
        })
    })
    .await
    .map_err(|e| CompareError::Join(e.to_string()))??;

    info!(
        path = %out.display(),
        diff_pixel_count,
        error_rate,
        "wrote diff image"
    );

    Ok(DiffResult {
        diff_image_path: out,
        diff_pixel_count,
        error_rate,
    })
}

async fn decode(path: &Path) -> Result<RgbaImage, CompareError> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || {
        image::open(&path)
            .map(|img| img.to_rgba8())
            .map_err(|e| CompareError::Decode {
                path: path.clone(),
                message: e.to_string(),
            })
    })
    .await
    .map_err(|e| CompareError::Join(e.to_string()))?
}

/// Classify every pixel pair and build the visualization: differing pixels
/// solid red, matching pixels a darkened grayscale of `a` so the diff still
/// reads as the page.
///
/// Row-major iteration with integer channel math, so the count is exactly
/// reproducible for fixed inputs.
fn compare_pixels(
    a: &RgbaImage,
    b: &RgbaImage,
    threshold: f64,
) -> Result<(RgbaImage, u64), CompareError> {
    if a.dimensions() != b.dimensions() {
        let (a_width, a_height) = a.dimensions();
        let (b_width, b_height) = b.dimensions();
        return Err(CompareError::DimensionMismatch {
            a_width,
            a_height,
            b_width,
            b_height,
        });
    }

    // Integer channel cutoff: a channel differs when |a - b| > cutoff.
    let cutoff = (threshold.clamp(0.0, 1.0) * 255.0) as i16;

    let (width, height) = a.dimensions();
    let mut diff = RgbaImage::new(width, height);
    let mut count = 0u64;

    for y in 0..height {
        for x in 0..width {
            let pa = a.get_pixel(x, y);
            let pb = b.get_pixel(x, y);
            if pixel_differs(pa, pb, cutoff) {
                count += 1;
                diff.put_pixel(x, y, DIFF_PIXEL);
            } else {
                diff.put_pixel(x, y, backdrop(pa));
            }
        }
    }

    Ok((diff, count))
}

fn pixel_differs(a: &Rgba<u8>, b: &Rgba<u8>, cutoff: i16) -> bool {
    a.0.iter()
        .zip(b.0.iter())
        .any(|(ca, cb)| (i16::from(*ca) - i16::from(*cb)).abs() > cutoff)
}

/// Darkened luma of the source pixel.
fn backdrop(p: &Rgba<u8>) -> Rgba<u8> {
    let [r, g, b, _] = p.0;
    let luma = (u32::from(r) * 299 + u32::from(g) * 587 + u32::from(b) * 114) / 1000;
    let v = (luma / 4) as u8;
    Rgba([v, v, v, 255])
}
