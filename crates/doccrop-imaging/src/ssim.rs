//! Structural similarity (SSIM) scoring.
//!
//! Implements the canonical windowed SSIM formula with the same defaults as
//! scikit-image's `structural_similarity`: a 7x7 uniform window, sample
//! covariance normalization, stability constants C1 = (0.01 * L)^2 and
//! C2 = (0.03 * L)^2 with a fixed data range L = 255, and the mean taken
//! over the border-cropped valid region. Downstream selection thresholds
//! were tuned on this scale, so the formula must not be swapped for a
//! distance metric.

use std::path::Path;

use image::imageops::FilterType;
use image::DynamicImage;

use crate::error::{ImagingError, ImagingResult};

const WIN_SIZE: usize = 7;
const K1: f64 = 0.01;
const K2: f64 = 0.03;
const DATA_RANGE: f64 = 255.0;

/// Comparison mode for SSIM scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SsimMode {
    /// Single-channel luminance comparison (the default)
    #[default]
    Grayscale,
    /// Per-channel comparison in load order, averaged into one scalar
    Color,
}

/// Score two images in [-1, 1]; 1 means identical.
///
/// If the dimensions differ and `resize` is enabled, the second image is
/// resized to the first's dimensions with an anti-aliasing triangle filter
/// (its support scales with the shrink ratio, so minification averages over
/// the source area instead of point-sampling). With `resize` disabled a
/// size mismatch fails with `DimensionMismatch`.
pub fn score_images(
    a: &DynamicImage,
    b: &DynamicImage,
    mode: SsimMode,
    resize: bool,
) -> ImagingResult<f64> {
    let resized;
    let b = if (b.width(), b.height()) != (a.width(), a.height()) {
        if !resize {
            return Err(ImagingError::DimensionMismatch {
                a_width: a.width(),
                a_height: a.height(),
                b_width: b.width(),
                b_height: b.height(),
            });
        }
        resized = b.resize_exact(a.width(), a.height(), FilterType::Triangle);
        &resized
    } else {
        b
    };

    let width = a.width() as usize;
    let height = a.height() as usize;

    match mode {
        SsimMode::Grayscale => {
            let ga = a.to_luma8();
            let gb = b.to_luma8();
            Ok(ssim_plane(ga.as_raw(), gb.as_raw(), width, height))
        }
        SsimMode::Color => {
            let ra = a.to_rgb8();
            let rb = b.to_rgb8();
            let mut total = 0.0;
            for channel in 0..3 {
                let pa: Vec<u8> = ra.as_raw().iter().skip(channel).step_by(3).copied().collect();
                let pb: Vec<u8> = rb.as_raw().iter().skip(channel).step_by(3).copied().collect();
                total += ssim_plane(&pa, &pb, width, height);
            }
            Ok(total / 3.0)
        }
    }
}

/// Score two image files, decoding them first.
pub fn score_files(a: &Path, b: &Path, mode: SsimMode, resize: bool) -> ImagingResult<f64> {
    let img_a = image::open(a).map_err(|e| ImagingError::decode(a, e))?;
    let img_b = image::open(b).map_err(|e| ImagingError::decode(b, e))?;
    score_images(&img_a, &img_b, mode, resize)
}

/// Windowed SSIM over one 8-bit plane.
///
/// Local sums come from summed-area tables, so every interior pixel sees a
/// full window of valid data; pixels closer than `pad` to the border are
/// excluded from the mean, matching the reference implementation's crop.
fn ssim_plane(a: &[u8], b: &[u8], width: usize, height: usize) -> f64 {
    debug_assert_eq!(a.len(), width * height);
    debug_assert_eq!(b.len(), width * height);

    // Shrink the window on images smaller than 7px, keeping it odd
    let mut win = WIN_SIZE.min(width).min(height);
    if win % 2 == 0 {
        win -= 1;
    }
    let pad = win / 2;

    let np = (win * win) as f64;
    let cov_norm = if np > 1.0 { np / (np - 1.0) } else { 1.0 };
    let c1 = (K1 * DATA_RANGE).powi(2);
    let c2 = (K2 * DATA_RANGE).powi(2);

    // Summed-area tables for x, y, x^2, y^2 and x*y
    let stride = width + 1;
    let mut sat_x = vec![0.0f64; stride * (height + 1)];
    let mut sat_y = vec![0.0f64; stride * (height + 1)];
    let mut sat_xx = vec![0.0f64; stride * (height + 1)];
    let mut sat_yy = vec![0.0f64; stride * (height + 1)];
    let mut sat_xy = vec![0.0f64; stride * (height + 1)];

    for row in 0..height {
        for col in 0..width {
            let x = a[row * width + col] as f64;
            let y = b[row * width + col] as f64;
            let idx = (row + 1) * stride + col + 1;
            let up = row * stride + col + 1;
            let left = (row + 1) * stride + col;
            let diag = row * stride + col;

            sat_x[idx] = x + sat_x[up] + sat_x[left] - sat_x[diag];
            sat_y[idx] = y + sat_y[up] + sat_y[left] - sat_y[diag];
            sat_xx[idx] = x * x + sat_xx[up] + sat_xx[left] - sat_xx[diag];
            sat_yy[idx] = y * y + sat_yy[up] + sat_yy[left] - sat_yy[diag];
            sat_xy[idx] = x * y + sat_xy[up] + sat_xy[left] - sat_xy[diag];
        }
    }

    let window_sum = |sat: &[f64], x1: usize, y1: usize, x2: usize, y2: usize| {
        sat[y2 * stride + x2] - sat[y1 * stride + x2] - sat[y2 * stride + x1]
            + sat[y1 * stride + x1]
    };

    let mut total = 0.0;
    let mut count = 0u64;

    for cy in pad..height - pad {
        for cx in pad..width - pad {
            let (x1, y1) = (cx - pad, cy - pad);
            let (x2, y2) = (cx + pad + 1, cy + pad + 1);

            let ux = window_sum(&sat_x, x1, y1, x2, y2) / np;
            let uy = window_sum(&sat_y, x1, y1, x2, y2) / np;
            let vx = cov_norm * (window_sum(&sat_xx, x1, y1, x2, y2) / np - ux * ux);
            let vy = cov_norm * (window_sum(&sat_yy, x1, y1, x2, y2) / np - uy * uy);
            let vxy = cov_norm * (window_sum(&sat_xy, x1, y1, x2, y2) / np - ux * uy);

            let s = ((2.0 * ux * uy + c1) * (2.0 * vxy + c2))
                / ((ux * ux + uy * uy + c1) * (vx + vy + c2));

            total += s;
            count += 1;
        }
    }

    total / count as f64
}
