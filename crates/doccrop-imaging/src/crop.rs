//! Fixed proportional crop models.
//!
//! Each model carries a hand-tuned rectangle expressed as fractions of the
//! source image's width and height. The set is closed and ordered by model
//! id; selection iterates it in that order.

use std::path::Path;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::{ImagingError, ImagingResult};

/// Proportional crop bounds, as fractions of width/height in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropGeometry {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl CropGeometry {
    pub const fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }
}

/// Pixel bounds resolved against a concrete image size.
///
/// Invariant: `x_min < x_max` and `y_min < y_max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBounds {
    pub x_min: u32,
    pub x_max: u32,
    pub y_min: u32,
    pub y_max: u32,
}

impl PixelBounds {
    pub fn width(&self) -> u32 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> u32 {
        self.y_max - self.y_min
    }
}

/// One fixed crop model: an id plus its proportional geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropModel {
    pub id: u32,
    pub geometry: CropGeometry,
}

impl CropModel {
    pub const fn new(id: u32, geometry: CropGeometry) -> Self {
        Self { id, geometry }
    }

    /// Resolve the proportional geometry against an image size.
    ///
    /// Fractions are scaled by the image extents and truncated to whole
    /// pixels, clamped into `[0, width]`/`[0, height]`, and reordered so
    /// min <= max on each axis. An empty or degenerate region fails with
    /// `InvalidGeometry` for this model only.
    pub fn resolve(&self, width: u32, height: u32) -> ImagingResult<PixelBounds> {
        let left = (width as f64 * self.geometry.left) as u32;
        let right = (width as f64 * self.geometry.right) as u32;
        let top = (height as f64 * self.geometry.top) as u32;
        let bottom = (height as f64 * self.geometry.bottom) as u32;

        let x_min = left.min(right).min(width);
        let x_max = left.max(right).min(width);
        let y_min = top.min(bottom).min(height);
        let y_max = top.max(bottom).min(height);

        if x_max <= x_min || y_max <= y_min {
            return Err(ImagingError::InvalidGeometry {
                model_id: self.id,
                x_min,
                x_max,
                y_min,
                y_max,
            });
        }

        Ok(PixelBounds {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }

    /// Apply the crop to a loaded image. Pure and deterministic.
    pub fn crop(&self, source: &DynamicImage) -> ImagingResult<DynamicImage> {
        let bounds = self.resolve(source.width(), source.height())?;
        Ok(source.crop_imm(bounds.x_min, bounds.y_min, bounds.width(), bounds.height()))
    }

    /// Crop an image file and persist the result as JPEG.
    pub fn crop_file(&self, input: &Path, output: &Path) -> ImagingResult<()> {
        let source = image::open(input).map_err(|e| ImagingError::decode(input, e))?;
        let cropped = self.crop(&source)?;

        // JPEG cannot carry an alpha channel
        let cropped = DynamicImage::ImageRgb8(cropped.to_rgb8());
        cropped
            .save(output)
            .map_err(|e| ImagingError::write(output, e))
    }
}

/// The closed, ordered set of crop models.
///
/// Models 1-5 target CNH layout variants, 6 targets CIN, 7 targets RG and
/// 8 is an experimental wide band with no classification mapping.
pub const CROP_MODELS: &[CropModel] = &[
    CropModel::new(1, CropGeometry::new(0.10, 0.48, 0.075, 0.155)),
    CropModel::new(2, CropGeometry::new(0.13, 0.42, 0.22, 0.30)),
    CropModel::new(3, CropGeometry::new(0.09, 0.36, 0.31, 0.385)),
    CropModel::new(4, CropGeometry::new(0.15, 0.39, 0.27, 0.327)),
    CropModel::new(5, CropGeometry::new(0.17, 0.56, 0.41, 0.50)),
    CropModel::new(6, CropGeometry::new(0.05, 0.52, 0.12, 0.23)),
    CropModel::new(7, CropGeometry::new(0.22, 0.78, 0.08, 0.19)),
    CropModel::new(8, CropGeometry::new(0.14, 0.71, 0.35, 0.47)),
];

/// Look up a model by id in the fixed set.
pub fn model_by_id(id: u32) -> Option<&'static CropModel> {
    CROP_MODELS.iter().find(|m| m.id == id)
}
