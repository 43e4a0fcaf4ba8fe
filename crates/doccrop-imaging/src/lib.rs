//! Image processing core for the DocCrop audit backend.
//!
//! This crate provides:
//! - The fixed set of proportional crop models
//! - SSIM scoring between crops and reference masks
//! - Reference mask loading and caching
//! - Best-crop selection across all models
//!
//! Everything here is synchronous CPU-bound code; callers running inside an
//! async runtime should wrap calls in `spawn_blocking`.

pub mod crop;
pub mod error;
pub mod mask;
pub mod selector;
pub mod ssim;

pub use crop::{CropGeometry, CropModel, PixelBounds, CROP_MODELS};
pub use error::{ImagingError, ImagingResult};
pub use mask::{mask_path_for, MaskCache};
pub use selector::{select_best_crop, SelectionResult};
pub use ssim::{score_images, SsimMode};
