//! Reference mask resolution and caching.
//!
//! Masks are template images keyed to a crop model by the naming convention
//! `mask_<id>.jpg` (falling back to the uppercase `.JPG` extension). They
//! never change at runtime, so the cache is loaded once before the row loop
//! and is safe for concurrent reads afterwards.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::DynamicImage;
use tracing::{debug, warn};

use crate::crop::CropModel;
use crate::error::ImagingResult;

/// Resolve the mask path for a model id, if one exists on disk.
pub fn mask_path_for(masks_dir: &Path, model_id: u32) -> Option<PathBuf> {
    let lower = masks_dir.join(format!("mask_{model_id}.jpg"));
    if lower.is_file() {
        return Some(lower);
    }
    let upper = masks_dir.join(format!("mask_{model_id}.JPG"));
    if upper.is_file() {
        return Some(upper);
    }
    None
}

/// Read-only cache of decoded reference masks, keyed by model id.
#[derive(Debug, Default)]
pub struct MaskCache {
    masks: HashMap<u32, DynamicImage>,
}

impl MaskCache {
    /// Load every available mask for the given model set.
    ///
    /// A model with no mask file, or with a mask that fails to decode, is
    /// simply absent from the cache; the selector treats that as a
    /// per-model skip, so loading never fails as a whole.
    pub fn load(masks_dir: &Path, models: &[CropModel]) -> ImagingResult<Self> {
        let mut masks = HashMap::new();

        for model in models {
            let Some(path) = mask_path_for(masks_dir, model.id) else {
                warn!("Mask image not found: mask_{}.jpg/JPG", model.id);
                continue;
            };

            match image::open(&path) {
                Ok(img) => {
                    debug!("Loaded mask for model {} from {}", model.id, path.display());
                    masks.insert(model.id, img);
                }
                Err(e) => {
                    warn!("Could not decode mask {}: {}", path.display(), e);
                }
            }
        }

        Ok(Self { masks })
    }

    /// Look up the mask for a model id.
    pub fn get(&self, model_id: u32) -> Option<&DynamicImage> {
        self.masks.get(&model_id)
    }

    /// Number of masks in the cache.
    pub fn len(&self) -> usize {
        self.masks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crop::{CropGeometry, CROP_MODELS};
    use image::{Rgb, RgbImage};

    fn write_mask(dir: &Path, name: &str) {
        let img = RgbImage::from_pixel(20, 20, Rgb([120, 120, 120]));
        img.save(dir.join(name)).unwrap();
    }

    #[test]
    fn test_mask_path_prefers_lowercase_and_falls_back_to_uppercase() {
        let dir = tempfile::tempdir().unwrap();
        write_mask(dir.path(), "mask_1.jpg");
        write_mask(dir.path(), "mask_2.JPG");

        assert_eq!(
            mask_path_for(dir.path(), 1),
            Some(dir.path().join("mask_1.jpg"))
        );
        assert_eq!(
            mask_path_for(dir.path(), 2),
            Some(dir.path().join("mask_2.JPG"))
        );
        assert_eq!(mask_path_for(dir.path(), 3), None);
    }

    #[test]
    fn test_cache_skips_missing_and_unreadable_masks() {
        let dir = tempfile::tempdir().unwrap();
        write_mask(dir.path(), "mask_1.jpg");
        std::fs::write(dir.path().join("mask_2.jpg"), b"not an image").unwrap();

        let cache = MaskCache::load(dir.path(), CROP_MODELS).unwrap();
        assert_eq!(cache.len(), 1);
        assert!(cache.get(1).is_some());
        assert!(cache.get(2).is_none());
        assert!(cache.get(3).is_none());
    }

    #[test]
    fn test_cache_covers_requested_models_only() {
        let dir = tempfile::tempdir().unwrap();
        write_mask(dir.path(), "mask_1.jpg");
        write_mask(dir.path(), "mask_9.jpg");

        let models = [CropModel::new(1, CropGeometry::new(0.0, 1.0, 0.0, 1.0))];
        let cache = MaskCache::load(dir.path(), &models).unwrap();
        assert_eq!(cache.len(), 1);
        assert!(cache.get(9).is_none());
    }
}
