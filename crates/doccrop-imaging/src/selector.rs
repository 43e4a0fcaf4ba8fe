//! Best-crop selection across the model set.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use doccrop_models::DocumentKind;

use crate::crop::CropModel;
use crate::error::{ImagingError, ImagingResult};
use crate::mask::MaskCache;
use crate::ssim::{score_images, SsimMode};

/// The winning crop for one source image.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionResult {
    /// Id of the winning crop model
    pub model_id: u32,

    /// SSIM score of the winning crop against its mask
    pub score: f64,

    /// Path of the winning crop artifact; the only candidate file that
    /// survives selection
    pub crop_path: PathBuf,

    /// Classification derived from the winning model id
    pub document_kind: Option<DocumentKind>,
}

/// Evaluate every crop model against its reference mask and keep the best.
///
/// Models are tried in ascending id order. Per-model failures (unresolvable
/// geometry, write failure, missing mask) are logged and skipped; they never
/// abort the row. The running maximum uses a strict greater-than comparison,
/// so ties keep the earlier, lower-numbered model: model numbering encodes
/// a priority among otherwise-equal layouts.
///
/// Candidate artifacts are written to `temp_dir` namespaced by `row_id`, and
/// every non-winning candidate is deleted before returning (best-effort).
/// Fails with `Decode` if the source image is unreadable, or `NoValidCrop`
/// if no model produced a scored candidate.
pub fn select_best_crop(
    input_path: &Path,
    temp_dir: &Path,
    row_id: &str,
    models: &[CropModel],
    masks: &MaskCache,
) -> ImagingResult<SelectionResult> {
    let source = image::open(input_path).map_err(|e| ImagingError::decode(input_path, e))?;

    let mut best: Option<(u32, f64, PathBuf)> = None;
    let mut candidates: Vec<PathBuf> = Vec::with_capacity(models.len());

    for model in models {
        let cropped = match model.crop(&source) {
            Ok(img) => img,
            Err(e) => {
                warn!("Skipping model {}: {}", model.id, e);
                continue;
            }
        };

        let crop_path = temp_dir.join(format!("{}_model{}_cropped.jpg", row_id, model.id));
        let rgb = image::DynamicImage::ImageRgb8(cropped.to_rgb8());
        if let Err(e) = rgb.save(&crop_path) {
            warn!(
                "Skipping model {}: {}",
                model.id,
                ImagingError::write(&crop_path, e)
            );
            continue;
        }
        candidates.push(crop_path.clone());

        let Some(mask) = masks.get(model.id) else {
            warn!("Skipping model {}: {}", model.id, ImagingError::MissingMask(model.id));
            continue;
        };

        let score = match score_images(mask, &rgb, SsimMode::Grayscale, true) {
            Ok(score) => score,
            Err(e) => {
                warn!("Skipping model {}: {}", model.id, e);
                continue;
            }
        };
        info!("Model {} similarity: {:.4}", model.id, score);

        // Strict comparison: ties keep the lower-numbered model
        if best.as_ref().map_or(true, |(_, s, _)| score > *s) {
            best = Some((model.id, score, crop_path));
        }
    }

    // Release the source before touching candidate files
    drop(source);

    let winner = best.as_ref().map(|(_, _, path)| path.clone());
    for path in &candidates {
        if Some(path) == winner.as_ref() {
            continue;
        }
        match std::fs::remove_file(path) {
            Ok(()) => debug!("Deleted: {}", path.display()),
            Err(e) => warn!("Could not delete {}: {}", path.display(), e),
        }
    }

    let Some((model_id, score, crop_path)) = best else {
        return Err(ImagingError::NoValidCrop);
    };

    info!("Best model: {} (similarity: {:.4})", model_id, score);

    Ok(SelectionResult {
        model_id,
        score,
        crop_path,
        document_kind: DocumentKind::from_model_id(model_id),
    })
}
