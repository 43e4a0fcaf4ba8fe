//! Local end-to-end pipeline tests: input feed -> selection -> report.
//!
//! These cover everything except the network and S3 edges, which are
//! exercised separately in `batch_tests`.

use std::path::Path;
use std::sync::Arc;

use image::{DynamicImage, Rgb, RgbImage};

use doccrop_imaging::{select_best_crop, MaskCache, CROP_MODELS};
use doccrop_models::{BatchReport, DocumentKind, ReportRow, RowFailure, RunId};
use doccrop_worker::{input, report};

fn textured_source(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            ((x * 3 + y * 7) % 256) as u8,
            ((x * 5 + y * 2) % 256) as u8,
            ((x + y * 11) % 256) as u8,
        ])
    }))
}

/// Write a mask for `model_id` equal to the crop that model produces, so
/// its candidate scores near 1.0.
fn write_matching_mask(masks_dir: &Path, source: &DynamicImage, model_id: u32) {
    let model = CROP_MODELS.iter().find(|m| m.id == model_id).unwrap();
    let crop = model.crop(source).unwrap();
    DynamicImage::ImageRgb8(crop.to_rgb8())
        .save(masks_dir.join(format!("mask_{model_id}.jpg")))
        .unwrap();
}

#[tokio::test]
async fn test_feed_to_report_with_mixed_outcomes() {
    let dir = tempfile::tempdir().unwrap();
    let masks_dir = dir.path().join("masks");
    let temp_dir = dir.path().join("temp");
    std::fs::create_dir_all(&masks_dir).unwrap();
    std::fs::create_dir_all(&temp_dir).unwrap();

    // Input feed with a duplicate that must collapse to one row
    let feed_path = dir.path().join("input.json");
    std::fs::write(
        &feed_path,
        r#"[
            {"document_uuid": "doc-ok", "file_url": "https://img/doc-ok.jpg"},
            {"document_uuid": "doc-ok", "file_url": "https://img/dup.jpg"},
            {"document_uuid": "doc-bad", "file_url": "https://img/doc-bad.jpg"}
        ]"#,
    )
    .unwrap();
    let rows = input::read_rows(&feed_path, true, 50).await.unwrap();
    assert_eq!(rows.len(), 2);

    // Masks favor model 6 for every readable source
    let source = textured_source(640, 480);
    write_matching_mask(&masks_dir, &source, 6);
    let masks = Arc::new(MaskCache::load(&masks_dir, CROP_MODELS).unwrap());

    // "Download" doc-ok's source; leave doc-bad's missing so its row fails
    source
        .save(temp_dir.join(format!("{}.jpg", rows[0].document_uuid)))
        .unwrap();

    let mut report_rows = Vec::new();
    let mut failures = Vec::new();
    for row in &rows {
        let input_path = temp_dir.join(format!("{}.jpg", row.document_uuid));
        let result = {
            let masks = Arc::clone(&masks);
            let temp_dir = temp_dir.clone();
            let row_id = row.document_uuid.as_str().to_string();
            tokio::task::spawn_blocking(move || {
                select_best_crop(&input_path, &temp_dir, &row_id, CROP_MODELS, &masks)
            })
            .await
            .unwrap()
        };
        match result {
            Ok(selection) => report_rows.push(ReportRow::new(
                row.document_uuid.clone(),
                format!("https://bucket.s3.amazonaws.com/audit/{}_cropped.jpg", row.document_uuid),
                selection.model_id,
                selection.score,
            )),
            Err(e) => failures.push(RowFailure {
                document_uuid: row.document_uuid.clone(),
                error: e.to_string(),
            }),
        }
    }

    assert_eq!(report_rows.len(), 1);
    assert_eq!(report_rows[0].best_model, "6");
    assert_eq!(report_rows[0].document_kind, Some(DocumentKind::Cin));
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].document_uuid.as_str(), "doc-bad");

    // The winner survives in the temp dir; every other candidate is gone
    let winner = temp_dir.join("doc-ok_model6_cropped.jpg");
    assert!(winner.is_file());
    for model in CROP_MODELS.iter().filter(|m| m.id != 6) {
        assert!(!temp_dir
            .join(format!("doc-ok_model{}_cropped.jpg", model.id))
            .exists());
    }

    // Report writes as pure-ASCII JSON and round-trips
    let report_path = dir.path().join("output.json");
    let batch = BatchReport::new(RunId::new(), report_rows, failures);
    report::write_report(&report_path, &batch).await.unwrap();

    let data = std::fs::read_to_string(&report_path).unwrap();
    assert!(data.is_ascii());
    let parsed: BatchReport = serde_json::from_str(&data).unwrap();
    assert_eq!(parsed.rows.len(), 1);
    assert_eq!(parsed.failures.len(), 1);
}
