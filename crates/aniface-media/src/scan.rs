//! Entry dispatch and the early-exit scan controller.
//!
//! The public entry point classifies the locator by extension and
//! delegates: still images are decoded and scanned directly; GIF and video
//! input is acquired, materialized into frames, and scanned in order,
//! stopping at the first frame that yields a detection. The staging
//! directory is removed on every exit path.

use image::buffer::ConvertBuffer;
use image::{GrayImage, RgbaImage};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use aniface_models::media::MediaKind;
use aniface_models::options::{DetectOptions, ResolvedOptions};
use aniface_models::result::DetectionResult;

use crate::annotate;
use crate::detector::{DetectorParams, FaceDetector};
use crate::error::{MediaError, MediaResult};
use crate::fetch;
use crate::frames;
use crate::staging;

/// Locate anime-style faces in a still image, animated GIF, or video file.
///
/// Returns `Ok(None)` when no sampled frame contains a face. Fails with
/// [`MediaError::InvalidLocator`] when the locator has no file extension.
pub async fn detect(
    locator: &str,
    options: &DetectOptions,
    detector: &dyn FaceDetector,
) -> MediaResult<Option<DetectionResult>> {
    let kind = MediaKind::classify(locator)
        .ok_or_else(|| MediaError::InvalidLocator(locator.to_string()))?;
    let options = options
        .resolve()
        .map_err(|e| MediaError::InvalidColor(e.to_string()))?;

    match kind {
        MediaKind::Image => detect_image(locator, &options, detector).await,
        MediaKind::Gif | MediaKind::Video => {
            detect_animated(locator, kind, &options, detector).await
        }
    }
}

/// Scan a single still image; the result carries no frame index.
async fn detect_image(
    locator: &str,
    options: &ResolvedOptions,
    detector: &dyn FaceDetector,
) -> MediaResult<Option<DetectionResult>> {
    let image = load_rgba(locator).await?;
    detect_in_image(&image, locator, options, detector).await
}

/// GIF/video flow: acquire, materialize, scan, and always clean staging.
async fn detect_animated(
    locator: &str,
    kind: MediaKind,
    options: &ResolvedOptions,
    detector: &dyn FaceDetector,
) -> MediaResult<Option<DetectionResult>> {
    let local = fetch::acquire(locator, options).await?;
    let local_str = local.to_string_lossy().into_owned();

    let staging_dir = staging::staging_dir(&local_str, options);
    staging::prepare_staging(&staging_dir).await?;

    let outcome = scan_media(&local, kind, &staging_dir, options, detector).await;

    // Guaranteed release: the staging directory goes away whether the scan
    // succeeded, found nothing, or failed.
    if let Err(e) = staging::cleanup_staging(&staging_dir).await {
        warn!(
            "staging cleanup failed for {}: {}",
            staging_dir.display(),
            e
        );
    }

    outcome
}

async fn scan_media(
    local: &Path,
    kind: MediaKind,
    staging_dir: &Path,
    options: &ResolvedOptions,
    detector: &dyn FaceDetector,
) -> MediaResult<Option<DetectionResult>> {
    let frame_files = match kind {
        MediaKind::Gif => frames::materialize_gif(local, staging_dir, options).await?,
        MediaKind::Video => frames::materialize_video(local, staging_dir, options).await?,
        MediaKind::Image => {
            return Err(MediaError::internal("still images are not materialized"))
        }
    };
    scan_frames(&frame_files, options, detector).await
}

/// Short-circuiting linear scan over materialized frames.
///
/// Frames are scanned strictly in order; the first non-empty detection
/// stops the scan and the result is tagged with that frame's 1-based
/// position in the scanned list. Later frames are never decoded.
pub async fn scan_frames(
    frame_files: &[PathBuf],
    options: &ResolvedOptions,
    detector: &dyn FaceDetector,
) -> MediaResult<Option<DetectionResult>> {
    for (position, frame) in frame_files.iter().enumerate() {
        let source = frame.to_string_lossy().into_owned();
        let image = load_rgba(&source).await?;
        if let Some(result) = detect_in_image(&image, &source, options, detector).await? {
            info!(
                "face found at frame {} of {}",
                position + 1,
                frame_files.len()
            );
            return Ok(Some(result.with_frame(position + 1)));
        }
    }
    Ok(None)
}

/// Run the detector once over a decoded frame.
///
/// On success, the annotated copy is written when an output directory is
/// configured. A failed annotation write does not overturn the detection;
/// the result is returned without an output path.
async fn detect_in_image(
    image: &RgbaImage,
    source: &str,
    options: &ResolvedOptions,
    detector: &dyn FaceDetector,
) -> MediaResult<Option<DetectionResult>> {
    let gray: GrayImage = image.convert();
    let params = DetectorParams::from_options(options);

    let faces = detector.detect_faces(&gray, &params).await?;
    if faces.is_empty() {
        return Ok(None);
    }
    debug!("{} found {} face(s) in {}", detector.name(), faces.len(), source);

    let mut result = DetectionResult::new(faces);
    if options.write_dir.is_some() {
        match annotate::annotate(image, &result.faces, source, options).await {
            Ok(dest) => result.annotated = Some(dest),
            Err(e) => warn!("failed to write annotated copy for {}: {}", source, e),
        }
    }
    Ok(Some(result))
}

/// Decode a locator (local path or remote URL) into an RGBA image.
async fn load_rgba(locator: &str) -> MediaResult<RgbaImage> {
    let dynamic = if fetch::is_remote(locator) {
        let bytes = fetch::fetch_bytes(locator).await?;
        tokio::task::spawn_blocking(move || image::load_from_memory(&bytes))
            .await
            .map_err(|e| MediaError::internal(format!("image decode task failed: {e}")))??
    } else {
        let path = locator.to_string();
        tokio::task::spawn_blocking(move || image::open(&path))
            .await
            .map_err(|e| MediaError::internal(format!("image decode task failed: {e}")))??
    };
    Ok(dynamic.to_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aniface_models::rect::FaceRect;
    use async_trait::async_trait;
    use image::Rgba;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    /// Detector that reports one face on its `hit_on`-th call.
    struct NthCallDetector {
        calls: AtomicUsize,
        hit_on: usize,
    }

    impl NthCallDetector {
        fn new(hit_on: usize) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                hit_on,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl FaceDetector for NthCallDetector {
        async fn detect_faces(
            &self,
            _image: &GrayImage,
            _params: &DetectorParams,
        ) -> MediaResult<Vec<FaceRect>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call == self.hit_on {
                Ok(vec![FaceRect::new(1, 1, 4, 4)])
            } else {
                Ok(vec![])
            }
        }

        fn name(&self) -> &'static str {
            "nth_call_stub"
        }
    }

    fn write_frame_files(dir: &Path, count: usize) -> Vec<PathBuf> {
        (1..=count)
            .map(|n| {
                let path = dir.join(format!("clipframe{n}.png"));
                RgbaImage::from_pixel(8, 8, Rgba([100, 100, 100, 255]))
                    .save(&path)
                    .unwrap();
                path
            })
            .collect()
    }

    #[tokio::test]
    async fn test_scan_short_circuits_at_first_hit() {
        let tmp = TempDir::new().unwrap();
        let frame_files = write_frame_files(tmp.path(), 10);
        let detector = NthCallDetector::new(5);
        let options = DetectOptions::default().resolve().unwrap();

        let result = scan_frames(&frame_files, &options, &detector)
            .await
            .unwrap()
            .expect("frame 5 has a face");

        assert_eq!(result.frame, Some(5));
        // Frames 6-10 are never decoded or scanned.
        assert_eq!(detector.calls(), 5);
    }

    #[tokio::test]
    async fn test_scan_exhausts_list_without_detection() {
        let tmp = TempDir::new().unwrap();
        let frame_files = write_frame_files(tmp.path(), 4);
        let detector = NthCallDetector::new(usize::MAX);
        let options = DetectOptions::default().resolve().unwrap();

        let result = scan_frames(&frame_files, &options, &detector)
            .await
            .unwrap();

        assert!(result.is_none());
        assert_eq!(detector.calls(), 4);
    }

    #[tokio::test]
    async fn test_detect_rejects_locator_without_extension() {
        let detector = NthCallDetector::new(1);
        let err = detect("not-a-media-file", &DetectOptions::default(), &detector)
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::InvalidLocator(_)));
        assert_eq!(detector.calls(), 0);
    }

    #[tokio::test]
    async fn test_still_image_result_has_no_frame_index() {
        let tmp = TempDir::new().unwrap();
        let image_path = tmp.path().join("art.png");
        RgbaImage::from_pixel(16, 16, Rgba([0, 0, 0, 255]))
            .save(&image_path)
            .unwrap();

        let detector = NthCallDetector::new(1);
        let result = detect(
            &image_path.to_string_lossy(),
            &DetectOptions::default(),
            &detector,
        )
        .await
        .unwrap()
        .expect("stub finds a face on the first call");

        assert_eq!(result.faces.len(), 1);
        assert!(result.frame.is_none());
        assert!(result.annotated.is_none());
    }

    #[tokio::test]
    async fn test_still_image_without_face_creates_no_output_dir() {
        let tmp = TempDir::new().unwrap();
        let image_path = tmp.path().join("art.png");
        RgbaImage::from_pixel(16, 16, Rgba([0, 0, 0, 255]))
            .save(&image_path)
            .unwrap();

        let out_dir = tmp.path().join("out");
        let options = DetectOptions {
            write_dir: Some(out_dir.clone()),
            ..Default::default()
        };
        let detector = NthCallDetector::new(usize::MAX);

        let result = detect(&image_path.to_string_lossy(), &options, &detector)
            .await
            .unwrap();

        assert!(result.is_none());
        assert!(!out_dir.exists());
    }

    #[tokio::test]
    async fn test_still_image_with_face_writes_annotated_copy() {
        let tmp = TempDir::new().unwrap();
        let image_path = tmp.path().join("art.png");
        RgbaImage::from_pixel(16, 16, Rgba([0, 0, 0, 255]))
            .save(&image_path)
            .unwrap();

        let out_dir = tmp.path().join("out");
        let options = DetectOptions {
            write_dir: Some(out_dir.clone()),
            ..Default::default()
        };
        let detector = NthCallDetector::new(1);

        let result = detect(&image_path.to_string_lossy(), &options, &detector)
            .await
            .unwrap()
            .expect("stub finds a face");

        let annotated = result.annotated.expect("annotated copy written");
        assert_eq!(annotated, out_dir.join("art-result.png"));
        assert!(annotated.exists());
    }
}
