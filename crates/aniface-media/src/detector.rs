//! Detector seam.
//!
//! The pipeline hands decoded single-channel frames to an external face
//! detector and passes the tuning parameters through unchanged. The
//! detector implementation (cascade classifier, neural model, ...) is not
//! this crate's concern.

use async_trait::async_trait;
use image::GrayImage;
use std::path::PathBuf;

use aniface_models::options::ResolvedOptions;
use aniface_models::rect::FaceRect;

use crate::error::MediaResult;

/// Tuning parameters forwarded to the detector.
#[derive(Debug, Clone)]
pub struct DetectorParams {
    /// Detector configuration file override (e.g. a cascade definition).
    pub cascade: Option<PathBuf>,
    /// Scale factor between detection passes.
    pub scale_factor: f64,
    /// Minimum neighbor count for a candidate to be kept.
    pub min_neighbors: u32,
    /// Minimum bounding-box size; `None` means unconstrained.
    pub min_size: Option<(u32, u32)>,
    /// Maximum bounding-box size; `None` means unconstrained.
    pub max_size: Option<(u32, u32)>,
}

impl DetectorParams {
    /// Extract the detector-facing subset of the resolved options.
    pub fn from_options(options: &ResolvedOptions) -> Self {
        Self {
            cascade: options.cascade.clone(),
            scale_factor: options.scale_factor,
            min_neighbors: options.min_neighbors,
            min_size: options.min_size,
            max_size: options.max_size,
        }
    }
}

/// Face detection capability.
///
/// Given a grayscale image and tuning parameters, returns zero or more
/// axis-aligned face bounding boxes in pixel coordinates of that image.
#[async_trait]
pub trait FaceDetector: Send + Sync {
    /// Detect faces in a single decoded frame.
    async fn detect_faces(
        &self,
        image: &GrayImage,
        params: &DetectorParams,
    ) -> MediaResult<Vec<FaceRect>>;

    /// Detector name for logging.
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use aniface_models::options::DetectOptions;

    #[test]
    fn test_params_from_options() {
        let options = DetectOptions {
            scale_factor: Some(1.3),
            min_neighbors: Some(3),
            max_size: Some((200, 200)),
            ..Default::default()
        }
        .resolve()
        .unwrap();

        let params = DetectorParams::from_options(&options);
        assert!((params.scale_factor - 1.3).abs() < f64::EPSILON);
        assert_eq!(params.min_neighbors, 3);
        assert!(params.min_size.is_none());
        assert_eq!(params.max_size, Some((200, 200)));
    }
}
