//! Detection results.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::rect::FaceRect;

/// Outcome of a successful detection.
///
/// The shape is fixed: optional fields are explicitly optional rather than
/// present-or-absent depending on control flow. "No face found" is modeled
/// by the pipeline as `Option<DetectionResult>::None`, not by an empty
/// `faces` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    /// Detected face rectangles in source-frame pixel coordinates.
    pub faces: Vec<FaceRect>,
    /// 1-based position in the scanned frame list; `None` for still images.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame: Option<usize>,
    /// Path of the annotated copy, when an output directory was configured
    /// and the write succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotated: Option<PathBuf>,
}

impl DetectionResult {
    /// Create a result for a set of detected faces.
    pub fn new(faces: Vec<FaceRect>) -> Self {
        Self {
            faces,
            frame: None,
            annotated: None,
        }
    }

    /// Tag the result with the 1-based scanned-frame position.
    pub fn with_frame(mut self, frame: usize) -> Self {
        self.frame = Some(frame);
        self
    }

    /// Attach the annotated-output path.
    pub fn with_annotated(mut self, path: PathBuf) -> Self {
        self.annotated = Some(path);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_fields_skipped_in_json() {
        let result = DetectionResult::new(vec![FaceRect::new(1, 2, 3, 4)]);
        let json = serde_json::to_string(&result).unwrap();
        assert!(!json.contains("frame"));
        assert!(!json.contains("annotated"));
    }

    #[test]
    fn test_builders() {
        let result = DetectionResult::new(vec![])
            .with_frame(5)
            .with_annotated(PathBuf::from("/out/x-result.jpg"));
        assert_eq!(result.frame, Some(5));
        assert_eq!(result.annotated, Some(PathBuf::from("/out/x-result.jpg")));
    }
}
