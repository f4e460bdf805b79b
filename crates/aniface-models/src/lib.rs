//! Shared data models for the aniface detection pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Face bounding boxes in pixel coordinates
//! - Media-kind classification from file extensions
//! - Detection options (caller-facing partial + fully resolved)
//! - Detection results
//! - Stroke-color specs for annotation

pub mod color;
pub mod media;
pub mod options;
pub mod rect;
pub mod result;

// Re-export common types
pub use color::{parse_color, ColorError, DEFAULT_STROKE};
pub use media::{extension, MediaKind, VIDEO_EXTENSIONS};
pub use options::{DetectOptions, ResolvedOptions};
pub use rect::FaceRect;
pub use result::DetectionResult;
