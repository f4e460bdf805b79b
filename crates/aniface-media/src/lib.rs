#![deny(unreachable_patterns)]
//! Anime face detection over still images, GIFs, and video files.
//!
//! This crate provides:
//! - Extension-based media dispatch with an early-exit frame scan
//! - GIF/video frame materialization with guaranteed staging cleanup
//! - An ffmpeg/ffprobe wrapper for frame extraction and rate probing
//! - Remote media acquisition with a fixed browser-like user agent
//! - A detector seam ([`FaceDetector`]) for pluggable face detection

pub mod annotate;
pub mod command;
pub mod detector;
pub mod error;
pub mod fetch;
pub mod frames;
pub mod probe;
pub mod scan;
pub mod staging;

pub use annotate::annotate;
pub use command::{FfmpegCommand, FfmpegRunner};
pub use detector::{DetectorParams, FaceDetector};
pub use error::{MediaError, MediaResult};
pub use fetch::acquire;
pub use frames::{materialize_gif, materialize_video};
pub use probe::probe_frame_rate;
pub use scan::{detect, scan_frames};

// Re-export the shared model types callers need at the API surface.
pub use aniface_models::{DetectOptions, DetectionResult, FaceRect, MediaKind, ResolvedOptions};
