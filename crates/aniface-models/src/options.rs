//! Detection options.
//!
//! Callers supply a partial [`DetectOptions`] with every field optional.
//! [`DetectOptions::resolve`] applies defaults once, up front, and returns
//! an immutable [`ResolvedOptions`] that is passed down the pipeline. The
//! caller-supplied bundle is never mutated.

use std::path::PathBuf;

use crate::color::{parse_color, ColorError, DEFAULT_STROKE};

/// Default detector scale factor.
pub const DEFAULT_SCALE_FACTOR: f64 = 1.1;
/// Default minimum-neighbor count for the detector.
pub const DEFAULT_MIN_NEIGHBORS: u32 = 5;
/// Default annotation stroke thickness in pixels.
pub const DEFAULT_THICKNESS: u32 = 1;

/// Caller-facing detection options. Every field is optional.
#[derive(Debug, Clone, Default)]
pub struct DetectOptions {
    /// Detector configuration file override (e.g. a cascade definition).
    pub cascade: Option<PathBuf>,
    /// Detector scale factor (default 1.1).
    pub scale_factor: Option<f64>,
    /// Detector minimum-neighbor count (default 5).
    pub min_neighbors: Option<u32>,
    /// Minimum bounding-box size as (width, height).
    pub min_size: Option<(u32, u32)>,
    /// Maximum bounding-box size as (width, height).
    pub max_size: Option<(u32, u32)>,
    /// GIF sampling stride control; values below 1 are clamped to 1.
    pub skip_factor: Option<u32>,
    /// Explicit video frame rate; probed from the source when absent.
    pub framerate: Option<f64>,
    /// Path to the ffmpeg executable; resolved from PATH when absent.
    pub ffmpeg_path: Option<PathBuf>,
    /// Directory for downloaded remote media; remote GIF/video input
    /// requires it. Absent disables the download side effect.
    pub download_dir: Option<PathBuf>,
    /// Directory for annotated output copies. Absent disables annotation.
    pub write_dir: Option<PathBuf>,
    /// Annotation stroke thickness (default 1).
    pub thickness: Option<u32>,
    /// Annotation stroke color spec, named or hex (default red-orange).
    pub color: Option<String>,
}

/// Fully-resolved detection options, immutable for one invocation.
#[derive(Debug, Clone)]
pub struct ResolvedOptions {
    pub cascade: Option<PathBuf>,
    pub scale_factor: f64,
    pub min_neighbors: u32,
    /// `None` means unconstrained (zero-size sentinels are normalized away).
    pub min_size: Option<(u32, u32)>,
    /// `None` means unconstrained.
    pub max_size: Option<(u32, u32)>,
    pub skip_factor: u32,
    pub framerate: Option<f64>,
    pub ffmpeg_path: Option<PathBuf>,
    pub download_dir: Option<PathBuf>,
    pub write_dir: Option<PathBuf>,
    pub thickness: u32,
    /// Stroke color resolved to RGBA bytes.
    pub stroke_color: [u8; 4],
}

impl DetectOptions {
    /// Apply defaults and produce the resolved configuration.
    ///
    /// Fails only when the stroke-color spec cannot be parsed.
    pub fn resolve(&self) -> Result<ResolvedOptions, ColorError> {
        let stroke_color = match &self.color {
            Some(spec) => parse_color(spec)?,
            None => DEFAULT_STROKE,
        };

        Ok(ResolvedOptions {
            cascade: self.cascade.clone(),
            scale_factor: self.scale_factor.unwrap_or(DEFAULT_SCALE_FACTOR),
            min_neighbors: self.min_neighbors.unwrap_or(DEFAULT_MIN_NEIGHBORS),
            min_size: normalize_size(self.min_size),
            max_size: normalize_size(self.max_size),
            skip_factor: self.skip_factor.unwrap_or(1).max(1),
            framerate: self.framerate,
            ffmpeg_path: self.ffmpeg_path.clone(),
            download_dir: self.download_dir.clone(),
            write_dir: self.write_dir.clone(),
            thickness: self.thickness.unwrap_or(DEFAULT_THICKNESS).max(1),
            stroke_color,
        })
    }
}

/// A bound with a zero dimension is the "no constraint" sentinel.
fn normalize_size(size: Option<(u32, u32)>) -> Option<(u32, u32)> {
    size.filter(|(w, h)| *w > 0 && *h > 0)
}

impl Default for ResolvedOptions {
    fn default() -> Self {
        DetectOptions::default()
            .resolve()
            .expect("default options always resolve")
    }
}
