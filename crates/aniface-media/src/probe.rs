//! FFprobe frame-rate probing.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use crate::error::{MediaError, MediaResult};

/// FFprobe JSON output format (only the fields the pipeline reads).
#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: String,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
}

/// Probe a video file's native frame rate in frames per second.
///
/// When `ffmpeg_path` is overridden, an `ffprobe` binary next to it is
/// preferred over the one on PATH.
pub async fn probe_frame_rate(
    path: impl AsRef<Path>,
    ffmpeg_path: Option<&Path>,
) -> MediaResult<f64> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(MediaError::FileNotFound(path.to_path_buf()));
    }

    let ffprobe = resolve_ffprobe(ffmpeg_path)?;
    debug!("probing frame rate of {} via {}", path.display(), ffprobe.display());

    let output = Command::new(&ffprobe)
        .args(["-v", "quiet", "-print_format", "json", "-show_streams"])
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        return Err(MediaError::ffprobe_failed(
            "FFprobe exited with non-zero status",
            Some(String::from_utf8_lossy(&output.stderr).to_string()),
        ));
    }

    let probe: FfprobeOutput = serde_json::from_slice(&output.stdout)?;

    let video_stream = probe
        .streams
        .iter()
        .find(|s| s.codec_type == "video")
        .ok_or_else(|| MediaError::InvalidVideo("no video stream found".to_string()))?;

    // avg_frame_rate is preferred; r_frame_rate covers streams that report
    // an unusable "0/0" average.
    let frame_rate = [
        video_stream.avg_frame_rate.as_deref(),
        video_stream.r_frame_rate.as_deref(),
    ]
    .into_iter()
    .flatten()
    .find_map(parse_frame_rate)
    .ok_or_else(|| MediaError::InvalidVideo("no frame rate reported".to_string()));
    frame_rate
}

/// Resolve the ffprobe executable, preferring a sibling of the ffmpeg override.
fn resolve_ffprobe(ffmpeg_path: Option<&Path>) -> MediaResult<PathBuf> {
    if let Some(ffmpeg) = ffmpeg_path {
        let sibling = ffmpeg.with_file_name("ffprobe");
        if sibling.exists() {
            return Ok(sibling);
        }
    }
    which::which("ffprobe").map_err(|_| MediaError::FfprobeNotFound)
}

/// Parse a frame rate string (e.g. "30/1" or "29.97") to fps, rejecting
/// zero and negative rates.
fn parse_frame_rate(s: &str) -> Option<f64> {
    let fps = if let Some((num, den)) = s.split_once('/') {
        let num: f64 = num.parse().ok()?;
        let den: f64 = den.parse().ok()?;
        if den <= 0.0 {
            return None;
        }
        num / den
    } else {
        s.parse().ok()?
    };
    (fps > 0.0).then_some(fps)
}
