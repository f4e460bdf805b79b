//! Frame materialization for GIF and video input.
//!
//! Both strategies turn one media item into an ordered sequence of still
//! image files inside the staging directory, named
//! `<base-name>frame<N>.<ext>`. The returned list is the exact scan order.

use std::cmp::Ordering;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use image::codecs::gif::GifDecoder;
use image::AnimationDecoder;
use tokio::fs;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use aniface_models::options::ResolvedOptions;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::probe::probe_frame_rate;
use crate::staging::base_name;

/// Extract sampled GIF frames into `staging` as JPEG files.
///
/// Frames are fully composited (each file is the cumulative image, not a
/// raw delta). File names keep the 1-based original frame index, so a
/// sampled sequence has numbering gaps rather than being renumbered. All
/// writes complete before this returns.
pub async fn materialize_gif(
    path: &Path,
    staging: &Path,
    options: &ResolvedOptions,
) -> MediaResult<Vec<PathBuf>> {
    let base = base_name(&path.to_string_lossy());

    let src = path.to_path_buf();
    let frames = tokio::task::spawn_blocking(move || -> MediaResult<Vec<image::Frame>> {
        let reader = BufReader::new(File::open(&src)?);
        let decoder = GifDecoder::new(reader)?;
        Ok(decoder.into_frames().collect_frames()?)
    })
    .await
    .map_err(|e| MediaError::internal(format!("GIF decode task failed: {e}")))??;

    let total = frames.len();
    let step = gif_step(total, options.skip_factor);
    debug!(
        "materializing GIF {}: {} frames, step {}",
        path.display(),
        total,
        step
    );

    // Fan out the frame writes, then join all of them before returning;
    // nothing downstream may observe a half-written frame set.
    let mut selected = Vec::new();
    let mut writes: Vec<JoinHandle<MediaResult<()>>> = Vec::new();
    for (index, frame) in frames.into_iter().enumerate() {
        if index % step != 0 {
            continue;
        }
        let dest = staging.join(format!("{base}frame{}.jpg", index + 1));
        selected.push(dest.clone());
        writes.push(tokio::task::spawn_blocking(move || {
            let rgb = image::DynamicImage::ImageRgba8(frame.into_buffer()).to_rgb8();
            rgb.save(&dest)?;
            Ok(())
        }));
    }
    // Every handle is awaited even when an earlier write failed, so no
    // write can still be touching the staging directory after return.
    let mut first_err = None;
    for handle in writes {
        let settled = match handle.await {
            Ok(write) => write,
            Err(e) => Err(MediaError::internal(format!("frame write task failed: {e}"))),
        };
        if let Err(e) = settled {
            first_err.get_or_insert(e);
        }
    }
    if let Some(e) = first_err {
        return Err(e);
    }

    info!(
        "materialized {} GIF frame(s) into {}",
        selected.len(),
        staging.display()
    );
    Ok(selected)
}

/// Extract video frames into `staging` as PNG files via ffmpeg.
///
/// Uses the configured frame rate, probing the source's native rate when
/// none is set. The resulting file list is sorted numerically so that
/// `frame2.png` precedes `frame10.png`.
pub async fn materialize_video(
    path: &Path,
    staging: &Path,
    options: &ResolvedOptions,
) -> MediaResult<Vec<PathBuf>> {
    let fps = match options.framerate {
        Some(fps) => fps,
        None => probe_frame_rate(path, options.ffmpeg_path.as_deref()).await?,
    };

    let base = base_name(&path.to_string_lossy());
    let pattern = staging.join(format!("{base}frame%d.png"));
    debug!(
        "materializing video {} at {} fps into {}",
        path.display(),
        fps,
        staging.display()
    );

    let cmd = FfmpegCommand::new(path, &pattern).frame_rate(fps);
    let mut runner = FfmpegRunner::new();
    if let Some(ffmpeg) = &options.ffmpeg_path {
        runner = runner.with_binary(ffmpeg);
    }
    runner.run(&cmd).await?;

    let mut files = Vec::new();
    let mut entries = fs::read_dir(staging).await?;
    while let Some(entry) = entries.next_entry().await? {
        files.push(entry.path());
    }
    files.sort_by(|a, b| numeric_compare(&a.to_string_lossy(), &b.to_string_lossy()));

    info!(
        "materialized {} video frame(s) into {}",
        files.len(),
        staging.display()
    );
    Ok(files)
}

/// Sampling stride for GIF extraction.
///
/// `step = ceil(total / (total / max(1, skip)))`, which reduces to the
/// skip factor itself for the common case. Always at least 1.
pub(crate) fn gif_step(total_frames: usize, skip_factor: u32) -> usize {
    let skip = skip_factor.max(1) as f64;
    if total_frames == 0 {
        return 1;
    }
    let constraint = total_frames as f64 / skip;
    ((total_frames as f64 / constraint).ceil() as usize).max(1)
}

/// Compare strings so that embedded numbers order numerically.
///
/// A plain lexicographic sort would place `frame10` before `frame2`.
pub(crate) fn numeric_compare(a: &str, b: &str) -> Ordering {
    let (ab, bb) = (a.as_bytes(), b.as_bytes());
    let (mut i, mut j) = (0, 0);

    while i < ab.len() && j < bb.len() {
        if ab[i].is_ascii_digit() && bb[j].is_ascii_digit() {
            let si = i;
            while i < ab.len() && ab[i].is_ascii_digit() {
                i += 1;
            }
            let sj = j;
            while j < bb.len() && bb[j].is_ascii_digit() {
                j += 1;
            }
            let na = a[si..i].trim_start_matches('0');
            let nb = b[sj..j].trim_start_matches('0');
            let ord = na.len().cmp(&nb.len()).then_with(|| na.cmp(nb));
            if ord != Ordering::Equal {
                return ord;
            }
        } else {
            let ord = ab[i].cmp(&bb[j]);
            if ord != Ordering::Equal {
                return ord;
            }
            i += 1;
            j += 1;
        }
    }

    (ab.len() - i).cmp(&(bb.len() - j))
}
