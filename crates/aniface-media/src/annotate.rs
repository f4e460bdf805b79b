//! Annotated-output rendering.
//!
//! When a detection succeeds and an output directory is configured, the
//! detected frame is copied with every face rectangle drawn on it and
//! persisted as `<output-dir>/<base-name>-result<original-extension>`.

use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use aniface_models::media::extension;
use aniface_models::options::ResolvedOptions;
use aniface_models::rect::FaceRect;

use crate::error::{MediaError, MediaResult};
use crate::staging::base_name;

/// Derive `<output-dir>/<base-name>-result<original-extension>`.
pub fn output_path(source: &str, write_dir: &Path) -> PathBuf {
    match extension(source) {
        Some(ext) => write_dir.join(format!("{}-result.{}", base_name(source), ext)),
        None => write_dir.join(format!("{}-result", base_name(source))),
    }
}

/// Draw every face rectangle on a copy of `image` and persist it.
///
/// Returns the path of the written file.
pub async fn annotate(
    image: &RgbaImage,
    faces: &[FaceRect],
    source: &str,
    options: &ResolvedOptions,
) -> MediaResult<PathBuf> {
    let write_dir = options
        .write_dir
        .as_ref()
        .ok_or_else(|| MediaError::internal("annotate called without an output directory"))?;
    fs::create_dir_all(write_dir).await?;

    let mut canvas = image.clone();
    let color = Rgba(options.stroke_color);
    for face in faces {
        draw_face_rect(&mut canvas, face, color, options.thickness);
    }

    let dest = output_path(source, write_dir);
    let path = dest.clone();
    tokio::task::spawn_blocking(move || -> MediaResult<()> {
        image::DynamicImage::ImageRgba8(canvas).to_rgb8().save(&path)?;
        Ok(())
    })
    .await
    .map_err(|e| MediaError::internal(format!("annotation write task failed: {e}")))??;

    debug!("wrote annotated copy {}", dest.display());
    Ok(dest)
}

/// Stroke a rectangle with the given thickness by nesting hollow rects.
fn draw_face_rect(canvas: &mut RgbaImage, face: &FaceRect, color: Rgba<u8>, thickness: u32) {
    for t in 0..thickness.max(1) {
        let width = face.width.saturating_sub(2 * t);
        let height = face.height.saturating_sub(2 * t);
        if width == 0 || height == 0 {
            break;
        }
        let rect = Rect::at(face.x as i32 + t as i32, face.y as i32 + t as i32).of_size(width, height);
        draw_hollow_rect_mut(canvas, rect, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aniface_models::options::DetectOptions;
    use tempfile::TempDir;

    #[test]
    fn test_output_path_keeps_original_extension() {
        assert_eq!(
            output_path("media/anime.gif", Path::new("/out")),
            PathBuf::from("/out/anime-result.gif")
        );
        assert_eq!(
            output_path("https://example.com/pic.png", Path::new("out")),
            PathBuf::from("out/pic-result.png")
        );
    }

    #[test]
    fn test_draw_face_rect_colors_border_pixels() {
        let mut canvas = RgbaImage::from_pixel(32, 32, Rgba([0, 0, 0, 255]));
        let face = FaceRect::new(4, 4, 10, 10);
        let color = Rgba([255, 44, 41, 255]);

        draw_face_rect(&mut canvas, &face, color, 2);

        // Outer border and the inset ring are stroked; the interior is not.
        assert_eq!(*canvas.get_pixel(4, 4), color);
        assert_eq!(*canvas.get_pixel(5, 5), color);
        assert_eq!(*canvas.get_pixel(8, 8), Rgba([0, 0, 0, 255]));
    }

    #[tokio::test]
    async fn test_annotate_writes_result_file() {
        let tmp = TempDir::new().unwrap();
        let options = DetectOptions {
            write_dir: Some(tmp.path().join("out")),
            ..Default::default()
        }
        .resolve()
        .unwrap();

        let image = RgbaImage::from_pixel(16, 16, Rgba([10, 20, 30, 255]));
        let faces = [FaceRect::new(2, 2, 8, 8)];

        let dest = annotate(&image, &faces, "media/anime.png", &options)
            .await
            .unwrap();

        assert_eq!(dest, tmp.path().join("out/anime-result.png"));
        assert!(dest.exists());
    }
}
