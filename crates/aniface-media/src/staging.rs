//! Artifact naming and the per-invocation staging directory.
//!
//! Every generated artifact name derives from the input's base name
//! (filename without extension). Extracted frames live in a scratch
//! directory `<base-dir>/<base-name>Frames` that is destroyed and recreated
//! before extraction and removed unconditionally once scanning concludes,
//! whatever the outcome.

use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::warn;

use aniface_models::options::ResolvedOptions;

use crate::error::MediaResult;

/// Suffix appended to the base name to form the staging directory name.
const STAGING_SUFFIX: &str = "Frames";

/// Filename without its extension, used to derive generated artifact names.
pub fn base_name(locator: &str) -> String {
    Path::new(locator)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Compute the staging directory for a media item.
///
/// The base directory is the download directory when configured, else the
/// output directory when configured, else the current working directory.
pub fn staging_dir(local_path: &str, options: &ResolvedOptions) -> PathBuf {
    let base_dir = options
        .download_dir
        .clone()
        .or_else(|| options.write_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));
    base_dir.join(format!("{}{}", base_name(local_path), STAGING_SUFFIX))
}

/// Destroy any stale directory at `dir` and recreate it empty.
pub async fn prepare_staging(dir: &Path) -> MediaResult<()> {
    if is_protected(dir) {
        return Ok(());
    }
    remove_dir_recursive(dir).await?;
    fs::create_dir_all(dir).await?;
    Ok(())
}

/// Remove the staging directory once scanning concludes.
///
/// Invoked on every exit path, success or failure.
pub async fn cleanup_staging(dir: &Path) -> MediaResult<()> {
    remove_dir_recursive(dir).await
}

/// Recursively delete `dir`: files first, then emptied subdirectories,
/// then the directory itself.
///
/// Refuses filesystem-root and current-directory aliases as a guard
/// against misconfiguration. Failure to remove the final, emptied
/// directory is logged and swallowed; cleanup never aborts the caller's
/// result over it.
pub async fn remove_dir_recursive(dir: &Path) -> MediaResult<()> {
    if is_protected(dir) || !dir.exists() {
        return Ok(());
    }

    // Walk without recursion: collect directories in discovery order,
    // deleting files as we go, then rmdir the now-empty tree bottom-up.
    let mut pending = vec![dir.to_path_buf()];
    let mut dirs = Vec::new();
    while let Some(current) = pending.pop() {
        let mut entries = fs::read_dir(&current).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let meta = fs::symlink_metadata(&path).await?;
            if meta.is_dir() {
                pending.push(path);
            } else {
                fs::remove_file(&path).await?;
            }
        }
        dirs.push(current);
    }

    for sub in dirs.iter().rev() {
        if sub.as_path() == dir {
            continue;
        }
        fs::remove_dir(sub).await?;
    }

    if let Err(e) = fs::remove_dir(dir).await {
        warn!("failed to remove directory {}: {}", dir.display(), e);
    }
    Ok(())
}

/// Paths we refuse to delete recursively.
fn is_protected(dir: &Path) -> bool {
    if dir == Path::new("/") || dir == Path::new(".") || dir == Path::new("./") {
        return true;
    }
    // Anything that resolves to a bare filesystem root.
    let mut components = dir.components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::RootDir), None)
    )
}
