//! Remote media acquisition.
//!
//! GIF and video input must be on local disk before frame extraction can
//! begin. Remote locators are fetched into the configured download
//! directory with a fixed browser-like user agent; the downloaded file is
//! left in place after the invocation (it is not part of the per-run
//! staging area).

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use aniface_models::options::ResolvedOptions;

use crate::error::{MediaError, MediaResult};

/// User agent sent with every remote fetch.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/80.0.3987.122 Safari/537.36";

/// Referer header sent with every remote fetch.
const REFERER: &str = "https://www.pixiv.net/";

/// True when the locator names a remote resource.
pub fn is_remote(locator: &str) -> bool {
    locator.starts_with("http://") || locator.starts_with("https://")
}

/// Ensure the input is on local disk.
///
/// Local paths pass through unchanged. Remote locators require a configured
/// download directory (created if absent) and are written to
/// `<download-dir>/<basename>`; that path is returned.
pub async fn acquire(locator: &str, options: &ResolvedOptions) -> MediaResult<PathBuf> {
    if !is_remote(locator) {
        return Ok(PathBuf::from(locator));
    }

    let download_dir = options
        .download_dir
        .as_ref()
        .ok_or(MediaError::DownloadDirRequired)?;
    fs::create_dir_all(download_dir).await?;

    let file_name = Path::new(locator)
        .file_name()
        .map(|n| n.to_os_string())
        .ok_or_else(|| MediaError::download_failed(format!("no file name in {locator}")))?;
    let dest = download_dir.join(file_name);

    let bytes = fetch_bytes(locator).await?;
    fs::write(&dest, &bytes).await?;
    info!("downloaded {} ({} bytes)", dest.display(), bytes.len());

    Ok(dest)
}

/// Fetch a remote URL's bytes into memory.
pub async fn fetch_bytes(url: &str) -> MediaResult<Vec<u8>> {
    debug!("fetching {}", url);

    let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
    let response = client
        .get(url)
        .header(reqwest::header::REFERER, REFERER)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(MediaError::download_failed(format!(
            "{} returned {}",
            url,
            response.status()
        )));
    }

    Ok(response.bytes().await?.to_vec())
}
