//! Media download adapter.
//!
//! Fetches the media referenced by scraped posts into a per-post directory.
//! Failures are scoped to one URL: a bad fetch or write is logged and the
//! rest of the batch continues.

use std::path::Path;

use tracing::{info, warn};
use url::Url;

use crate::models::Post;

/// Map a Content-Type header to a file extension.
pub fn extension_for(content_type: &str) -> &'static str {
    let ct = content_type.to_ascii_lowercase();
    if ct.contains("image") {
        if ct.contains("jpeg") {
            "jpg"
        } else {
            "png"
        }
    } else if ct.contains("video") {
        "mp4"
    } else {
        "bin"
    }
}

/// Download all media referenced by `posts` into `download_dir`.
///
/// Each post with media gets its own `<download_dir>/<post_id>/` directory,
/// with assets numbered from 1 in URL order. Returns the number of files
/// written.
pub async fn download_post_media(
    client: &reqwest::Client,
    posts: &[Post],
    download_dir: &Path,
) -> anyhow::Result<usize> {
    std::fs::create_dir_all(download_dir)?;

    let mut saved = 0usize;

    for post in posts {
        if post.media_urls.is_empty() {
            continue;
        }

        let post_dir = download_dir.join(&post.post_id);
        if let Err(e) = std::fs::create_dir_all(&post_dir) {
            warn!("Could not create {}: {}", post_dir.display(), e);
            continue;
        }

        for (i, media_url) in post.media_urls.iter().enumerate() {
            if Url::parse(media_url).is_err() {
                warn!("Skipping invalid media URL: {}", media_url);
                continue;
            }

            let response = match client.get(media_url).send().await {
                Ok(r) => r,
                Err(e) => {
                    warn!("Error downloading media {}: {}", media_url, e);
                    continue;
                }
            };

            if !response.status().is_success() {
                warn!(
                    "Failed to download media {} (status {})",
                    media_url,
                    response.status()
                );
                continue;
            }

            let content_type = response
                .headers()
                .get("content-type")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            let ext = extension_for(&content_type);

            let body = match response.bytes().await {
                Ok(b) => b,
                Err(e) => {
                    warn!("Error reading media body {}: {}", media_url, e);
                    continue;
                }
            };

            let file_path = post_dir.join(format!("{}.{}", i + 1, ext));
            match std::fs::write(&file_path, &body) {
                Ok(()) => {
                    info!("Downloaded: {}", file_path.display());
                    saved += 1;
                }
                Err(e) => {
                    warn!("Error writing {}: {}", file_path.display(), e);
                }
            }
        }
    }

    Ok(saved)
}
