//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use tracing::warn;

/// Ensure the media root exists; warn when the configured public base looks unusable.
pub async fn ensure_media_root(media_root: &str, public_base_url: &str) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(media_root)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {media_root}: {e}"))?;
    if !public_base_url.starts_with('/') && !public_base_url.starts_with("http") {
        warn!(%public_base_url, "media.public_base_url is neither a path nor an absolute URL; uploaded images may 404");
    }
    Ok(())
}
