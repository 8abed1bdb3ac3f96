//! Image storage behind a small trait so the dashboard can upload banner,
//! catalogue and carousel images without caring where the bytes live.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::ServiceError;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StoredMedia {
    pub key: String,
    pub url: String,
    pub content_type: String,
    pub size: usize,
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn put(&self, content_type: &str, bytes: &[u8]) -> Result<StoredMedia, ServiceError>;
    /// Returns false when nothing was stored under `key`.
    async fn delete(&self, key: &str) -> Result<bool, ServiceError>;
    /// Key of a URL previously returned by `put`, if the URL belongs to this store.
    fn key_for_url(&self, url: &str) -> Option<String>;
}

/// Accepted image types and the file extension used for each.
pub fn extension_for(content_type: &str) -> Option<&'static str> {
    let base = content_type.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
    match base.as_str() {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        "image/svg+xml" => Some("svg"),
        _ => None,
    }
}

/// Keys are `<uuid>.<ext>`; anything else (path separators, dots, traversal) is rejected.
fn is_valid_key(key: &str) -> bool {
    let Some((stem, ext)) = key.rsplit_once('.') else { return false };
    Uuid::parse_str(stem).is_ok() && matches!(ext, "jpg" | "png" | "webp" | "gif" | "svg")
}

/// Files under a local directory, published by the HTTP server under `public_base_url`.
#[derive(Clone, Debug)]
pub struct LocalMediaStore {
    root: PathBuf,
    public_base_url: String,
    max_bytes: usize,
}

impl LocalMediaStore {
    pub fn new<P: Into<PathBuf>>(root: P, public_base_url: &str, max_bytes: usize) -> Self {
        Self { root: root.into(), public_base_url: public_base_url.trim_end_matches('/').to_string(), max_bytes }
    }

    pub fn from_config(cfg: &configs::MediaConfig) -> Self {
        Self::new(cfg.root.clone(), &cfg.public_base_url, cfg.max_upload_bytes)
    }

    pub fn root(&self) -> &std::path::Path { &self.root }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn put(&self, content_type: &str, bytes: &[u8]) -> Result<StoredMedia, ServiceError> {
        let ext = extension_for(content_type)
            .ok_or_else(|| ServiceError::Validation(format!("unsupported content type '{content_type}'")))?;
        if bytes.is_empty() {
            return Err(ServiceError::Validation("empty upload".into()));
        }
        if bytes.len() > self.max_bytes {
            return Err(ServiceError::Validation(format!("upload exceeds {} bytes", self.max_bytes)));
        }
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| ServiceError::Media(e.to_string()))?;
        let key = format!("{}.{}", Uuid::new_v4(), ext);
        tokio::fs::write(self.root.join(&key), bytes)
            .await
            .map_err(|e| ServiceError::Media(e.to_string()))?;
        info!(event = "media_stored", %key, "stored upload");
        Ok(StoredMedia {
            url: format!("{}/{}", self.public_base_url, key),
            key,
            content_type: content_type.to_string(),
            size: bytes.len(),
        })
    }

    async fn delete(&self, key: &str) -> Result<bool, ServiceError> {
        if !is_valid_key(key) {
            return Err(ServiceError::Validation("invalid media key".into()));
        }
        match tokio::fs::remove_file(self.root.join(key)).await {
            Ok(()) => {
                info!(event = "media_deleted", %key, "deleted upload");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ServiceError::Media(e.to_string())),
        }
    }

    fn key_for_url(&self, url: &str) -> Option<String> {
        let rest = url.strip_prefix(&self.public_base_url)?.strip_prefix('/')?;
        is_valid_key(rest).then(|| rest.to_string())
    }
}
