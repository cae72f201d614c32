/// Image storage - cover art and avatars on local disk
use crate::error::{Result, ServerError};
use async_trait::async_trait;
use bytes::Bytes;
use std::path::PathBuf;
use tokio::fs;

/// Longest sanitized filename kept in an object key
const MAX_FILENAME_LEN: usize = 100;

/// Object storage for uploaded images
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store an image and return the URL it is reachable at
    ///
    /// Rejects non-image content types and payloads larger than the
    /// configured limit with a bad request.
    async fn upload_image(
        &self,
        data: Bytes,
        size: usize,
        content_type: &str,
        filename: &str,
    ) -> Result<String>;
}

/// `ImageStore` writing into a local directory served under `public_url`
#[derive(Debug, Clone)]
pub struct FileStorage {
    base_path: PathBuf,
    public_url: String,
    max_bytes: usize,
}

impl FileStorage {
    pub fn new(base_path: PathBuf, public_url: impl Into<String>, max_bytes: usize) -> Self {
        Self {
            base_path,
            public_url: public_url.into().trim_end_matches('/').to_string(),
            max_bytes,
        }
    }

    /// Create the storage directory
    pub async fn initialize(&self) -> Result<()> {
        fs::create_dir_all(&self.base_path).await?;
        Ok(())
    }

    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Object key for an upload: random prefix plus sanitized name
    fn object_key(filename: &str, content_type: &str) -> String {
        let mut name = sanitize_filename(filename);
        if name.is_empty() {
            let ext = mime_guess::get_mime_extensions_str(content_type)
                .and_then(|exts| exts.first())
                .copied()
                .unwrap_or("bin");
            name = format!("upload.{ext}");
        }
        format!("{}-{}", uuid::Uuid::new_v4(), name)
    }
}

#[async_trait]
impl ImageStore for FileStorage {
    async fn upload_image(
        &self,
        data: Bytes,
        size: usize,
        content_type: &str,
        filename: &str,
    ) -> Result<String> {
        if !content_type.starts_with("image/") {
            return Err(ServerError::BadRequest(format!(
                "Unsupported content type '{content_type}', expected an image"
            )));
        }

        if size > self.max_bytes || data.len() > self.max_bytes {
            return Err(ServerError::BadRequest(format!(
                "Upload exceeds the {} byte limit",
                self.max_bytes
            )));
        }

        let key = Self::object_key(filename, content_type);
        let path = self.base_path.join(&key);

        fs::create_dir_all(&self.base_path).await?;
        fs::write(&path, &data).await?;

        tracing::info!(key = %key, size = data.len(), content_type, "image stored");

        Ok(format!("{}/{}", self.public_url, key))
    }
}

/// Reduce a client-supplied filename to a safe single path component
///
/// Keeps ASCII alphanumerics, `.`, `-` and `_`; whitespace becomes `_`;
/// everything else, including path separators, is dropped.
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or_default();

    let cleaned: String = base
        .chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') => Some(c),
            c if c.is_whitespace() => Some('_'),
            _ => None,
        })
        .collect();

    let trimmed = cleaned.trim_start_matches('.');
    trimmed.chars().take(MAX_FILENAME_LEN).collect()
}
