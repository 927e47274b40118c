//! Object storage for uploaded media. One call stores one blob and returns a
//! stable public locator URL.
//!
//! The disk-backed implementation keys files by UUID under the media directory
//! and serves them back through the `/media` files route, so the locator is a
//! deterministic URL template over the generated file name. An MD5 checksum of
//! the stored bytes travels with the locator. Whether stored documents should
//! stay publicly readable is an open security-review item recorded in
//! DESIGN.md; the serving route itself carries no access policy.

use std::io::Write;
use std::path::PathBuf;

use common::requests::UploadOutcome;
use log::info;
use tempfile::NamedTempFile;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("refusing empty upload `{name}`")]
    Empty { name: String },
    #[error("object store rejected `{name}`: {message}")]
    Transport { name: String, message: String },
}

/// External object-storage collaborator: store bytes, get a locator back.
pub trait ObjectStore: Send + Sync {
    fn put(&self, name: &str, bytes: &[u8], mime: &str) -> Result<UploadOutcome, MediaError>;

    /// Resolves a locator minted by this store back to a local file, if the
    /// URL belongs to it. Renderers use this to stage images for embedding.
    fn local_path(&self, url: &str) -> Option<PathBuf>;
}

pub struct DiskStore {
    dir: PathBuf,
    media_base_url: String,
}

impl DiskStore {
    pub fn open(dir: impl Into<PathBuf>, public_base_url: &str) -> Result<Self, MediaError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(DiskStore {
            dir,
            media_base_url: format!("{}/media", public_base_url.trim_end_matches('/')),
        })
    }

    /// Extension from the client-supplied name when it looks sane, otherwise
    /// from the MIME type.
    fn extension(name: &str, mime: &str) -> Option<String> {
        if let Some((_, ext)) = name.rsplit_once('.') {
            if !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Some(ext.to_ascii_lowercase());
            }
        }
        mime_guess::get_mime_extensions_str(mime)
            .and_then(|exts| exts.first())
            .map(|e| e.to_string())
    }
}

impl ObjectStore for DiskStore {
    fn put(&self, name: &str, bytes: &[u8], mime: &str) -> Result<UploadOutcome, MediaError> {
        if bytes.is_empty() {
            return Err(MediaError::Empty {
                name: name.to_string(),
            });
        }
        let id = Uuid::new_v4().to_string();
        let file_name = match Self::extension(name, mime) {
            Some(ext) => format!("{id}.{ext}"),
            None => id.clone(),
        };
        let md5 = format!("{:x}", md5::compute(bytes));

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(bytes)?;
        tmp.flush()?;
        tmp.persist(self.dir.join(&file_name))
            .map_err(|e| MediaError::Io(e.error))?;

        info!("stored media object {file_name} ({} bytes, md5 {md5})", bytes.len());
        Ok(UploadOutcome {
            id,
            url: format!("{}/{}", self.media_base_url, file_name),
            md5,
            file_name,
        })
    }

    fn local_path(&self, url: &str) -> Option<PathBuf> {
        let file_name = url.strip_prefix(&format!("{}/", self.media_base_url))?;
        // Locators are flat: any path structure means the URL is not ours.
        if file_name.is_empty() || file_name.contains(['/', '\\']) || file_name.contains("..") {
            return None;
        }
        let path = self.dir.join(file_name);
        path.is_file().then_some(path)
    }
}
