use async_trait::async_trait;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use std::path::{Component, Path, PathBuf};

use super::{BlobStore, StoreError};

/// URL prefix under which `main` serves the upload directory.
pub const UPLOADS_MOUNT: &str = "/uploads";

const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Blob store backed by a local directory, served statically by actix-files.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
    public_base: String,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>, public_base: &str) -> Self {
        Self {
            root: root.into(),
            public_base: public_base.trim_end_matches('/').to_string(),
        }
    }

    /// Map a key onto the root directory. Only plain relative segments are allowed.
    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let relative = Path::new(key);
        let plain = !key.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !plain {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put(&self, key: &str, bytes: &[u8], _content_type: Option<&str>) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;
        log::debug!("Stored blob {} ({} bytes)", key, bytes.len());
        Ok(())
    }

    async fn public_url(&self, key: &str) -> Result<String, StoreError> {
        let path = self.path_for(key)?;
        tokio::fs::metadata(&path).await?;

        let encoded: Vec<String> = key
            .split('/')
            .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
            .collect();
        Ok(format!("{}{}/{}", self.public_base, UPLOADS_MOUNT, encoded.join("/")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_resolve_url() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let store = FsBlobStore::new(dir.path(), "http://localhost:8080/");

        store
            .put("images/masala chai.jpg", b"jpeg", Some("image/jpeg"))
            .await
            .expect("put");

        let written = std::fs::read(dir.path().join("images/masala chai.jpg")).expect("read back");
        assert_eq!(written, b"jpeg");

        let url = store.public_url("images/masala chai.jpg").await.expect("url");
        assert_eq!(url, "http://localhost:8080/uploads/images/masala%20chai.jpg");
    }

    #[tokio::test]
    async fn same_key_overwrites() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let store = FsBlobStore::new(dir.path(), "http://localhost");

        store.put("images/a.png", b"first", None).await.expect("first put");
        store.put("images/a.png", b"second", None).await.expect("second put");

        let written = std::fs::read(dir.path().join("images/a.png")).expect("read back");
        assert_eq!(written, b"second");
    }

    #[tokio::test]
    async fn url_for_missing_blob_fails() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let store = FsBlobStore::new(dir.path(), "http://localhost");
        assert!(store.public_url("images/nope.png").await.is_err());
    }

    #[tokio::test]
    async fn traversal_keys_are_rejected() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let store = FsBlobStore::new(dir.path(), "http://localhost");

        for key in ["../escape.png", "/etc/passwd", "images/../../x", ""] {
            let err = store.put(key, b"x", None).await.unwrap_err();
            assert!(matches!(err, StoreError::InvalidKey(_)), "key {key:?}");
        }
    }
}
