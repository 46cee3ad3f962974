//! Local-filesystem object store

use crate::{ByteStream, ObjectStore, Result, StoreError};
use async_trait::async_trait;
use futures::StreamExt;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;

/// A durable object store backed by a directory tree
///
/// Containers map to directories under `root`, objects to files under
/// their container. Object keys may contain `/` and create
/// subdirectories; keys that would escape their container (`..`,
/// rooted paths) are rejected with [`StoreError::InvalidKey`].
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    /// Create a store rooted at `root`. The directory is created lazily
    /// by `ensure_container`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the store
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn container_path(&self, container: &str) -> Result<PathBuf> {
        let mut components = Path::new(container).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.root.join(container)),
            _ => Err(StoreError::InvalidKey(container.to_string())),
        }
    }

    fn object_path(&self, container: &str, key: &str) -> Result<PathBuf> {
        if key.is_empty() {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        let relative = Path::new(key);
        if !relative.components().all(|c| matches!(c, Component::Normal(_))) {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.container_path(container)?.join(relative))
    }
}

/// Process-unique scratch name next to the target path
fn scratch_path(path: &Path) -> PathBuf {
    static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(0);
    let n = COUNTER.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(format!(".{}.{}.tmp", std::process::id(), n));
    path.with_file_name(name)
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn ensure_container(&self, container: &str) -> Result<()> {
        let path = self.container_path(container)?;
        fs::create_dir_all(&path).await?;
        Ok(())
    }

    async fn put_stream(&self, container: &str, key: &str, mut data: ByteStream<'_>) -> Result<u64> {
        let container_dir = self.container_path(container)?;
        if !container_dir.is_dir() {
            return Err(StoreError::ContainerNotFound(container.to_string()));
        }

        let path = self.object_path(container, key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let write_err = |source| StoreError::Write {
            container: container.to_string(),
            key: key.to_string(),
            source,
        };

        // Write to a scratch file and rename into place, so a transfer
        // that dies mid-stream leaves no partial object behind.
        let scratch = scratch_path(&path);
        let result = async {
            let mut file = fs::File::create(&scratch).await.map_err(write_err)?;
            let mut written = 0u64;
            while let Some(chunk) = data.next().await {
                let chunk = chunk.map_err(StoreError::Source)?;
                file.write_all(&chunk).await.map_err(write_err)?;
                written += chunk.len() as u64;
            }
            file.flush().await.map_err(write_err)?;
            fs::rename(&scratch, &path).await.map_err(write_err)?;
            Ok(written)
        }
        .await;

        match result {
            Ok(written) => {
                tracing::debug!(container, key, written, "stored object");
                Ok(written)
            }
            Err(err) => {
                let _ = fs::remove_file(&scratch).await;
                Err(err)
            }
        }
    }

    async fn get_stream(&self, container: &str, key: &str) -> Result<ByteStream<'static>> {
        let path = self.object_path(container, key)?;
        let file = fs::File::open(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StoreError::NotFound {
                    container: container.to_string(),
                    key: key.to_string(),
                }
            } else {
                StoreError::Io(e)
            }
        })?;
        Ok(ReaderStream::new(file).boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn chunks(parts: &[&'static [u8]]) -> ByteStream<'static> {
        futures::stream::iter(
            parts
                .iter()
                .map(|p| Ok(Bytes::from_static(p)))
                .collect::<Vec<std::io::Result<Bytes>>>(),
        )
        .boxed()
    }

    async fn collect(mut stream: ByteStream<'_>) -> Vec<u8> {
        let mut out = Vec::new();
        while let Some(chunk) = stream.next().await {
            out.extend_from_slice(&chunk.unwrap());
        }
        out
    }

    #[tokio::test]
    async fn writes_and_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(dir.path());
        store.ensure_container("assets").await.unwrap();

        let written = store
            .put_stream("assets", "a.txt", chunks(&[b"hello, ", b"world"]))
            .await
            .unwrap();
        assert_eq!(written, 12);

        let stream = store.get_stream("assets", "a.txt").await.unwrap();
        assert_eq!(collect(stream).await, b"hello, world");
    }

    #[tokio::test]
    async fn nested_keys_create_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(dir.path());
        store.ensure_container("assets").await.unwrap();

        store
            .put_stream("assets", "img/2024/logo.png", chunks(&[b"png"]))
            .await
            .unwrap();

        assert!(dir.path().join("assets/img/2024/logo.png").is_file());
    }

    #[tokio::test]
    async fn rejects_escaping_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(dir.path());
        store.ensure_container("assets").await.unwrap();

        for key in ["../evil", "/etc/passwd", "a/../../b", ""] {
            let result = store.put_stream("assets", key, chunks(&[b"x"])).await;
            assert!(
                matches!(result, Err(StoreError::InvalidKey(_))),
                "key {key:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn missing_object_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(dir.path());
        store.ensure_container("assets").await.unwrap();

        let result = store.get_stream("assets", "nope.txt").await;
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn put_without_container_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(dir.path());

        let result = store.put_stream("ghost", "a.txt", chunks(&[b"x"])).await;
        assert!(matches!(result, Err(StoreError::ContainerNotFound(_))));
    }

    #[tokio::test]
    async fn failed_transfer_leaves_no_object() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(dir.path());
        store.ensure_container("assets").await.unwrap();

        let data: ByteStream<'static> = futures::stream::iter(vec![
            Ok(Bytes::from_static(b"some bytes, then the source dies")),
            Err(std::io::Error::other("peer reset")),
        ])
        .boxed();

        let result = store.put_stream("assets", "broken.bin", data).await;
        assert!(matches!(result, Err(StoreError::Source(_))));

        assert!(matches!(
            store.get_stream("assets", "broken.bin").await,
            Err(StoreError::NotFound { .. })
        ));
        // No scratch files linger either.
        let mut entries = fs::read_dir(dir.path().join("assets")).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn overwrite_truncates_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(dir.path());
        store.ensure_container("assets").await.unwrap();

        store
            .put_stream("assets", "a.txt", chunks(&[b"a much longer first body"]))
            .await
            .unwrap();
        store
            .put_stream("assets", "a.txt", chunks(&[b"short"]))
            .await
            .unwrap();

        let stream = store.get_stream("assets", "a.txt").await.unwrap();
        assert_eq!(collect(stream).await, b"short");
    }
}
