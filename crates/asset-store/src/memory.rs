//! In-memory object store for development and tests

use crate::{ByteStream, ObjectStore, Result, StoreError};
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use dashmap::DashMap;
use futures::StreamExt;
use std::sync::Arc;

/// An in-memory object store
///
/// Data lives for the lifetime of the process. Unlike the durable
/// backends this one buffers each object fully on write, which is fine
/// for its intended use (tests, local development).
#[derive(Clone, Default)]
pub struct MemoryObjectStore {
    containers: Arc<DashMap<String, DashMap<String, Bytes>>>,
}

impl MemoryObjectStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            containers: Arc::new(DashMap::new()),
        }
    }

    /// Check whether a container exists
    pub fn has_container(&self, container: &str) -> bool {
        self.containers.contains_key(container)
    }

    /// Fetch a stored object's bytes, if present
    pub fn object(&self, container: &str, key: &str) -> Option<Bytes> {
        self.containers
            .get(container)
            .and_then(|c| c.get(key).map(|o| o.value().clone()))
    }

    /// Number of objects in a container
    pub fn len(&self, container: &str) -> usize {
        self.containers.get(container).map_or(0, |c| c.len())
    }

    /// Check if a container is empty or absent
    pub fn is_empty(&self, container: &str) -> bool {
        self.len(container) == 0
    }

    /// List keys in a container
    pub fn keys(&self, container: &str) -> Vec<String> {
        self.containers.get(container).map_or_else(Vec::new, |c| {
            c.iter().map(|o| o.key().clone()).collect()
        })
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn ensure_container(&self, container: &str) -> Result<()> {
        self.containers
            .entry(container.to_string())
            .or_default();
        Ok(())
    }

    async fn put_stream(&self, container: &str, key: &str, mut data: ByteStream<'_>) -> Result<u64> {
        let mut buf = BytesMut::new();
        while let Some(chunk) = data.next().await {
            let chunk = chunk.map_err(StoreError::Source)?;
            buf.extend_from_slice(&chunk);
        }

        let objects = self
            .containers
            .get(container)
            .ok_or_else(|| StoreError::ContainerNotFound(container.to_string()))?;
        let written = buf.len() as u64;
        objects.insert(key.to_string(), buf.freeze());
        Ok(written)
    }

    async fn get_stream(&self, container: &str, key: &str) -> Result<ByteStream<'static>> {
        let bytes = self.object(container, key).ok_or_else(|| StoreError::NotFound {
            container: container.to_string(),
            key: key.to_string(),
        })?;
        Ok(futures::stream::once(async move { Ok(bytes) }).boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
    async fn put_then_get_roundtrip() {
        let store = MemoryObjectStore::new();
        store.ensure_container("assets").await.unwrap();

        let written = store
            .put_stream("assets", "a.txt", chunks(&[b"hel", b"lo"]))
            .await
            .unwrap();
        assert_eq!(written, 5);

        let stream = store.get_stream("assets", "a.txt").await.unwrap();
        assert_eq!(collect(stream).await, b"hello");
    }

    #[tokio::test]
    async fn ensure_container_is_idempotent() {
        let store = MemoryObjectStore::new();
        store.ensure_container("assets").await.unwrap();
        store
            .put_stream("assets", "keep.bin", chunks(&[b"data"]))
            .await
            .unwrap();

        store.ensure_container("assets").await.unwrap();
        assert_eq!(store.len("assets"), 1);
    }

    #[tokio::test]
    async fn put_overwrites_existing_object() {
        let store = MemoryObjectStore::new();
        store.ensure_container("assets").await.unwrap();

        store
            .put_stream("assets", "a.txt", chunks(&[b"first"]))
            .await
            .unwrap();
        store
            .put_stream("assets", "a.txt", chunks(&[b"second"]))
            .await
            .unwrap();

        assert_eq!(store.object("assets", "a.txt").unwrap().as_ref(), b"second");
        assert_eq!(store.len("assets"), 1);
    }

    #[tokio::test]
    async fn get_missing_object_fails() {
        let store = MemoryObjectStore::new();
        store.ensure_container("assets").await.unwrap();

        let result = store.get_stream("assets", "nope").await;
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn put_to_missing_container_fails() {
        let store = MemoryObjectStore::new();
        let result = store.put_stream("ghost", "a", chunks(&[b"x"])).await;
        assert!(matches!(result, Err(StoreError::ContainerNotFound(_))));
    }

    #[tokio::test]
    async fn source_fault_is_reported_as_source() {
        let store = MemoryObjectStore::new();
        store.ensure_container("assets").await.unwrap();

        let data: ByteStream<'static> = futures::stream::iter(vec![
            Ok(Bytes::from_static(b"ok")),
            Err(std::io::Error::other("body gone")),
        ])
        .boxed();

        let result = store.put_stream("assets", "a", data).await;
        assert!(matches!(result, Err(StoreError::Source(_))));
    }
}
