//! # Asset Store
//!
//! Container-addressed object storage for the asset gateway.
//!
//! This crate provides:
//! - **ObjectStore trait**: ensure-container, streaming put, streaming get
//! - **FsObjectStore**: durable local-filesystem backend
//! - **MemoryObjectStore**: in-memory backend for development and tests
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            Upload Pipeline              │
//! ├─────────────────────────────────────────┤
//! │           ObjectStore Trait             │
//! ├────────────────────┬────────────────────┤
//! │    FsObjectStore   │  MemoryObjectStore │
//! ├────────────────────┴────────────────────┤
//! │         Filesystem / Process heap       │
//! └─────────────────────────────────────────┘
//! ```
//!
//! Objects are addressed by `(container, key)`. Writes overwrite
//! silently; the last writer wins, within and across requests.
//!
//! ## Example
//!
//! ```rust,ignore
//! use asset_store::{FsObjectStore, ObjectStore};
//!
//! let store = FsObjectStore::new("/var/lib/assets");
//! store.ensure_container("digitalAssets").await?;
//! store.put_stream("digitalAssets", "a.txt", data).await?;
//! ```

pub mod error;
pub mod fs;
pub mod memory;

pub use error::{Result, StoreError};
pub use fs::FsObjectStore;
pub use memory::MemoryObjectStore;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;

/// A stream of byte chunks flowing into or out of a store
pub type ByteStream<'a> = BoxStream<'a, std::io::Result<Bytes>>;

/// Trait for object storage backends
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Make sure a container exists. Idempotent, safe to call on every
    /// request.
    async fn ensure_container(&self, container: &str) -> Result<()>;

    /// Stream `data` to completion under `container/key`, replacing any
    /// existing object. Returns the number of bytes written.
    ///
    /// Implementations must not materialize the whole stream before the
    /// transfer begins, and must report faults while polling `data` as
    /// [`StoreError::Source`].
    async fn put_stream(&self, container: &str, key: &str, data: ByteStream<'_>) -> Result<u64>;

    /// Open a stream over the bytes stored under `container/key`.
    async fn get_stream(&self, container: &str, key: &str) -> Result<ByteStream<'static>>;
}
