//! The upload pipeline: multipart parts into the object store

use crate::multipart::{MultipartError, PartReader};
use asset_store::{ObjectStore, StoreError};
use bytes::Bytes;
use futures::{Stream, TryStreamExt};
use std::sync::Arc;
use thiserror::Error;

/// Errors from a single upload run
#[derive(Error, Debug)]
pub enum UploadError {
    /// The request body was not a valid multipart stream (client fault)
    #[error(transparent)]
    Multipart(#[from] MultipartError),

    /// The object store failed (infrastructure fault)
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Streams the file parts of a multipart request into an object store.
///
/// Field parts are drained and ignored. File part bodies are handed to
/// the store chunk by chunk, never materialized. The first failure
/// aborts the run; objects stored by earlier parts stay stored, there
/// is no rollback and no retry at this layer.
pub struct UploadPipeline<S: ?Sized> {
    store: Arc<S>,
    container: String,
}

impl<S> UploadPipeline<S>
where
    S: ObjectStore + ?Sized,
{
    /// Create a pipeline writing into `container` of `store`.
    pub fn new(store: Arc<S>, container: impl Into<String>) -> Self {
        Self {
            store,
            container: container.into(),
        }
    }

    /// Consume the part sequence and return the stored object names, in
    /// the order the file parts appeared in the body.
    pub async fn run<B>(&self, reader: &mut PartReader<B>) -> Result<Vec<String>, UploadError>
    where
        B: Stream<Item = std::io::Result<Bytes>> + Unpin + Send,
    {
        self.store.ensure_container(&self.container).await?;

        let mut file_names = Vec::new();
        while let Some(part) = reader.next_part().await? {
            if !part.is_file() {
                // Drained by the next next_part call.
                continue;
            }
            let name = object_name(part.file_name().unwrap_or_default());

            let body = Box::pin(part.map_err(std::io::Error::other));
            match self.store.put_stream(&self.container, &name, body).await {
                Ok(written) => {
                    tracing::debug!(name = %name, written, "stored file part");
                    file_names.push(name);
                }
                // A source fault means the multipart stream itself broke
                // mid-transfer; give it back its original class.
                Err(StoreError::Source(err)) => return Err(reclassify_source(err)),
                Err(err) => return Err(UploadError::Store(err)),
            }
        }

        Ok(file_names)
    }
}

/// Derive the stored object name from a part's raw filename: strip one
/// leading and one trailing double quote, then replace every `&` with
/// `and`. Nothing else — no path stripping, no uniquifying — matching
/// the upload contract; colliding names overwrite, last write wins.
pub fn object_name(raw_file_name: &str) -> String {
    let name = raw_file_name.strip_prefix('"').unwrap_or(raw_file_name);
    let name = name.strip_suffix('"').unwrap_or(name);
    name.replace('&', "and")
}

fn reclassify_source(err: std::io::Error) -> UploadError {
    match err.downcast::<MultipartError>() {
        Ok(multipart) => UploadError::Multipart(multipart),
        Err(other) => UploadError::Store(StoreError::Source(other)),
    }
}
