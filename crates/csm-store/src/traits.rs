use std::fs;
use std::path::Path;
use std::sync::Arc;

use csm_types::{BucketRef, ObjectKey};

use crate::error::{StoreError, StoreResult};

/// Byte-level access to a bucketed object store.
///
/// All implementations must satisfy these invariants:
/// - The store never interprets object contents.
/// - `get_blob` on a missing object returns [`StoreError::NotFound`], never
///   empty bytes.
/// - A successful `put_blob` replaces the whole object; there is no partial
///   write visible to readers.
/// - Calls are blocking and safe to make concurrently from several threads.
pub trait BlobStore: Send + Sync {
    /// Fetch the full contents of an object.
    fn get_blob(&self, bucket: &BucketRef, key: &ObjectKey) -> StoreResult<Vec<u8>>;

    /// Create or replace an object.
    fn put_blob(&self, bucket: &BucketRef, key: &ObjectKey, data: &[u8]) -> StoreResult<()>;

    /// Upload an object from a local file.
    ///
    /// The default implementation reads the file and calls `put_blob`.
    /// Backends with a native file upload may override it.
    fn put_file(&self, bucket: &BucketRef, key: &ObjectKey, path: &Path) -> StoreResult<()> {
        let data = fs::read(path).map_err(|source| StoreError::LocalFile {
            path: path.to_path_buf(),
            source,
        })?;
        self.put_blob(bucket, key, &data)
    }

    /// Short backend name, for logs.
    fn backend_name(&self) -> &'static str;
}

impl<T: BlobStore + ?Sized> BlobStore for Arc<T> {
    fn get_blob(&self, bucket: &BucketRef, key: &ObjectKey) -> StoreResult<Vec<u8>> {
        (**self).get_blob(bucket, key)
    }

    fn put_blob(&self, bucket: &BucketRef, key: &ObjectKey, data: &[u8]) -> StoreResult<()> {
        (**self).put_blob(bucket, key, data)
    }

    fn put_file(&self, bucket: &BucketRef, key: &ObjectKey, path: &Path) -> StoreResult<()> {
        (**self).put_file(bucket, key, path)
    }

    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }
}

impl<T: BlobStore + ?Sized> BlobStore for Box<T> {
    fn get_blob(&self, bucket: &BucketRef, key: &ObjectKey) -> StoreResult<Vec<u8>> {
        (**self).get_blob(bucket, key)
    }

    fn put_blob(&self, bucket: &BucketRef, key: &ObjectKey, data: &[u8]) -> StoreResult<()> {
        (**self).put_blob(bucket, key, data)
    }

    fn put_file(&self, bucket: &BucketRef, key: &ObjectKey, path: &Path) -> StoreResult<()> {
        (**self).put_file(bucket, key, path)
    }

    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }
}
