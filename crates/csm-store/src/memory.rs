use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use csm_types::{BucketRef, ObjectKey};

use crate::error::{StoreError, StoreResult};
use crate::traits::BlobStore;

type Location = (BucketRef, ObjectKey);

/// In-memory, HashMap-based blob store.
///
/// Intended for tests and embedding. Objects live behind a `RwLock` for safe
/// concurrent access and are cloned on read/write. Every trait call is
/// counted so callers can assert that a failing operation never reached the
/// store.
pub struct InMemoryBlobStore {
    objects: RwLock<HashMap<Location, Vec<u8>>>,
    calls: AtomicUsize,
}

impl InMemoryBlobStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Seed an object without counting it as a store call.
    pub fn insert(&self, bucket: &BucketRef, key: &ObjectKey, data: impl Into<Vec<u8>>) {
        self.objects
            .write()
            .expect("lock poisoned")
            .insert((bucket.clone(), key.clone()), data.into());
    }

    /// Peek at an object without counting it as a store call.
    pub fn object(&self, bucket: &BucketRef, key: &ObjectKey) -> Option<Vec<u8>> {
        self.objects
            .read()
            .expect("lock poisoned")
            .get(&(bucket.clone(), key.clone()))
            .cloned()
    }

    /// Number of objects currently stored, across all buckets.
    pub fn len(&self) -> usize {
        self.objects.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.read().expect("lock poisoned").is_empty()
    }

    /// Number of `get_blob`/`put_blob` calls served so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for InMemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BlobStore for InMemoryBlobStore {
    fn get_blob(&self, bucket: &BucketRef, key: &ObjectKey) -> StoreResult<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.object(bucket, key).ok_or_else(|| StoreError::NotFound {
            bucket: bucket.clone(),
            key: key.clone(),
        })
    }

    fn put_blob(&self, bucket: &BucketRef, key: &ObjectKey, data: &[u8]) -> StoreResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.insert(bucket, key, data);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

impl std::fmt::Debug for InMemoryBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.len();
        f.debug_struct("InMemoryBlobStore")
            .field("object_count", &count)
            .finish()
    }
}
