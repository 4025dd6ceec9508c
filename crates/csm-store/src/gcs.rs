//! Google Cloud Storage backend on top of `object_store`.
//!
//! `object_store` is async; this backend owns a small tokio runtime and
//! blocks on it, so callers keep the synchronous [`BlobStore`] contract.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use object_store::gcp::{GoogleCloudStorage, GoogleCloudStorageBuilder};
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

use csm_auth::AuthContext;
use csm_types::{BucketRef, ObjectKey};

use crate::error::{StoreError, StoreResult};
use crate::traits::BlobStore;

/// GCS blob store. One `object_store` client is built lazily per bucket and
/// reused for the lifetime of the store.
pub struct GcsBlobStore {
    auth: AuthContext,
    runtime: Runtime,
    clients: Mutex<HashMap<BucketRef, Arc<GoogleCloudStorage>>>,
}

impl GcsBlobStore {
    pub fn new(auth: AuthContext) -> StoreResult<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("csm-gcs")
            .enable_all()
            .build()?;
        Ok(Self {
            auth,
            runtime,
            clients: Mutex::new(HashMap::new()),
        })
    }

    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    fn builder(&self) -> GoogleCloudStorageBuilder {
        let builder = GoogleCloudStorageBuilder::new();
        match &self.auth {
            AuthContext::ServiceAccount { key, .. } => builder.with_service_account_key(key.to_json()),
            AuthContext::ApplicationDefault {
                credentials_path, ..
            } => builder.with_application_credentials(credentials_path.to_string_lossy()),
            // Falls back to the metadata server identity.
            AuthContext::HostedFunction { .. } => builder,
        }
    }

    fn client(&self, bucket: &BucketRef) -> StoreResult<Arc<GoogleCloudStorage>> {
        let mut clients = self.clients.lock().expect("lock poisoned");
        if let Some(client) = clients.get(bucket) {
            return Ok(Arc::clone(client));
        }
        let client = self
            .builder()
            .with_bucket_name(bucket.as_str())
            .build()
            .map_err(|e| StoreError::Transport(Box::new(e)))?;
        let client = Arc::new(client);
        clients.insert(bucket.clone(), Arc::clone(&client));
        debug!(bucket = %bucket, auth = %self.auth, "built GCS client");
        Ok(client)
    }
}

fn map_error(err: object_store::Error, bucket: &BucketRef, key: &ObjectKey) -> StoreError {
    match err {
        object_store::Error::NotFound { .. } => StoreError::NotFound {
            bucket: bucket.clone(),
            key: key.clone(),
        },
        other => StoreError::Transport(Box::new(other)),
    }
}

impl BlobStore for GcsBlobStore {
    fn get_blob(&self, bucket: &BucketRef, key: &ObjectKey) -> StoreResult<Vec<u8>> {
        let client = self.client(bucket)?;
        let path = ObjectPath::from(key.as_str());
        let bytes = self
            .runtime
            .block_on(async {
                let bytes = client.get(&path).await?.bytes().await?;
                Ok::<Bytes, object_store::Error>(bytes)
            })
            .map_err(|e| map_error(e, bucket, key))?;
        Ok(bytes.to_vec())
    }

    fn put_blob(&self, bucket: &BucketRef, key: &ObjectKey, data: &[u8]) -> StoreResult<()> {
        let client = self.client(bucket)?;
        let path = ObjectPath::from(key.as_str());
        let payload = Bytes::copy_from_slice(data);
        self.runtime
            .block_on(client.put(&path, payload.into()))
            .map_err(|e| map_error(e, bucket, key))?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "gcs"
    }
}

impl std::fmt::Debug for GcsBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GcsBlobStore")
            .field("auth", &self.auth.method())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_store_not_found() {
        let bucket = BucketRef::new("b").unwrap();
        let key = ObjectKey::new("k").unwrap();
        let err = object_store::Error::NotFound {
            path: "k".to_string(),
            source: "no such object".into(),
        };
        assert!(matches!(map_error(err, &bucket, &key), StoreError::NotFound { .. }));
    }

    #[test]
    fn other_errors_are_transport() {
        let bucket = BucketRef::new("b").unwrap();
        let key = ObjectKey::new("k").unwrap();
        let err = object_store::Error::Generic {
            store: "GCS",
            source: "connection reset".into(),
        };
        assert!(matches!(map_error(err, &bucket, &key), StoreError::Transport(_)));
    }

    #[test]
    fn debug_hides_credentials() {
        let store = GcsBlobStore::new(AuthContext::HostedFunction {
            project_id: "p".into(),
        })
        .unwrap();
        assert_eq!(store.backend_name(), "gcs");
        assert!(format!("{store:?}").contains("hosted-function"));
    }
}
