use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use csm_auth::{AmbientEnvironment, AuthContext, CredentialResolver};
use csm_codec::{json, ndjson, text, TextEncoding};
use csm_store::BlobStore;
use csm_types::{BucketRef, ObjectKey, PayloadFormat};

use crate::bucket::BucketResolver;
use crate::config::ManagerConfig;
use crate::error::{ManagerError, ManagerResult};
use crate::staging::StagingArea;

/// Returned by every successful upload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Success;

impl fmt::Display for Success {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Success")
    }
}

/// Text, JSON and NDJSON access to a bucketed blob store.
///
/// Credentials are resolved once, when the facade is built, and never change
/// afterwards. Every operation checks the key and then the bucket before it
/// touches the store.
pub struct CloudStorage {
    store: Box<dyn BlobStore>,
    auth: AuthContext,
    buckets: BucketResolver,
    staging: StagingArea,
    upload_encoding: TextEncoding,
}

impl CloudStorage {
    /// Resolve credentials against `ambient` and open the configured backend.
    pub fn open(config: &ManagerConfig, ambient: AmbientEnvironment) -> ManagerResult<Self> {
        let auth = CredentialResolver::new(ambient).resolve(
            config.credentials.as_ref(),
            config.project_id.as_deref(),
            config.hosted_function,
        )?;
        let store = config.backend.open(&auth)?;
        let staging = config
            .staging_dir
            .clone()
            .map(StagingArea::new)
            .unwrap_or_default();

        Ok(Self {
            store,
            auth,
            buckets: BucketResolver::new(config.default_bucket.clone()),
            staging,
            upload_encoding: config.upload_encoding,
        })
    }

    /// Wrap an already opened store. No default bucket, system staging
    /// directory, UTF-8 uploads.
    pub fn with_store(store: impl BlobStore + 'static, auth: AuthContext) -> Self {
        Self {
            store: Box::new(store),
            auth,
            buckets: BucketResolver::default(),
            staging: StagingArea::default(),
            upload_encoding: TextEncoding::default(),
        }
    }

    pub fn with_default_bucket(mut self, bucket: BucketRef) -> Self {
        self.buckets = BucketResolver::new(Some(bucket));
        self
    }

    pub fn with_staging(mut self, staging: StagingArea) -> Self {
        self.staging = staging;
        self
    }

    pub fn with_upload_encoding(mut self, encoding: TextEncoding) -> Self {
        self.upload_encoding = encoding;
        self
    }

    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    pub fn store(&self) -> &dyn BlobStore {
        self.store.as_ref()
    }

    pub fn default_bucket(&self) -> Option<&BucketRef> {
        self.buckets.default_bucket()
    }

    pub fn staging(&self) -> &StagingArea {
        &self.staging
    }

    pub fn upload_encoding(&self) -> TextEncoding {
        self.upload_encoding
    }

    fn target(&self, bucket: Option<&str>, key: &str) -> ManagerResult<(BucketRef, ObjectKey)> {
        let key = ObjectKey::new(key)?;
        let bucket = self.buckets.resolve(bucket)?;
        Ok((bucket, key))
    }

    fn fetch(&self, bucket: Option<&str>, key: &str) -> ManagerResult<Vec<u8>> {
        let (bucket, key) = self.target(bucket, key)?;
        let bytes = self.store.get_blob(&bucket, &key)?;
        debug!(bucket = %bucket, key = %key, bytes = bytes.len(), "fetched object");
        Ok(bytes)
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Write the object's bytes verbatim to `destination`.
    ///
    /// The bytes are fetched in full first and then renamed into place, so a
    /// missing object or a failed write never leaves a partial file behind.
    pub fn download(
        &self,
        bucket: Option<&str>,
        key: &str,
        destination: &Path,
    ) -> ManagerResult<PathBuf> {
        let bytes = self.fetch(bucket, key)?;

        let dir = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut file = NamedTempFile::new_in(dir).map_err(|e| ManagerError::local_io(dir, e))?;
        file.write_all(&bytes)
            .map_err(|e| ManagerError::local_io(destination, e))?;
        file.as_file()
            .sync_all()
            .map_err(|e| ManagerError::local_io(destination, e))?;
        file.persist(destination)
            .map_err(|e| ManagerError::local_io(destination, e.error))?;

        info!(key = %key, destination = %destination.display(), bytes = bytes.len(), "downloaded object");
        Ok(destination.to_path_buf())
    }

    pub fn read_text(
        &self,
        bucket: Option<&str>,
        key: &str,
        encoding: TextEncoding,
    ) -> ManagerResult<String> {
        let bytes = self.fetch(bucket, key)?;
        Ok(text::decode(&bytes, encoding)?)
    }

    /// Read the object as a single JSON document.
    pub fn read_json<T: DeserializeOwned>(
        &self,
        bucket: Option<&str>,
        key: &str,
        encoding: TextEncoding,
    ) -> ManagerResult<T> {
        let bytes = self.fetch(bucket, key)?;
        Ok(json::decode(&bytes, encoding)?)
    }

    /// Read the object as newline-delimited JSON, one record per non-blank
    /// line, in line order.
    pub fn read_ndjson<T: DeserializeOwned>(
        &self,
        bucket: Option<&str>,
        key: &str,
        encoding: TextEncoding,
    ) -> ManagerResult<Vec<T>> {
        let bytes = self.fetch(bucket, key)?;
        Ok(ndjson::decode(&bytes, encoding)?)
    }

    // ========================================================================
    // Uploads
    // ========================================================================

    /// Upload a local file to the object `file_name`.
    ///
    /// With `from_staging`, the file is expected at the staging area's
    /// `<root>/<base name>` and is deleted afterwards whatever the outcome.
    /// Otherwise `file_name` is read as a local path and left in place.
    pub fn upload_file(
        &self,
        bucket: Option<&str>,
        file_name: &str,
        from_staging: bool,
    ) -> ManagerResult<Success> {
        let (bucket, key) = self.target(bucket, file_name)?;
        if from_staging {
            self.staging
                .adopt(&key)?
                .scoped_upload(|path| Ok(self.store.put_file(&bucket, &key, path)?))?;
        } else {
            self.store.put_file(&bucket, &key, Path::new(file_name))?;
        }
        info!(bucket = %bucket, key = %key, from_staging, "uploaded file");
        Ok(Success)
    }

    /// Stage `data` as text and upload it.
    pub fn upload_text(
        &self,
        data: &str,
        file_name: &str,
        bucket: Option<&str>,
    ) -> ManagerResult<Success> {
        let (bucket, key) = self.target(bucket, file_name)?;
        let bytes = text::encode(data, self.upload_encoding)?;
        self.upload_staged(&bucket, &key, &bytes, PayloadFormat::Text)
    }

    /// Serialize `data` as one JSON document, stage it and upload it.
    pub fn upload_json<T: Serialize + ?Sized>(
        &self,
        data: &T,
        file_name: &str,
        bucket: Option<&str>,
    ) -> ManagerResult<Success> {
        let (bucket, key) = self.target(bucket, file_name)?;
        let bytes = json::encode(data, self.upload_encoding)?;
        self.upload_staged(&bucket, &key, &bytes, PayloadFormat::Json)
    }

    /// Serialize `rows` as NDJSON and upload the bytes directly.
    ///
    /// An empty slice uploads an empty object.
    pub fn upload_ndjson<T: Serialize>(
        &self,
        rows: &[T],
        file_name: &str,
        bucket: Option<&str>,
    ) -> ManagerResult<Success> {
        let (bucket, key) = self.target(bucket, file_name)?;
        let bytes = ndjson::encode(rows, self.upload_encoding)?;
        self.upload_direct(&bucket, &key, &bytes, PayloadFormat::Ndjson)
    }

    /// Like [`Self::upload_ndjson`], but routed through a staged file.
    pub fn upload_ndjson_file<T: Serialize>(
        &self,
        rows: &[T],
        file_name: &str,
        bucket: Option<&str>,
    ) -> ManagerResult<Success> {
        let (bucket, key) = self.target(bucket, file_name)?;
        let bytes = ndjson::encode(rows, self.upload_encoding)?;
        self.upload_staged(&bucket, &key, &bytes, PayloadFormat::Ndjson)
    }

    /// Upload text straight from memory, without staging.
    pub fn upload_from_string(
        &self,
        data: &str,
        file_name: &str,
        bucket: Option<&str>,
    ) -> ManagerResult<Success> {
        let (bucket, key) = self.target(bucket, file_name)?;
        let bytes = text::encode(data, self.upload_encoding)?;
        self.upload_direct(&bucket, &key, &bytes, PayloadFormat::Text)
    }

    fn upload_staged(
        &self,
        bucket: &BucketRef,
        key: &ObjectKey,
        bytes: &[u8],
        format: PayloadFormat,
    ) -> ManagerResult<Success> {
        self.staging
            .stage(key, bytes)?
            .scoped_upload(|path| Ok(self.store.put_file(bucket, key, path)?))?;
        info!(
            bucket = %bucket,
            key = %key,
            content_type = format.content_type(),
            bytes = bytes.len(),
            "uploaded staged object"
        );
        Ok(Success)
    }

    fn upload_direct(
        &self,
        bucket: &BucketRef,
        key: &ObjectKey,
        bytes: &[u8],
        format: PayloadFormat,
    ) -> ManagerResult<Success> {
        self.store.put_blob(bucket, key, bytes)?;
        info!(
            bucket = %bucket,
            key = %key,
            content_type = format.content_type(),
            bytes = bytes.len(),
            "uploaded object"
        );
        Ok(Success)
    }
}

impl fmt::Debug for CloudStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudStorage")
            .field("backend", &self.store.backend_name())
            .field("auth", &self.auth.method())
            .field("default_bucket", &self.buckets.default_bucket())
            .field("staging", &self.staging.root())
            .field("upload_encoding", &self.upload_encoding)
            .finish()
    }
}
