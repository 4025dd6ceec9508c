use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use csm_types::{BucketRef, ObjectKey};

use crate::error::{StoreError, StoreResult};
use crate::traits::BlobStore;

/// Blob store backed by a local directory.
///
/// Layout: `<root>/<bucket>/<key>`, with `/` in keys mapped to
/// subdirectories. Writes go to a temporary file in the target directory and
/// are renamed into place, so readers never observe a half-written object.
#[derive(Clone, Debug)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a bucket/key pair to a path under the root.
    ///
    /// Rejects names that would escape the root or alias a directory.
    pub fn object_path(&self, bucket: &BucketRef, key: &ObjectKey) -> StoreResult<PathBuf> {
        let invalid = |reason: &str| StoreError::InvalidKey {
            key: key.clone(),
            reason: reason.to_string(),
        };
        if !is_plain_segment(bucket.as_str()) {
            return Err(invalid("bucket name is not a plain directory name"));
        }
        let mut path = self.root.join(bucket.as_str());
        for segment in key.as_str().split('/') {
            if !is_plain_segment(segment) {
                return Err(invalid("key segment is empty or a relative path component"));
            }
            path.push(segment);
        }
        Ok(path)
    }
}

fn is_plain_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment.contains(['\\', '\0', '/'])
}

impl BlobStore for FsBlobStore {
    fn get_blob(&self, bucket: &BucketRef, key: &ObjectKey) -> StoreResult<Vec<u8>> {
        let path = self.object_path(bucket, key)?;
        match fs::read(&path) {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(StoreError::NotFound {
                bucket: bucket.clone(),
                key: key.clone(),
            }),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn put_blob(&self, bucket: &BucketRef, key: &ObjectKey, data: &[u8]) -> StoreResult<()> {
        let path = self.object_path(bucket, key)?;
        let parent = path.parent().unwrap_or(&self.root);
        fs::create_dir_all(parent)?;

        let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
        tmp.write_all(data)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| StoreError::Io(e.error))?;
        debug!(path = %path.display(), bytes = data.len(), "wrote object");
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket(name: &str) -> BucketRef {
        BucketRef::new(name).unwrap()
    }

    fn key(name: &str) -> ObjectKey {
        ObjectKey::new(name).unwrap()
    }

    fn temp_store() -> (tempfile::TempDir, FsBlobStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::open(dir.path().join("blobs")).unwrap();
        (dir, store)
    }

    #[test]
    fn put_and_get_nested_key() {
        let (_dir, store) = temp_store();
        store.put_blob(&bucket("b"), &key("data/items.json"), b"[]").unwrap();
        assert_eq!(store.get_blob(&bucket("b"), &key("data/items.json")).unwrap(), b"[]");
        assert!(store.root().join("b/data/items.json").is_file());
    }

    #[test]
    fn overwrite_replaces_content() {
        let (_dir, store) = temp_store();
        store.put_blob(&bucket("b"), &key("k"), b"a long first version").unwrap();
        store.put_blob(&bucket("b"), &key("k"), b"short").unwrap();
        assert_eq!(store.get_blob(&bucket("b"), &key("k")).unwrap(), b"short");
    }

    #[test]
    fn missing_object_is_not_found() {
        let (_dir, store) = temp_store();
        let err = store.get_blob(&bucket("b"), &key("nope.txt")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn escaping_keys_are_rejected() {
        let (_dir, store) = temp_store();
        for raw in ["../etc/passwd", "a//b", "a/./b", "dir/"] {
            let err = store.put_blob(&bucket("b"), &key(raw), b"x").unwrap_err();
            assert!(matches!(err, StoreError::InvalidKey { .. }), "{raw}");
        }
        assert!(store.object_path(&bucket(".."), &key("k")).is_err());
    }

    #[test]
    fn put_file_copies_source() {
        let (dir, store) = temp_store();
        let src = dir.path().join("local.txt");
        fs::write(&src, b"contents").unwrap();
        store.put_file(&bucket("b"), &key("remote.txt"), &src).unwrap();
        assert_eq!(store.get_blob(&bucket("b"), &key("remote.txt")).unwrap(), b"contents");
        assert!(src.exists());
    }

    #[test]
    fn no_temporary_files_left_behind() {
        let (_dir, store) = temp_store();
        store.put_blob(&bucket("b"), &key("one"), b"1").unwrap();
        let entries: Vec<_> = fs::read_dir(store.root().join("b")).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }
}
