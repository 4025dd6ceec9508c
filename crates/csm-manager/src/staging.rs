use std::env;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::{TempDir, TempPath};
use tracing::{debug, warn};

use csm_types::ObjectKey;

use crate::error::{ManagerError, ManagerResult};

/// Local directory holding files on their way to the store.
///
/// Each staged file keeps the object key's exact base name and lives in its
/// own freshly created subdirectory, so concurrent uploads of the same key
/// never share a path.
#[derive(Clone, Debug)]
pub struct StagingArea {
    root: PathBuf,
}

impl StagingArea {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Stage under the system temporary directory.
    pub fn system() -> Self {
        Self::new(env::temp_dir())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The well-known path `<root>/<base name>` where callers may place a
    /// file themselves before asking for a staged upload.
    pub fn path_for(&self, key: &ObjectKey) -> ManagerResult<PathBuf> {
        Ok(self.root.join(key.file_name()?))
    }

    /// Write `bytes` to a fresh staged file for `key`.
    pub fn stage(&self, key: &ObjectKey, bytes: &[u8]) -> ManagerResult<StagedResource> {
        let name = key.file_name()?;
        fs::create_dir_all(&self.root).map_err(|e| ManagerError::local_io(&self.root, e))?;

        let dir = tempfile::Builder::new()
            .prefix(".csm-")
            .tempdir_in(&self.root)
            .map_err(|e| ManagerError::local_io(&self.root, e))?;
        let path = dir.path().join(name);
        let mut file = File::create(&path).map_err(|e| ManagerError::local_io(&path, e))?;
        file.write_all(bytes)
            .map_err(|e| ManagerError::local_io(&path, e))?;

        debug!(key = %key, path = %path.display(), bytes = bytes.len(), "staged upload");
        Ok(StagedResource {
            path,
            holder: Holder::Dir(dir),
        })
    }

    /// Take ownership of the caller-placed file at [`Self::path_for`], so it
    /// is removed after the upload like any other staged file.
    pub fn adopt(&self, key: &ObjectKey) -> ManagerResult<StagedResource> {
        let path = self.path_for(key)?;
        Ok(StagedResource {
            holder: Holder::File(TempPath::from_path(path.clone())),
            path,
        })
    }
}

impl Default for StagingArea {
    fn default() -> Self {
        Self::system()
    }
}

/// What gets removed on release.
#[derive(Debug)]
enum Holder {
    /// A per-call directory containing the staged file.
    Dir(TempDir),
    /// A caller-placed file.
    File(TempPath),
}

impl Holder {
    fn close(self) -> io::Result<()> {
        match self {
            Self::Dir(dir) => dir.close(),
            Self::File(path) => path.close(),
        }
    }
}

/// A staged file, deleted when released or dropped.
#[derive(Debug)]
pub struct StagedResource {
    path: PathBuf,
    holder: Holder,
}

impl StagedResource {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `uploader` against the staged file, then delete the file on every
    /// exit path.
    ///
    /// An upload failure is returned as-is even if the deletion also failed.
    /// A deletion failure after a successful upload is reported as
    /// [`ManagerError::LocalIo`]. If `uploader` panics the file is removed
    /// during unwinding.
    pub fn scoped_upload<T>(
        self,
        uploader: impl FnOnce(&Path) -> ManagerResult<T>,
    ) -> ManagerResult<T> {
        let outcome = uploader(&self.path);
        match (outcome, self.holder.close()) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(e)) => {
                warn!(path = %self.path.display(), error = %e, "failed to remove staged file");
                Err(ManagerError::local_io(self.path, e))
            }
            (Err(upload), Ok(())) => Err(upload),
            (Err(upload), Err(e)) => {
                if e.kind() != io::ErrorKind::NotFound {
                    warn!(path = %self.path.display(), error = %e, "failed to remove staged file");
                }
                Err(upload)
            }
        }
    }
}
