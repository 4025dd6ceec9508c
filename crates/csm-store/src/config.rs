use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::info;

use csm_auth::AuthContext;

use crate::error::StoreResult;
use crate::fs::FsBlobStore;
use crate::memory::InMemoryBlobStore;
use crate::traits::BlobStore;

/// Which transport a facade talks to.
///
/// In TOML: `backend = { kind = "gcs" }`,
/// `backend = { kind = "local", root = "/srv/blobs" }` or
/// `backend = { kind = "memory" }`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackendConfig {
    /// Google Cloud Storage, authenticated with the resolved credentials.
    #[default]
    Gcs,
    /// A local directory, one subdirectory per bucket.
    Local { root: PathBuf },
    /// Process memory; contents vanish on exit.
    Memory,
}

impl BackendConfig {
    /// Open the configured backend.
    pub fn open(&self, auth: &AuthContext) -> StoreResult<Box<dyn BlobStore>> {
        let store: Box<dyn BlobStore> = match self {
            Self::Gcs => open_gcs(auth)?,
            Self::Local { root } => Box::new(FsBlobStore::open(root.clone())?),
            Self::Memory => Box::new(InMemoryBlobStore::new()),
        };
        info!(backend = store.backend_name(), auth = %auth, "opened blob store");
        Ok(store)
    }
}

#[cfg(feature = "gcs")]
fn open_gcs(auth: &AuthContext) -> StoreResult<Box<dyn BlobStore>> {
    Ok(Box::new(crate::gcs::GcsBlobStore::new(auth.clone())?))
}

#[cfg(not(feature = "gcs"))]
fn open_gcs(_auth: &AuthContext) -> StoreResult<Box<dyn BlobStore>> {
    Err(crate::error::StoreError::Unsupported(
        "gcs (built without the `gcs` feature)".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hosted() -> AuthContext {
        AuthContext::HostedFunction {
            project_id: "p".into(),
        }
    }

    #[test]
    fn default_is_gcs() {
        assert_eq!(BackendConfig::default(), BackendConfig::Gcs);
    }

    #[test]
    fn deserialize_tagged() {
        let cfg: BackendConfig =
            serde_json::from_str(r#"{"kind":"local","root":"/srv/blobs"}"#).unwrap();
        assert_eq!(cfg, BackendConfig::Local { root: "/srv/blobs".into() });
        let cfg: BackendConfig = serde_json::from_str(r#"{"kind":"memory"}"#).unwrap();
        assert_eq!(cfg, BackendConfig::Memory);
    }

    #[test]
    fn open_local_and_memory() {
        let dir = tempfile::tempdir().unwrap();
        let local = BackendConfig::Local { root: dir.path().join("root") }
            .open(&hosted())
            .unwrap();
        assert_eq!(local.backend_name(), "local");
        assert!(dir.path().join("root").is_dir());

        let memory = BackendConfig::Memory.open(&hosted()).unwrap();
        assert_eq!(memory.backend_name(), "memory");
    }
}
