use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use csm_auth::Credentials;
use csm_codec::TextEncoding;
use csm_store::BackendConfig;
use csm_types::BucketRef;

use crate::error::{ManagerError, ManagerResult};

/// Configuration for a [`CloudStorage`](crate::CloudStorage) facade.
///
/// Every field is optional in TOML:
///
/// ```toml
/// project_id = "analytics-prod"
/// default_bucket = "exports"
/// hosted_function = false
/// staging_dir = "/var/tmp/csm"
/// upload_encoding = "utf-8"
/// credentials = { file_path = "/etc/keys/sa.json" }
/// backend = { kind = "gcs" }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ManagerConfig {
    /// Project to authenticate against; overrides the environment's.
    pub project_id: Option<String>,
    /// Bucket used when a call does not name one.
    pub default_bucket: Option<BucketRef>,
    /// Explicit credentials; when absent the environment decides.
    pub credentials: Option<Credentials>,
    /// Running as a hosted function: use the platform identity.
    pub hosted_function: bool,
    /// Where staged uploads are written. Defaults to the system temp dir.
    pub staging_dir: Option<PathBuf>,
    /// Character encoding for text written by uploads.
    pub upload_encoding: TextEncoding,
    /// Which blob store to talk to.
    pub backend: BackendConfig,
}

impl ManagerConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(raw: &str) -> ManagerResult<Self> {
        toml::from_str(raw).map_err(|e| ManagerError::Config(e.to_string()))
    }

    /// Load a TOML file.
    pub fn load(path: &Path) -> ManagerResult<Self> {
        let raw = fs::read_to_string(path).map_err(|e| ManagerError::local_io(path, e))?;
        toml::from_str(&raw).map_err(|e| ManagerError::Config(format!("{}: {e}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        let cfg = ManagerConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, ManagerConfig::default());
        assert_eq!(cfg.upload_encoding, TextEncoding::Utf8);
        assert_eq!(cfg.backend, BackendConfig::Gcs);
        assert!(!cfg.hosted_function);
    }

    #[test]
    fn full_document() {
        let cfg = ManagerConfig::from_toml_str(
            r#"
            project_id = "analytics-prod"
            default_bucket = "exports"
            hosted_function = true
            staging_dir = "/var/tmp/csm"
            upload_encoding = "latin-1"
            credentials = { file_path = "/etc/keys/sa.json" }
            backend = { kind = "local", root = "/srv/blobs" }
            "#,
        )
        .unwrap();
        assert_eq!(cfg.project_id.as_deref(), Some("analytics-prod"));
        assert_eq!(cfg.default_bucket, Some(BucketRef::new("exports").unwrap()));
        assert!(cfg.hosted_function);
        assert_eq!(cfg.staging_dir, Some(PathBuf::from("/var/tmp/csm")));
        assert_eq!(cfg.upload_encoding, TextEncoding::Latin1);
        assert_eq!(cfg.credentials, Some(Credentials::FilePath("/etc/keys/sa.json".into())));
        assert_eq!(cfg.backend, BackendConfig::Local { root: "/srv/blobs".into() });
    }

    #[test]
    fn inline_credentials_table() {
        let cfg = ManagerConfig::from_toml_str(
            r#"
            [credentials.inline]
            client_email = "svc@p.iam"
            private_key = "k"
            "#,
        )
        .unwrap();
        match cfg.credentials {
            Some(Credentials::Inline(map)) => assert_eq!(map.len(), 2),
            other => panic!("unexpected credentials: {other:?}"),
        }
    }

    #[test]
    fn empty_default_bucket_is_rejected() {
        let err = ManagerConfig::from_toml_str(r#"default_bucket = """#).unwrap_err();
        assert!(matches!(err, ManagerError::Config(_)));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(ManagerConfig::from_toml_str("bucket = \"x\"").is_err());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("csm.toml");
        fs::write(&path, "default_bucket = \"b\"\n").unwrap();
        let cfg = ManagerConfig::load(&path).unwrap();
        assert_eq!(cfg.default_bucket.unwrap().as_str(), "b");

        let err = ManagerConfig::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ManagerError::LocalIo { .. }));
    }

    #[test]
    fn load_error_names_the_file_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "default_bucket = [\n").unwrap();

        let message = ManagerConfig::load(&path).unwrap_err().to_string();
        assert!(message.starts_with("invalid configuration: "), "{message}");
        assert!(message.contains(&path.display().to_string()), "{message}");
        assert_eq!(message.matches("invalid configuration").count(), 1, "{message}");
    }
}
