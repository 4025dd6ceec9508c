use std::fmt;
use std::path::PathBuf;

use crate::credentials::ServiceAccountKey;

/// Where a service-account key came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeySource {
    File(PathBuf),
    Inline,
}

/// The resolved, immutable identity used to authorize storage calls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthContext {
    /// An explicit service-account key.
    ServiceAccount {
        key: ServiceAccountKey,
        source: KeySource,
        project_id: Option<String>,
    },
    /// Application-default credentials advertised by the environment.
    ApplicationDefault {
        project_id: String,
        credentials_path: PathBuf,
    },
    /// The hosting platform's ambient identity (metadata server).
    HostedFunction { project_id: String },
}

impl AuthContext {
    pub fn project_id(&self) -> Option<&str> {
        match self {
            Self::ServiceAccount { project_id, .. } => project_id.as_deref(),
            Self::ApplicationDefault { project_id, .. } | Self::HostedFunction { project_id } => {
                Some(project_id)
            }
        }
    }

    /// Short name of the authentication path, for logs.
    pub fn method(&self) -> &'static str {
        match self {
            Self::ServiceAccount { source: KeySource::File(_), .. } => "service-account-file",
            Self::ServiceAccount { source: KeySource::Inline, .. } => "service-account-inline",
            Self::ApplicationDefault { .. } => "application-default",
            Self::HostedFunction { .. } => "hosted-function",
        }
    }
}

impl fmt::Display for AuthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.project_id() {
            Some(project) => write!(f, "{} (project {project})", self.method()),
            None => f.write_str(self.method()),
        }
    }
}
