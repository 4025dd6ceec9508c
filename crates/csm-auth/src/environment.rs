use std::env;
use std::path::PathBuf;

/// Environment variable carrying the project id.
pub const PROJECT_ID_VAR: &str = "GOOGLE_CLOUD_PROJECT_ID";

/// Environment variable pointing at application-default credentials.
pub const APPLICATION_CREDENTIALS_VAR: &str = "GOOGLE_APPLICATION_CREDENTIALS";

/// Snapshot of the environment state that credential resolution depends on.
///
/// Captured once by the process bootstrap and passed in explicitly, so the
/// resolver stays testable without touching real environment variables.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AmbientEnvironment {
    /// Project id advertised by the environment.
    pub project_id: Option<String>,
    /// Path to an application-default credentials file, if advertised.
    pub application_credentials: Option<PathBuf>,
}

impl AmbientEnvironment {
    /// Read the relevant variables from the process environment. Empty
    /// values count as unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a snapshot from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.is_empty());
        Self {
            project_id: non_empty(PROJECT_ID_VAR),
            application_credentials: non_empty(APPLICATION_CREDENTIALS_VAR).map(PathBuf::from),
        }
    }
}
