use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::context::{AuthContext, KeySource};
use crate::credentials::{Credentials, ServiceAccountKey};
use crate::environment::AmbientEnvironment;
use crate::error::{AuthError, AuthResult};

/// Picks exactly one authentication path; see the crate docs for the order.
#[derive(Clone, Debug, Default)]
pub struct CredentialResolver {
    ambient: AmbientEnvironment,
}

impl CredentialResolver {
    pub fn new(ambient: AmbientEnvironment) -> Self {
        Self { ambient }
    }

    pub fn ambient(&self) -> &AmbientEnvironment {
        &self.ambient
    }

    /// Resolve credentials. An explicit `project_id` takes precedence over
    /// the environment's; empty strings count as absent.
    pub fn resolve(
        &self,
        explicit: Option<&Credentials>,
        project_id: Option<&str>,
        hosted_function: bool,
    ) -> AuthResult<AuthContext> {
        let project_id = project_id
            .filter(|p| !p.is_empty())
            .or(self.ambient.project_id.as_deref())
            .map(str::to_string);

        if let Some(credentials) = explicit.filter(|c| !c.is_empty()) {
            let (key, source) = match credentials {
                Credentials::FilePath(path) => (read_key_file(path)?, KeySource::File(path.clone())),
                Credentials::Inline(fields) => {
                    (ServiceAccountKey::new(fields.clone()), KeySource::Inline)
                }
            };
            let project_id = project_id.or_else(|| key.project_id().map(str::to_string));
            let context = AuthContext::ServiceAccount {
                key,
                source,
                project_id,
            };
            info!(method = context.method(), "resolved credentials");
            return Ok(context);
        }

        let Some(project_id) = project_id else {
            debug!("no explicit credentials and no project id");
            return Err(AuthError::Unresolved);
        };

        let context = if let Some(path) = &self.ambient.application_credentials {
            AuthContext::ApplicationDefault {
                project_id,
                credentials_path: path.clone(),
            }
        } else if hosted_function {
            AuthContext::HostedFunction { project_id }
        } else {
            return Err(AuthError::Unresolved);
        };
        info!(
            method = context.method(),
            project = context.project_id().unwrap_or_default(),
            "resolved credentials"
        );
        Ok(context)
    }
}

fn read_key_file(path: &Path) -> AuthResult<ServiceAccountKey> {
    let raw = fs::read_to_string(path).map_err(|source| AuthError::ReadKeyFile {
        path: path.to_path_buf(),
        source,
    })?;
    let fields: BTreeMap<String, String> =
        serde_json::from_str(&raw).map_err(|source| AuthError::MalformedKeyFile {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(ServiceAccountKey::new(fields))
}
