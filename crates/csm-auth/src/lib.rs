//! Credential resolution for the cloud storage manager.
//!
//! A [`CredentialResolver`] turns explicit configuration plus a snapshot of
//! the process environment into exactly one [`AuthContext`]. Resolution
//! happens once, when a storage facade is built; the context is immutable
//! afterwards and safe to share across threads.
//!
//! # Resolution Order
//!
//! 1. Explicit [`Credentials`]: a service-account key file, or an inline key map.
//! 2. Application-default credentials advertised by the environment, when a
//!    project id is known.
//! 3. The hosting platform's ambient identity, when running as a hosted
//!    function and a project id is known.
//! 4. Otherwise resolution fails with [`AuthError::Unresolved`].
//!
//! The resolver never reads environment variables itself. The bootstrap
//! captures an [`AmbientEnvironment`] once and hands it over.

pub mod context;
pub mod credentials;
pub mod environment;
pub mod error;
pub mod resolver;

pub use context::{AuthContext, KeySource};
pub use credentials::{Credentials, ServiceAccountKey};
pub use environment::AmbientEnvironment;
pub use error::{AuthError, AuthResult};
pub use resolver::CredentialResolver;
