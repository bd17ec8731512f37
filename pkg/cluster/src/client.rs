use async_trait::async_trait;
use pkg_types::secret::Secret;
use thiserror::Error;

/// Errors surfaced by a cluster resource client.
#[derive(Debug, Error)]
pub enum ClusterError {
    /// The named secret does not exist.
    #[error("secret '{namespace}/{name}' not found")]
    NotFound { namespace: String, name: String },

    /// The write lost a race: stale resource version on update, or the
    /// object already exists on create.
    #[error("write conflict on secret '{namespace}/{name}'")]
    Conflict { namespace: String, name: String },

    /// The round trip was aborted by the caller's deadline or shutdown.
    #[error("request cancelled")]
    Cancelled,

    /// The API server rejected the request.
    #[error("api error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The request never reached the API server.
    #[error("transport error: {0}")]
    Transport(String),
}

impl ClusterError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClusterError::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, ClusterError::Conflict { .. })
    }
}

/// Namespaced secret client against the cluster store.
///
/// Implementations: HTTP against the API server, in-memory for tests.
/// Update semantics are compare-and-swap on `resource_version`: callers
/// must re-fetch and retry on `Conflict`.
#[async_trait]
pub trait SecretClient: Send + Sync {
    async fn get_secret(&self, namespace: &str, name: &str) -> Result<Secret, ClusterError>;

    /// Create a secret. Fails with `Conflict` if one already exists under
    /// the same namespace/name. Returns the stored object carrying the
    /// server-assigned id and resource version.
    async fn create_secret(&self, secret: &Secret) -> Result<Secret, ClusterError>;

    /// Update a secret. Fails with `Conflict` if `secret.resource_version`
    /// no longer matches the stored object.
    async fn update_secret(&self, secret: &Secret) -> Result<Secret, ClusterError>;

    async fn delete_secret(&self, namespace: &str, name: &str) -> Result<(), ClusterError>;
}
