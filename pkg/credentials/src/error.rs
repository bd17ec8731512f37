use pkg_cluster::ClusterError;
use thiserror::Error;

/// Structural defects of the credential secret payload.
///
/// None of these are retryable: the credential was created wrong and an
/// operator has to fix it.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("secret is missing")]
    MissingSecret,

    #[error("secret data missing credential payload key '{0}'")]
    MissingPayloadKey(&'static str),

    #[error("credential payload is not valid JSON: {0}")]
    MalformedPayload(#[source] serde_json::Error),

    #[error("credential payload missing required field '{0}'")]
    MissingField(&'static str),

    #[error("credential type is '{found}', expected '{expected}'")]
    WrongCredentialType {
        found: String,
        expected: &'static str,
    },
}

/// Failures of credential preflight, replication, and replica deletion.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("required configuration {0} is not set")]
    MissingConfig(&'static str),

    #[error(
        "secret '{name}' not found in namespace '{namespace}'. Create it with: \
         kubectl create secret generic {name} --from-file=key.json=/path/to/service-account.json -n {namespace}"
    )]
    SourceSecretNotFound {
        namespace: String,
        name: String,
        #[source]
        source: ClusterError,
    },

    #[error("secret '{namespace}/{name}' is invalid: {source}")]
    InvalidSourceSecret {
        namespace: String,
        name: String,
        #[source]
        source: ValidationError,
    },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("update of secret '{namespace}/{name}' conflicted {attempts} times, giving up")]
    ConflictRetryExhausted {
        namespace: String,
        name: String,
        attempts: u32,
    },

    #[error("operation cancelled")]
    Cancelled,

    #[error(transparent)]
    Cluster(ClusterError),
}

impl CredentialError {
    /// Map a client failure, keeping cancellation distinct so retry loops
    /// never treat an aborted round trip as a retryable conflict.
    pub(crate) fn from_cluster(e: ClusterError) -> Self {
        match e {
            ClusterError::Cancelled => CredentialError::Cancelled,
            other => CredentialError::Cluster(other),
        }
    }
}
