//! Operator configuration keys.

/// Google Cloud project the Vertex AI credential is expected to serve.
pub const ENV_VERTEX_PROJECT_ID: &str = "ANTHROPIC_VERTEX_PROJECT_ID";

/// Vertex AI region.
pub const ENV_CLOUD_ML_REGION: &str = "CLOUD_ML_REGION";

/// Path the service-account key file is mounted at inside session pods.
pub const ENV_GOOGLE_APPLICATION_CREDENTIALS: &str = "GOOGLE_APPLICATION_CREDENTIALS";

/// Namespace the operator itself runs in, home of the source secret.
pub const ENV_OPERATOR_NAMESPACE: &str = "OPERATOR_NAMESPACE";

/// Default home namespace when none is configured.
pub const DEFAULT_OPERATOR_NAMESPACE: &str = "agentic-system";
