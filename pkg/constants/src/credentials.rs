//! Vertex credential secret constants.

/// Name of the credential secret, both in the operator's home namespace
/// (the source) and in every tenant namespace it is replicated into.
pub const CREDENTIAL_SECRET_NAME: &str = "agentic-vertex";

/// Data-map key holding the service-account JSON payload.
/// Matches `kubectl create secret generic ... --from-file=key.json=...`.
pub const CREDENTIAL_PAYLOAD_KEY: &str = "key.json";

/// Annotation recording which source secret a replica was copied from,
/// as `<namespace>/<name>`. Only replicas written by this operator carry
/// it; deletion is gated on its presence.
pub const COPIED_FROM_ANNOTATION: &str = "sessions.agentic.dev/copied-from";

/// Required value of the `type` field in a service-account key payload.
pub const SERVICE_ACCOUNT_TYPE: &str = "service_account";

/// How many times a conflicted write against a replica is retried
/// before giving up.
pub const DEFAULT_CONFLICT_RETRIES: u32 = 4;

/// Pause between conflicted write attempts, in milliseconds.
pub const DEFAULT_CONFLICT_BACKOFF_MS: u64 = 200;
