//! Vertex credential replication for agentic sessions.
//!
//! The credential secret lives once in the operator's home namespace.
//! This crate validates its shape at startup (preflight), copies it into
//! tenant namespaces when sessions are provisioned, and removes only the
//! copies it created when sessions are torn down.

pub mod error;
pub mod preflight;
pub mod replicate;
pub mod validate;

pub use error::{CredentialError, ValidationError};
pub use preflight::validate_credential_config;
pub use replicate::{RetryPolicy, SecretReplicator};
pub use validate::validate_credential_secret;
