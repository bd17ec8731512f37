use chrono::Utc;
use pkg_cluster::SecretClient;
use pkg_constants::credentials::{
    COPIED_FROM_ANNOTATION, CREDENTIAL_SECRET_NAME, DEFAULT_CONFLICT_BACKOFF_MS,
    DEFAULT_CONFLICT_RETRIES,
};
use pkg_constants::session::{SESSION_API_VERSION, SESSION_KIND};
use pkg_types::secret::{OwnerReference, Secret};
use pkg_types::session::SessionRef;
use pkg_types::validate::validate_resource_name;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::CredentialError;

/// Bound and pacing for optimistic-concurrency retries.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total write attempts before giving up (first try included).
    pub max_attempts: u32,
    /// Pause between attempts.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_CONFLICT_RETRIES,
            backoff: Duration::from_millis(DEFAULT_CONFLICT_BACKOFF_MS),
        }
    }
}

/// Copies the credential secret from the operator's home namespace into
/// tenant namespaces, and removes the copies it made.
///
/// Concurrent calls against the same target namespace converge: the
/// resulting secret carries the union of all callers' owner references,
/// with races resolved through the store's resource-version checks rather
/// than in-process locking.
pub struct SecretReplicator {
    client: Arc<dyn SecretClient>,
    home_namespace: String,
    retry: RetryPolicy,
}

impl SecretReplicator {
    pub fn new(client: Arc<dyn SecretClient>, home_namespace: impl Into<String>) -> Self {
        Self {
            client,
            home_namespace: home_namespace.into(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Ensure `target_namespace` holds a copy of the credential secret
    /// recording `owner`'s session among its owner references.
    ///
    /// Idempotent: when the copy is current and already records the
    /// owner, no write is issued.
    pub async fn replicate(
        &self,
        target_namespace: &str,
        owner: &SessionRef,
    ) -> Result<(), CredentialError> {
        validate_resource_name("target namespace", target_namespace)
            .map_err(|e| CredentialError::InvalidInput(e.to_string()))?;
        let owner_ref = controller_owner_ref(owner)?;

        // A missing source cannot self-heal, so it is never retried.
        let source = match self
            .client
            .get_secret(&self.home_namespace, CREDENTIAL_SECRET_NAME)
            .await
        {
            Ok(s) => s,
            Err(e) if e.is_not_found() => {
                return Err(CredentialError::SourceSecretNotFound {
                    namespace: self.home_namespace.clone(),
                    name: CREDENTIAL_SECRET_NAME.to_string(),
                    source: e,
                });
            }
            Err(e) => return Err(CredentialError::from_cluster(e)),
        };

        let mut attempts = 0;
        while attempts < self.retry.max_attempts {
            attempts += 1;
            match self
                .client
                .get_secret(target_namespace, CREDENTIAL_SECRET_NAME)
                .await
            {
                Err(e) if e.is_not_found() => {
                    let desired = self.build_replica(target_namespace, &source, &owner_ref);
                    match self.client.create_secret(&desired).await {
                        Ok(_) => {
                            info!(
                                "Copied secret {}/{} to namespace {}",
                                self.home_namespace, CREDENTIAL_SECRET_NAME, target_namespace
                            );
                            return Ok(());
                        }
                        Err(e) if e.is_conflict() => {
                            // Another reconcile created it first; converge
                            // through the update path on the next attempt.
                            debug!(
                                "Create of {}/{} lost a race (attempt {})",
                                target_namespace, CREDENTIAL_SECRET_NAME, attempts
                            );
                        }
                        Err(e) => return Err(CredentialError::from_cluster(e)),
                    }
                }
                Ok(existing) => {
                    let mut desired = existing;
                    let mut changed = false;

                    if !desired.has_owner_uid(&owner_ref.uid) {
                        desired.owner_references.push(owner_ref.clone());
                        changed = true;
                    }
                    if desired.data != source.data {
                        desired.data = source.data.clone();
                        changed = true;
                    }
                    if !changed {
                        debug!(
                            "Secret {}/{} already current, nothing to do",
                            target_namespace, CREDENTIAL_SECRET_NAME
                        );
                        return Ok(());
                    }

                    match self.client.update_secret(&desired).await {
                        Ok(_) => {
                            info!(
                                "Updated secret {}/{} (owners={})",
                                target_namespace,
                                CREDENTIAL_SECRET_NAME,
                                desired.owner_references.len()
                            );
                            return Ok(());
                        }
                        Err(e) if e.is_conflict() => {
                            debug!(
                                "Update of {}/{} conflicted (attempt {})",
                                target_namespace, CREDENTIAL_SECRET_NAME, attempts
                            );
                        }
                        Err(e) => return Err(CredentialError::from_cluster(e)),
                    }
                }
                Err(e) => return Err(CredentialError::from_cluster(e)),
            }

            if attempts < self.retry.max_attempts && !self.retry.backoff.is_zero() {
                tokio::time::sleep(self.retry.backoff).await;
            }
        }

        Err(CredentialError::ConflictRetryExhausted {
            namespace: target_namespace.to_string(),
            name: CREDENTIAL_SECRET_NAME.to_string(),
            attempts,
        })
    }

    /// Remove the replicated secret from `namespace`, but only if this
    /// operator created it. A secret of the same name placed by hand
    /// carries no provenance annotation and is left alone.
    pub async fn delete_replica(&self, namespace: &str) -> Result<(), CredentialError> {
        let existing = match self
            .client
            .get_secret(namespace, CREDENTIAL_SECRET_NAME)
            .await
        {
            Ok(s) => s,
            Err(e) if e.is_not_found() => return Ok(()),
            Err(e) => return Err(CredentialError::from_cluster(e)),
        };

        if !existing.annotations.contains_key(COPIED_FROM_ANNOTATION) {
            info!(
                "Secret {}/{} has no provenance annotation, leaving it in place",
                namespace, CREDENTIAL_SECRET_NAME
            );
            return Ok(());
        }

        match self
            .client
            .delete_secret(namespace, CREDENTIAL_SECRET_NAME)
            .await
        {
            Ok(()) => {
                info!(
                    "Deleted replicated secret {}/{}",
                    namespace, CREDENTIAL_SECRET_NAME
                );
                Ok(())
            }
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(CredentialError::from_cluster(e)),
        }
    }

    fn build_replica(
        &self,
        target_namespace: &str,
        source: &Secret,
        owner_ref: &OwnerReference,
    ) -> Secret {
        Secret {
            id: String::new(),
            name: CREDENTIAL_SECRET_NAME.to_string(),
            namespace: target_namespace.to_string(),
            data: source.data.clone(),
            annotations: HashMap::from([(
                COPIED_FROM_ANNOTATION.to_string(),
                format!("{}/{}", self.home_namespace, CREDENTIAL_SECRET_NAME),
            )]),
            owner_references: vec![owner_ref.clone()],
            resource_version: String::new(),
            created_at: Utc::now(),
        }
    }
}

/// Build the controlling owner reference for a session, rejecting
/// incomplete identity instead of panicking on it.
fn controller_owner_ref(owner: &SessionRef) -> Result<OwnerReference, CredentialError> {
    if owner.name.is_empty() || owner.namespace.is_empty() || owner.uid.is_empty() {
        return Err(CredentialError::InvalidInput(format!(
            "session owner must carry name, namespace, and uid (got name='{}', namespace='{}', uid='{}')",
            owner.name, owner.namespace, owner.uid
        )));
    }
    Ok(OwnerReference {
        api_version: SESSION_API_VERSION.to_string(),
        kind: SESSION_KIND.to_string(),
        name: owner.name.clone(),
        uid: owner.uid.clone(),
        controller: true,
    })
}
