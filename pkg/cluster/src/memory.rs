use async_trait::async_trait;
use chrono::Utc;
use pkg_types::secret::Secret;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use uuid::Uuid;

use crate::client::{ClusterError, SecretClient};

/// In-memory `SecretClient` with the same optimistic-concurrency rules as
/// the API server: create fails on an existing object, update fails on a
/// stale resource version. Write counters and conflict injection make the
/// retry behavior of callers observable in tests.
#[derive(Default)]
pub struct MemorySecretClient {
    secrets: Mutex<HashMap<(String, String), Secret>>,
    version: AtomicU64,
    creates: AtomicU32,
    updates: AtomicU32,
    deletes: AtomicU32,
    inject_create_conflicts: AtomicU32,
    inject_update_conflicts: AtomicU32,
}

impl MemorySecretClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a secret directly into the store, bypassing create semantics.
    /// Used to stage pre-existing cluster state in tests.
    pub fn seed(&self, mut secret: Secret) {
        if secret.id.is_empty() {
            secret.id = Uuid::new_v4().to_string();
        }
        secret.resource_version = self.next_version();
        let key = (secret.namespace.clone(), secret.name.clone());
        self.secrets.lock().unwrap().insert(key, secret);
    }

    /// Fail the next `n` create calls with `Conflict`, as if another
    /// writer created the object between the caller's get and create.
    pub fn fail_next_creates(&self, n: u32) {
        self.inject_create_conflicts.store(n, Ordering::SeqCst);
    }

    /// Fail the next `n` update calls with `Conflict`, as if the object
    /// was concurrently modified.
    pub fn fail_next_updates(&self, n: u32) {
        self.inject_update_conflicts.store(n, Ordering::SeqCst);
    }

    /// Create attempts observed, including injected conflicts.
    pub fn create_count(&self) -> u32 {
        self.creates.load(Ordering::SeqCst)
    }

    /// Update attempts observed, including injected conflicts.
    pub fn update_count(&self) -> u32 {
        self.updates.load(Ordering::SeqCst)
    }

    pub fn delete_count(&self) -> u32 {
        self.deletes.load(Ordering::SeqCst)
    }

    /// Total write attempts (creates + updates + deletes).
    pub fn write_count(&self) -> u32 {
        self.create_count() + self.update_count() + self.delete_count()
    }

    fn next_version(&self) -> String {
        (self.version.fetch_add(1, Ordering::SeqCst) + 1).to_string()
    }

    fn take_injected(counter: &AtomicU32) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl SecretClient for MemorySecretClient {
    async fn get_secret(&self, namespace: &str, name: &str) -> Result<Secret, ClusterError> {
        let secrets = self.secrets.lock().unwrap();
        secrets
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| ClusterError::NotFound {
                namespace: namespace.to_string(),
                name: name.to_string(),
            })
    }

    async fn create_secret(&self, secret: &Secret) -> Result<Secret, ClusterError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        let conflict = || ClusterError::Conflict {
            namespace: secret.namespace.clone(),
            name: secret.name.clone(),
        };

        if Self::take_injected(&self.inject_create_conflicts) {
            return Err(conflict());
        }

        let key = (secret.namespace.clone(), secret.name.clone());
        let mut secrets = self.secrets.lock().unwrap();
        if secrets.contains_key(&key) {
            return Err(conflict());
        }

        let mut stored = secret.clone();
        stored.id = Uuid::new_v4().to_string();
        stored.resource_version = self.next_version();
        stored.created_at = Utc::now();
        secrets.insert(key, stored.clone());
        Ok(stored)
    }

    async fn update_secret(&self, secret: &Secret) -> Result<Secret, ClusterError> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        let conflict = || ClusterError::Conflict {
            namespace: secret.namespace.clone(),
            name: secret.name.clone(),
        };

        if Self::take_injected(&self.inject_update_conflicts) {
            return Err(conflict());
        }

        let key = (secret.namespace.clone(), secret.name.clone());
        let mut secrets = self.secrets.lock().unwrap();
        let stored = secrets.get(&key).ok_or_else(|| ClusterError::NotFound {
            namespace: secret.namespace.clone(),
            name: secret.name.clone(),
        })?;

        if stored.resource_version != secret.resource_version {
            return Err(conflict());
        }

        let mut updated = secret.clone();
        updated.id = stored.id.clone();
        updated.created_at = stored.created_at;
        updated.resource_version = self.next_version();
        secrets.insert(key, updated.clone());
        Ok(updated)
    }

    async fn delete_secret(&self, namespace: &str, name: &str) -> Result<(), ClusterError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        let key = (namespace.to_string(), name.to_string());
        let mut secrets = self.secrets.lock().unwrap();
        match secrets.remove(&key) {
            Some(_) => Ok(()),
            None => Err(ClusterError::NotFound {
                namespace: namespace.to_string(),
                name: name.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_secret(namespace: &str, name: &str) -> Secret {
        Secret {
            id: String::new(),
            name: name.to_string(),
            namespace: namespace.to_string(),
            data: HashMap::from([("key".to_string(), b"value".to_vec())]),
            annotations: HashMap::new(),
            owner_references: Vec::new(),
            resource_version: String::new(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn create_assigns_id_and_version() {
        let client = MemorySecretClient::new();
        let stored = client
            .create_secret(&make_secret("ns", "s1"))
            .await
            .unwrap();
        assert!(!stored.id.is_empty());
        assert!(!stored.resource_version.is_empty());
    }

    #[tokio::test]
    async fn create_conflicts_on_existing() {
        let client = MemorySecretClient::new();
        client
            .create_secret(&make_secret("ns", "s1"))
            .await
            .unwrap();
        let err = client
            .create_secret(&make_secret("ns", "s1"))
            .await
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn update_conflicts_on_stale_version() {
        let client = MemorySecretClient::new();
        let stored = client
            .create_secret(&make_secret("ns", "s1"))
            .await
            .unwrap();

        // First update succeeds and bumps the version.
        let updated = client.update_secret(&stored).await.unwrap();
        assert_ne!(updated.resource_version, stored.resource_version);

        // Re-submitting the old version loses.
        let err = client.update_secret(&stored).await.unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn injected_update_conflicts_drain() {
        let client = MemorySecretClient::new();
        let stored = client
            .create_secret(&make_secret("ns", "s1"))
            .await
            .unwrap();

        client.fail_next_updates(1);
        assert!(client.update_secret(&stored).await.unwrap_err().is_conflict());
        assert!(client.update_secret(&stored).await.is_ok());
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let client = MemorySecretClient::new();
        let err = client.delete_secret("ns", "absent").await.unwrap_err();
        assert!(err.is_not_found());
    }
}
