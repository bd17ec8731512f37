use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A namespaced opaque key/value secret resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Secret {
    /// Server-assigned unique id.
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub namespace: String,
    /// Secret data stored as raw bytes per key.
    #[serde(default)]
    pub data: HashMap<String, Vec<u8>>,
    #[serde(default)]
    pub annotations: HashMap<String, String>,
    #[serde(default)]
    pub owner_references: Vec<OwnerReference>,
    /// Server-assigned version token. An update carrying a stale value
    /// fails with a conflict instead of clobbering a concurrent write.
    #[serde(default)]
    pub resource_version: String,
    pub created_at: DateTime<Utc>,
}

impl Secret {
    /// Whether any owner reference already records this uid.
    pub fn has_owner_uid(&self, uid: &str) -> bool {
        self.owner_references.iter().any(|r| r.uid == uid)
    }
}

/// Back-reference from a secret to the higher-level resource that caused
/// its creation. A secret may carry several, one per owning resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerReference {
    pub api_version: String,
    pub kind: String,
    pub name: String,
    pub uid: String,
    /// Marks the controlling owner.
    #[serde(default)]
    pub controller: bool,
}
