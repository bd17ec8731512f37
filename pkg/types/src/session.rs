use serde::{Deserialize, Serialize};

/// Reference to the AgenticSession a replicated credential belongs to.
/// Carries just enough identity to build an owner reference on the copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRef {
    pub name: String,
    pub namespace: String,
    pub uid: String,
}
