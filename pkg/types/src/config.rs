use pkg_constants::config as cfg;
use pkg_constants::credentials::{DEFAULT_CONFLICT_BACKOFF_MS, DEFAULT_CONFLICT_RETRIES};
use serde::{Deserialize, Serialize};

/// Operator configuration file (YAML).
///
/// Example `config.yaml`:
/// ```yaml
/// project-id: my-gcp-project
/// region: us-east5
/// credentials-path: /etc/vertex/key.json
/// namespace: agentic-system
/// conflict-retries: 4
/// conflict-backoff-ms: 200
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OperatorConfigFile {
    #[serde(default, alias = "project-id")]
    pub project_id: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default, alias = "credentials-path")]
    pub credentials_path: Option<String>,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default, alias = "conflict-retries")]
    pub conflict_retries: Option<u32>,
    #[serde(default, alias = "conflict-backoff-ms")]
    pub conflict_backoff_ms: Option<u64>,
}

/// Load a YAML config file, returning the default if the file doesn't exist.
pub fn load_config_file<T: serde::de::DeserializeOwned + Default>(path: &str) -> anyhow::Result<T> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(T::default());
        }
        Err(e) => return Err(e.into()),
    };
    let config: T = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Resolved operator configuration.
///
/// Precedence: config file > environment > defaults. CLI flags are applied
/// on top by the binary. The preflight gate decides which empty fields are
/// fatal; resolution itself never fails.
#[derive(Debug, Clone)]
pub struct OperatorConfig {
    pub project_id: String,
    pub region: String,
    pub credentials_path: String,
    /// Home namespace holding the source credential secret.
    pub namespace: String,
    pub conflict_retries: u32,
    pub conflict_backoff_ms: u64,
}

impl OperatorConfig {
    pub fn resolve(file: OperatorConfigFile) -> Self {
        let env = |name: &str| std::env::var(name).unwrap_or_default();

        let namespace = file
            .namespace
            .unwrap_or_else(|| env(cfg::ENV_OPERATOR_NAMESPACE));
        let namespace = if namespace.is_empty() {
            cfg::DEFAULT_OPERATOR_NAMESPACE.to_string()
        } else {
            namespace
        };

        Self {
            project_id: file
                .project_id
                .unwrap_or_else(|| env(cfg::ENV_VERTEX_PROJECT_ID)),
            region: file.region.unwrap_or_else(|| env(cfg::ENV_CLOUD_ML_REGION)),
            credentials_path: file
                .credentials_path
                .unwrap_or_else(|| env(cfg::ENV_GOOGLE_APPLICATION_CREDENTIALS)),
            namespace,
            conflict_retries: file.conflict_retries.unwrap_or(DEFAULT_CONFLICT_RETRIES),
            conflict_backoff_ms: file
                .conflict_backoff_ms
                .unwrap_or(DEFAULT_CONFLICT_BACKOFF_MS),
        }
    }
}
