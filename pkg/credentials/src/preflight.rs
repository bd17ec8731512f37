use pkg_cluster::SecretClient;
use pkg_constants::config as cfg;
use pkg_constants::credentials::CREDENTIAL_SECRET_NAME;
use pkg_types::config::OperatorConfig;
use tracing::info;

use crate::error::CredentialError;
use crate::validate::validate_credential_secret;

/// Validate the Vertex credential configuration before the operator
/// begins serving sessions.
///
/// Any error here must block startup: no session can be provisioned
/// without a usable credential.
pub async fn validate_credential_config(
    client: &dyn SecretClient,
    config: &OperatorConfig,
) -> Result<(), CredentialError> {
    info!("Validating Vertex credential configuration...");

    // Required values, checked in declared order; the first empty one wins.
    let required = [
        (cfg::ENV_VERTEX_PROJECT_ID, &config.project_id),
        (cfg::ENV_CLOUD_ML_REGION, &config.region),
        (
            cfg::ENV_GOOGLE_APPLICATION_CREDENTIALS,
            &config.credentials_path,
        ),
    ];
    for (name, value) in required {
        if value.is_empty() {
            return Err(CredentialError::MissingConfig(name));
        }
        info!("  {}: {}", name, value);
    }

    let secret = match client
        .get_secret(&config.namespace, CREDENTIAL_SECRET_NAME)
        .await
    {
        Ok(s) => s,
        Err(e) if e.is_not_found() => {
            return Err(CredentialError::SourceSecretNotFound {
                namespace: config.namespace.clone(),
                name: CREDENTIAL_SECRET_NAME.to_string(),
                source: e,
            });
        }
        Err(e) => return Err(CredentialError::from_cluster(e)),
    };
    info!(
        "  Secret '{}' found in namespace '{}'",
        CREDENTIAL_SECRET_NAME, config.namespace
    );

    validate_credential_secret(Some(&secret), &config.project_id).map_err(|e| {
        CredentialError::InvalidSourceSecret {
            namespace: config.namespace.clone(),
            name: CREDENTIAL_SECRET_NAME.to_string(),
            source: e,
        }
    })?;

    info!("Vertex credential configuration validated successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use chrono::Utc;
    use pkg_cluster::MemorySecretClient;
    use pkg_constants::credentials::CREDENTIAL_PAYLOAD_KEY;
    use pkg_types::secret::Secret;
    use std::collections::HashMap;

    fn make_config() -> OperatorConfig {
        OperatorConfig {
            project_id: "proj-1".to_string(),
            region: "us-east5".to_string(),
            credentials_path: "/etc/vertex/key.json".to_string(),
            namespace: "agentic-system".to_string(),
            conflict_retries: 4,
            conflict_backoff_ms: 0,
        }
    }

    fn make_source_secret(payload: &[u8]) -> Secret {
        Secret {
            id: String::new(),
            name: CREDENTIAL_SECRET_NAME.to_string(),
            namespace: "agentic-system".to_string(),
            data: HashMap::from([(CREDENTIAL_PAYLOAD_KEY.to_string(), payload.to_vec())]),
            annotations: HashMap::new(),
            owner_references: Vec::new(),
            resource_version: String::new(),
            created_at: Utc::now(),
        }
    }

    fn valid_payload() -> &'static [u8] {
        br#"{"type":"service_account","project_id":"proj-1","private_key":"k","client_email":"e"}"#
    }

    #[tokio::test]
    async fn passes_with_valid_config_and_secret() {
        let client = MemorySecretClient::new();
        client.seed(make_source_secret(valid_payload()));

        validate_credential_config(&client, &make_config())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn missing_project_id_reported_first() {
        let client = MemorySecretClient::new();
        let mut config = make_config();
        config.project_id = String::new();
        config.region = String::new();

        let err = validate_credential_config(&client, &config)
            .await
            .unwrap_err();
        match err {
            CredentialError::MissingConfig(name) => {
                assert_eq!(name, cfg::ENV_VERTEX_PROJECT_ID)
            }
            other => panic!("expected MissingConfig, got {other}"),
        }
    }

    #[tokio::test]
    async fn missing_region_reported() {
        let client = MemorySecretClient::new();
        let mut config = make_config();
        config.region = String::new();

        let err = validate_credential_config(&client, &config)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CredentialError::MissingConfig(cfg::ENV_CLOUD_ML_REGION)
        ));
    }

    #[tokio::test]
    async fn missing_credentials_path_reported() {
        let client = MemorySecretClient::new();
        let mut config = make_config();
        config.credentials_path = String::new();

        let err = validate_credential_config(&client, &config)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CredentialError::MissingConfig(cfg::ENV_GOOGLE_APPLICATION_CREDENTIALS)
        ));
    }

    #[tokio::test]
    async fn missing_source_secret_blocks_startup() {
        let client = MemorySecretClient::new();

        let err = validate_credential_config(&client, &make_config())
            .await
            .unwrap_err();
        match err {
            CredentialError::SourceSecretNotFound {
                namespace, name, ..
            } => {
                assert_eq!(namespace, "agentic-system");
                assert_eq!(name, CREDENTIAL_SECRET_NAME);
            }
            other => panic!("expected SourceSecretNotFound, got {other}"),
        }
    }

    #[tokio::test]
    async fn invalid_secret_is_wrapped_with_identity() {
        let client = MemorySecretClient::new();
        let payload = br#"{"type":"service_account","project_id":"proj-1","client_email":"e"}"#;
        client.seed(make_source_secret(payload));

        let err = validate_credential_config(&client, &make_config())
            .await
            .unwrap_err();
        match err {
            CredentialError::InvalidSourceSecret { name, source, .. } => {
                assert_eq!(name, CREDENTIAL_SECRET_NAME);
                assert!(matches!(
                    source,
                    ValidationError::MissingField("private_key")
                ));
            }
            other => panic!("expected InvalidSourceSecret, got {other}"),
        }
    }

    #[tokio::test]
    async fn project_mismatch_does_not_block_startup() {
        let client = MemorySecretClient::new();
        let payload =
            br#"{"type":"service_account","project_id":"another","private_key":"k","client_email":"e"}"#;
        client.seed(make_source_secret(payload));

        validate_credential_config(&client, &make_config())
            .await
            .unwrap();
    }
}
