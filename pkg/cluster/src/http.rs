use async_trait::async_trait;
use pkg_types::secret::Secret;
use reqwest::StatusCode;

use crate::client::{ClusterError, SecretClient};

/// `SecretClient` backed by the cluster API server over HTTP.
///
/// Routes follow the server's resource layout:
/// `/api/v1/namespaces/{ns}/secrets` and
/// `/api/v1/namespaces/{ns}/secrets/{name}`.
pub struct HttpSecretClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpSecretClient {
    pub fn new(server: &str, token: Option<String>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .build()?;
        Ok(Self {
            http,
            base_url: server.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn collection_url(&self, namespace: &str) -> String {
        format!("{}/api/v1/namespaces/{}/secrets", self.base_url, namespace)
    }

    fn secret_url(&self, namespace: &str, name: &str) -> String {
        format!(
            "{}/api/v1/namespaces/{}/secrets/{}",
            self.base_url, namespace, name
        )
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }
}

/// Map a failed response to the client error taxonomy.
async fn check_status(
    resp: reqwest::Response,
    namespace: &str,
    name: &str,
) -> Result<reqwest::Response, ClusterError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    match status {
        StatusCode::NOT_FOUND => Err(ClusterError::NotFound {
            namespace: namespace.to_string(),
            name: name.to_string(),
        }),
        StatusCode::CONFLICT => Err(ClusterError::Conflict {
            namespace: namespace.to_string(),
            name: name.to_string(),
        }),
        _ => {
            let message = resp.text().await.unwrap_or_default();
            Err(ClusterError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

fn transport_error(e: reqwest::Error) -> ClusterError {
    // A timed-out round trip is a cancellation from the caller's point of
    // view: the operation must not be retried as if it had conflicted.
    if e.is_timeout() {
        ClusterError::Cancelled
    } else {
        ClusterError::Transport(e.to_string())
    }
}

#[async_trait]
impl SecretClient for HttpSecretClient {
    async fn get_secret(&self, namespace: &str, name: &str) -> Result<Secret, ClusterError> {
        let req = self.authorize(self.http.get(self.secret_url(namespace, name)));
        let resp = req.send().await.map_err(transport_error)?;
        let resp = check_status(resp, namespace, name).await?;
        resp.json().await.map_err(transport_error)
    }

    async fn create_secret(&self, secret: &Secret) -> Result<Secret, ClusterError> {
        let req = self.authorize(
            self.http
                .post(self.collection_url(&secret.namespace))
                .json(secret),
        );
        let resp = req.send().await.map_err(transport_error)?;
        let resp = check_status(resp, &secret.namespace, &secret.name).await?;
        resp.json().await.map_err(transport_error)
    }

    async fn update_secret(&self, secret: &Secret) -> Result<Secret, ClusterError> {
        let req = self.authorize(
            self.http
                .put(self.secret_url(&secret.namespace, &secret.name))
                .json(secret),
        );
        let resp = req.send().await.map_err(transport_error)?;
        let resp = check_status(resp, &secret.namespace, &secret.name).await?;
        resp.json().await.map_err(transport_error)
    }

    async fn delete_secret(&self, namespace: &str, name: &str) -> Result<(), ClusterError> {
        let req = self.authorize(self.http.delete(self.secret_url(namespace, name)));
        let resp = req.send().await.map_err(transport_error)?;
        check_status(resp, namespace, name).await?;
        Ok(())
    }
}
