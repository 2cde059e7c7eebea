//! Low-level Vault HTTP client.
//!
//! Knows how to reach Vault and how to turn its status codes into
//! [`VaultError`]s. Holds no credential; callers pass the token per call.

use crate::{
    config::VaultConfig,
    error::{VaultError, VaultResult},
    secrets::ErrorResponse,
};
use reqwest::{
    Client, StatusCode, Url,
    header::{HeaderName, HeaderValue},
};
use rust_common::{HttpConfig, build_http_client};
use secrecy::{ExposeSecret, SecretString};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument};

const TOKEN_HEADER: &str = "x-vault-token";
const NAMESPACE_HEADER: &str = "x-vault-namespace";

/// HTTP client bound to one Vault address.
#[derive(Debug, Clone)]
pub struct VaultClient {
    address: String,
    http: Client,
}

impl VaultClient {
    /// Create a new client from the connection part of `config`.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InvalidConfig`] for an unparsable address or
    /// namespace, and [`VaultError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &VaultConfig) -> VaultResult<Self> {
        Url::parse(&config.address)
            .map_err(|e| VaultError::invalid_config(format!("VAULT_ADDRESS {}: {e}", config.address)))?;

        let mut http_config = HttpConfig::default()
            .with_timeout(config.timeout)
            .with_connect_timeout(config.timeout);

        if let Some(namespace) = &config.namespace {
            http_config = http_config
                .with_default_header(HeaderName::from_static(NAMESPACE_HEADER), namespace)
                .map_err(|e| VaultError::invalid_config(format!("VAULT_NAMESPACE: {e}")))?;
        }

        let http = build_http_client(&http_config)?;

        Ok(Self {
            address: config.address.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Base address of the Vault server.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// POST a JSON body to `/v1/{path}` and decode the JSON answer.
    ///
    /// # Errors
    ///
    /// Transport failures map to [`VaultError::Unavailable`]; non-2xx
    /// statuses map to the matching [`VaultError`] variant.
    #[instrument(skip(self, token, body), fields(addr = %self.address))]
    pub async fn post<B, T>(&self, path: &str, token: Option<&SecretString>, body: &B) -> VaultResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}/v1/{}", self.address, path.trim_start_matches('/'));
        let mut request = self.http.post(&url).json(body);

        if let Some(token) = token {
            let mut value = HeaderValue::from_str(token.expose_secret())
                .map_err(|_| VaultError::invalid_config("Vault token is not a valid header value"))?;
            value.set_sensitive(true);
            request = request.header(TOKEN_HEADER, value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| VaultError::unavailable(e.to_string()))?;

        let status = response.status();
        debug!(path, status = status.as_u16(), "Vault responded");

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(status_error(status, path, &ErrorResponse::message(&text)));
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

fn status_error(status: StatusCode, path: &str, message: &str) -> VaultError {
    match status.as_u16() {
        400 => VaultError::BadRequest(format!("{path}: {message}")),
        401 => VaultError::auth_failed(format!("{path}: {message}")),
        403 => VaultError::PermissionDenied(format!("{path}: {message}")),
        404 => VaultError::NotFound(path.to_string()),
        429 => VaultError::RateLimited,
        _ => VaultError::unavailable(format!("Status {status}: {message}")),
    }
}
