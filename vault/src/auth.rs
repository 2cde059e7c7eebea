//! Authentication method selection and login.
//!
//! A static `VAULT_TOKEN` wins; otherwise the pod logs in through the
//! Kubernetes auth method with its projected service account token.

use crate::{
    client::VaultClient,
    config::VaultConfig,
    error::{VaultError, VaultResult},
    secrets::{AuthResponse, KubernetesLoginRequest},
    session::Credential,
};
use secrecy::SecretString;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, instrument};

/// How the session obtains its token.
#[derive(Debug, Clone)]
pub enum AuthMethod {
    /// Pre-issued token
    Token {
        /// The token itself
        token: SecretString,
        /// Lease assumed for it
        lease_duration: Duration,
    },
    /// Kubernetes service account login
    Kubernetes {
        /// Auth method mount path
        path: String,
        /// Role to claim
        role: String,
        /// Service account token file
        token_path: PathBuf,
    },
}

impl AuthMethod {
    /// Pick the method `config` asks for.
    ///
    /// # Errors
    ///
    /// Without a static token, returns [`VaultError::MissingKubernetesPath`]
    /// or [`VaultError::MissingKubernetesRole`] when either value is empty.
    /// Nothing is read from disk or the network here.
    pub fn from_config(config: &VaultConfig) -> VaultResult<Self> {
        if let Some(token) = &config.token {
            return Ok(Self::Token {
                token: token.clone(),
                lease_duration: config.default_lease_duration,
            });
        }

        if config.kubernetes_path.trim().is_empty() {
            return Err(VaultError::MissingKubernetesPath);
        }
        if config.kubernetes_role.trim().is_empty() {
            return Err(VaultError::MissingKubernetesRole);
        }

        Ok(Self::Kubernetes {
            path: config.kubernetes_path.clone(),
            role: config.kubernetes_role.clone(),
            token_path: config.token_path.clone(),
        })
    }

    /// Short name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Token { .. } => "token",
            Self::Kubernetes { .. } => "kubernetes",
        }
    }

    /// Whether running the method again yields a fresh token.
    #[must_use]
    pub const fn can_reauthenticate(&self) -> bool {
        matches!(self, Self::Kubernetes { .. })
    }

    /// Obtain a credential with this method.
    pub(crate) async fn login(&self, client: &VaultClient) -> VaultResult<Credential> {
        match self {
            Self::Token {
                token,
                lease_duration,
            } => Ok(Credential::new(token.clone(), *lease_duration)),
            Self::Kubernetes {
                path,
                role,
                token_path,
            } => kubernetes_login(client, path, role, token_path).await,
        }
    }
}

#[instrument(skip(client, role, token_path), fields(role = %role))]
async fn kubernetes_login(
    client: &VaultClient,
    path: &str,
    role: &str,
    token_path: &Path,
) -> VaultResult<Credential> {
    let jwt = read_service_account_token(token_path).await?;
    let body = KubernetesLoginRequest { jwt: &jwt, role };

    let response: AuthResponse = client.post(&login_path(path), None, &body).await?;
    let auth = response.auth.ok_or(VaultError::MissingAuthInfo)?;

    let lease = Duration::from_secs(auth.lease_duration);
    info!(
        lease_secs = lease.as_secs(),
        renewable = auth.renewable,
        policies = ?auth.policies,
        "Authenticated with Vault"
    );

    Ok(Credential::new(SecretString::from(auth.client_token), lease))
}

async fn read_service_account_token(path: &Path) -> VaultResult<String> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| VaultError::TokenFile {
            path: path.to_path_buf(),
            source,
        })?;

    let jwt = raw.trim();
    if jwt.is_empty() {
        return Err(VaultError::auth_failed(format!(
            "service account token at {} is empty",
            path.display()
        )));
    }
    Ok(jwt.to_string())
}

/// Login endpoint for an auth mount.
///
/// Accepts both the bare mount name (`kubernetes`) and the full mount path
/// (`auth/kubernetes`); either way the request goes to
/// `auth/kubernetes/login`.
fn login_path(mount: &str) -> String {
    let mount = mount.trim_matches('/');
    if mount.starts_with("auth/") {
        format!("{mount}/login")
    } else {
        format!("auth/{mount}/login")
    }
}
