//! Authenticated Vault session.
//!
//! The session owns the only live [`Credential`]. Readers get a cloned
//! snapshot and writers swap the whole value under one lock, so token and
//! lease are always observed together.

use crate::{
    auth::AuthMethod,
    client::VaultClient,
    config::VaultConfig,
    error::{VaultError, VaultResult},
    secrets::{AuthResponse, RenewSelfRequest},
};
use secrecy::SecretString;
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

/// Vault token together with its lease.
#[derive(Debug, Clone)]
pub struct Credential {
    token: SecretString,
    lease_duration: Duration,
    issued_at: Instant,
}

impl Credential {
    /// Credential issued now.
    #[must_use]
    pub fn new(token: SecretString, lease_duration: Duration) -> Self {
        Self {
            token,
            lease_duration,
            issued_at: Instant::now(),
        }
    }

    /// The bearer token.
    #[must_use]
    pub const fn token(&self) -> &SecretString {
        &self.token
    }

    /// Lease granted when the token was issued or last renewed.
    #[must_use]
    pub const fn lease_duration(&self) -> Duration {
        self.lease_duration
    }

    /// When the lease ends.
    ///
    /// `None` for a token without a lease, or one whose lease ends beyond
    /// what `Instant` can represent.
    #[must_use]
    pub fn expires_at(&self) -> Option<Instant> {
        if self.lease_duration.is_zero() {
            return None;
        }
        self.issued_at.checked_add(self.lease_duration)
    }

    /// Whether the lease has run out.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at().is_some_and(|at| Instant::now() >= at)
    }
}

/// Vault client plus the credential it authenticates with.
#[derive(Debug)]
pub struct VaultSession {
    client: VaultClient,
    auth_method: AuthMethod,
    credential: RwLock<Credential>,
}

impl VaultSession {
    /// Build a client for `config` and authenticate it.
    ///
    /// # Errors
    ///
    /// Configuration errors are returned before any I/O. Login failures
    /// (unreadable token file, Vault unreachable, missing auth data) are
    /// returned as-is.
    #[instrument(skip(config), fields(addr = %config.address))]
    pub async fn connect(config: &VaultConfig) -> VaultResult<Arc<Self>> {
        let auth_method = AuthMethod::from_config(config)?;
        let client = VaultClient::new(config)?;

        info!(method = auth_method.name(), "Authenticating with Vault");
        let credential = auth_method.login(&client).await?;

        Ok(Arc::new(Self {
            client,
            auth_method,
            credential: RwLock::new(credential),
        }))
    }

    /// Base address of the Vault server.
    #[must_use]
    pub fn address(&self) -> &str {
        self.client.address()
    }

    /// Method used to obtain the credential.
    #[must_use]
    pub const fn auth_method(&self) -> &AuthMethod {
        &self.auth_method
    }

    /// Snapshot of the current credential.
    pub async fn credential(&self) -> Credential {
        self.credential.read().await.clone()
    }

    /// Replace the current credential.
    pub async fn replace_credential(&self, credential: Credential) {
        *self.credential.write().await = credential;
    }

    /// Log in again with the configured method and store the new credential.
    ///
    /// # Errors
    ///
    /// Returns the login error; the previous credential stays in place.
    pub async fn authenticate(&self) -> VaultResult<()> {
        let credential = self.auth_method.login(&self.client).await?;
        self.replace_credential(credential).await;
        Ok(())
    }

    /// Extend the current token by its lease duration.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::RenewalFailed`] wrapping whatever went wrong.
    #[instrument(skip(self))]
    pub async fn renew_self(&self) -> VaultResult<Duration> {
        let current = self.credential().await;
        let body = RenewSelfRequest {
            increment: current.lease_duration().as_secs(),
        };

        let renewed = async {
            let response: AuthResponse = self
                .client
                .post("auth/token/renew-self", Some(current.token()), &body)
                .await?;
            response.auth.ok_or(VaultError::MissingAuthInfo)
        }
        .await
        .map_err(|e| VaultError::RenewalFailed(e.to_string()))?;

        let token = if renewed.client_token.is_empty() {
            current.token().clone()
        } else {
            SecretString::from(renewed.client_token)
        };
        let lease = Duration::from_secs(renewed.lease_duration);

        self.replace_credential(Credential::new(token, lease)).await;
        debug!(lease_secs = lease.as_secs(), "Vault token renewed");
        Ok(lease)
    }

    /// POST to Vault with the current token.
    pub(crate) async fn post<B, T>(&self, path: &str, body: &B) -> VaultResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let credential = self.credential().await;
        self.client.post(path, Some(credential.token()), body).await
    }
}
