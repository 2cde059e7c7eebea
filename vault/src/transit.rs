//! [`Cryptor`] backed by the Vault transit secrets engine.

use crate::{
    config::TransitConfig,
    cryptor::Cryptor,
    error::{VaultError, VaultResult},
    secrets::{DataResponse, DecryptData, DecryptRequest, EncryptData, EncryptRequest},
    session::VaultSession,
};
use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use std::sync::Arc;
use tracing::{debug, instrument};
use zeroize::Zeroizing;

/// Encrypts through `POST /v1/{mount}/encrypt/{key}` and decrypts through
/// `POST /v1/{mount}/decrypt/{key}`, using the session's current token.
#[derive(Debug, Clone)]
pub struct TransitCryptor {
    session: Arc<VaultSession>,
}

impl TransitCryptor {
    /// Create a cryptor on top of an authenticated session.
    #[must_use]
    pub const fn new(session: Arc<VaultSession>) -> Self {
        Self { session }
    }

    /// Session the cryptor authenticates with.
    #[must_use]
    pub const fn session(&self) -> &Arc<VaultSession> {
        &self.session
    }
}

fn validate(config: &TransitConfig) -> VaultResult<()> {
    if config.key_name.trim().is_empty() {
        return Err(VaultError::invalid_config("transit key name is empty"));
    }
    if config.mount_path.trim_matches('/').is_empty() {
        return Err(VaultError::invalid_config("transit mount path is empty"));
    }
    Ok(())
}

#[async_trait]
impl Cryptor for TransitCryptor {
    type Config = TransitConfig;
    type Error = VaultError;

    #[instrument(skip(self, plaintext, config), fields(key = %config.key_name, mount = %config.mount_path))]
    async fn encrypt(&self, plaintext: &[u8], config: &TransitConfig) -> VaultResult<Vec<u8>> {
        validate(config)?;

        let body = EncryptRequest {
            plaintext: Zeroizing::new(STANDARD.encode(plaintext)),
        };
        let response: DataResponse<EncryptData> = self
            .session
            .post(&config.operation_path("encrypt"), &body)
            .await?;

        let data = response
            .data
            .ok_or_else(|| VaultError::malformed("encrypt response missing data"))?;
        if data.ciphertext.is_empty() {
            return Err(VaultError::malformed("encrypt response has empty ciphertext"));
        }

        debug!(key_version = ?data.key_version, "Encrypted with transit key");
        Ok(data.ciphertext.into_bytes())
    }

    #[instrument(skip(self, ciphertext, config), fields(key = %config.key_name, mount = %config.mount_path))]
    async fn decrypt(&self, ciphertext: &[u8], config: &TransitConfig) -> VaultResult<Vec<u8>> {
        validate(config)?;

        let ciphertext = std::str::from_utf8(ciphertext)
            .map_err(|e| VaultError::InvalidCiphertext(e.to_string()))?;
        if ciphertext.trim().is_empty() {
            return Err(VaultError::InvalidCiphertext("ciphertext is empty".to_string()));
        }
        if ciphertext.trim() != ciphertext {
            return Err(VaultError::InvalidCiphertext(
                "ciphertext has leading or trailing whitespace".to_string(),
            ));
        }

        let body = DecryptRequest { ciphertext };
        let response: DataResponse<DecryptData> = self
            .session
            .post(&config.operation_path("decrypt"), &body)
            .await?;

        let data = response
            .data
            .ok_or_else(|| VaultError::malformed("decrypt response missing data"))?;

        STANDARD
            .decode(data.plaintext.as_bytes())
            .map_err(|e| VaultError::malformed(format!("plaintext is not base64: {e}")))
    }
}
