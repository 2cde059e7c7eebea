//! Encryption capability implemented by remote backends.

use async_trait::async_trait;

/// Encrypts and decrypts opaque byte blobs.
///
/// Everything a backend needs for one call travels in `config`, so one
/// instance can serve several keys side by side. Ciphertext is opaque and
/// must be handed back to [`Cryptor::decrypt`] unmodified. Backend errors
/// are returned unchanged.
#[async_trait]
pub trait Cryptor: Send + Sync {
    /// Per-call backend configuration, such as which key to use.
    type Config: Send + Sync;
    /// Backend error.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Encrypt `plaintext`.
    async fn encrypt(&self, plaintext: &[u8], config: &Self::Config) -> Result<Vec<u8>, Self::Error>;

    /// Decrypt a ciphertext produced by [`Cryptor::encrypt`].
    async fn decrypt(&self, ciphertext: &[u8], config: &Self::Config) -> Result<Vec<u8>, Self::Error>;
}
