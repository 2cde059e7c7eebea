//! Vault error types using thiserror 2.0.
//!
//! Configuration errors, authentication errors and transport errors are
//! kept apart so operators can tell "Vault is down" from "Vault is
//! misconfigured".

use std::path::PathBuf;
use thiserror::Error;

/// Vault-specific errors.
#[derive(Error, Debug)]
pub enum VaultError {
    /// Kubernetes auth mount path is empty
    #[error("missing mount path for the Vault Kubernetes auth method")]
    MissingKubernetesPath,

    /// Kubernetes auth role is empty
    #[error("missing role for the Vault Kubernetes auth method")]
    MissingKubernetesRole,

    /// Login succeeded at the HTTP level but carried no auth section
    #[error("missing authentication information in Vault response")]
    MissingAuthInfo,

    /// Service account token could not be read
    #[error("failed to read service account token at {}: {source}", path.display())]
    TokenFile {
        /// Path that was read
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Vault server unavailable
    #[error("Vault unavailable: {0}")]
    Unavailable(String),

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Vault rejected the request payload
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Nothing at the requested path
    #[error("Not found: {0}")]
    NotFound(String),

    /// Permission denied
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Rate limited
    #[error("Rate limited")]
    RateLimited,

    /// Token renewal failed
    #[error("Token renewal failed: {0}")]
    RenewalFailed(String),

    /// Vault answered with a body we could not use
    #[error("Malformed Vault response: {0}")]
    MalformedResponse(String),

    /// Ciphertext handed to decrypt is not a Vault ciphertext string
    #[error("Invalid ciphertext: {0}")]
    InvalidCiphertext(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for Vault operations.
pub type VaultResult<T> = Result<T, VaultError>;

impl VaultError {
    /// Check if error is retryable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Unavailable(_) | Self::RateLimited | Self::Http(_)
        )
    }

    /// Check if error comes from bad local configuration.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(
            self,
            Self::MissingKubernetesPath | Self::MissingKubernetesRole | Self::InvalidConfig(_)
        )
    }

    /// Create an unavailable error.
    #[must_use]
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create an authentication failed error.
    #[must_use]
    pub fn auth_failed(msg: impl Into<String>) -> Self {
        Self::AuthenticationFailed(msg.into())
    }

    /// Create a malformed response error.
    #[must_use]
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = VaultError::unavailable("connection refused");
        assert_eq!(err.to_string(), "Vault unavailable: connection refused");

        let err = VaultError::MissingAuthInfo;
        assert_eq!(err.to_string(), "missing authentication information in Vault response");
    }

    #[test]
    fn test_kubernetes_errors_are_distinct() {
        assert_ne!(
            VaultError::MissingKubernetesPath.to_string(),
            VaultError::MissingKubernetesRole.to_string()
        );
    }

    #[test]
    fn test_token_file_display() {
        let err = VaultError::TokenFile {
            path: PathBuf::from("/nope/token"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert_eq!(
            err.to_string(),
            "failed to read service account token at /nope/token: no such file"
        );
    }

    #[test]
    fn test_retryable_errors() {
        assert!(VaultError::Unavailable("timeout".to_string()).is_retryable());
        assert!(VaultError::RateLimited.is_retryable());
        assert!(!VaultError::MissingAuthInfo.is_retryable());
        assert!(!VaultError::PermissionDenied("transit".to_string()).is_retryable());
        assert!(!VaultError::MissingKubernetesPath.is_retryable());
    }

    #[test]
    fn test_config_errors() {
        assert!(VaultError::MissingKubernetesPath.is_config());
        assert!(VaultError::MissingKubernetesRole.is_config());
        assert!(VaultError::invalid_config("empty key").is_config());
        assert!(!VaultError::MissingAuthInfo.is_config());
    }
}
