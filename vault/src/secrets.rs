//! Vault API request and response bodies.

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Kubernetes auth login request
#[derive(Serialize)]
pub struct KubernetesLoginRequest<'a> {
    /// Service-account JWT
    pub jwt: &'a str,
    /// Vault role bound to the service account
    pub role: &'a str,
}

/// Token renew-self request
#[derive(Debug, Serialize)]
pub struct RenewSelfRequest {
    /// Requested extension in seconds
    pub increment: u64,
}

/// Response of any endpoint that issues or refreshes a token.
///
/// `auth` is optional because Vault can answer 2xx without it
/// (e.g. warnings only), which is a distinct failure for callers.
#[derive(Deserialize)]
pub struct AuthResponse {
    /// Issued token, absent on warning-only replies
    #[serde(default)]
    pub auth: Option<AuthData>,
}

/// `auth` section of a login or renewal response
#[derive(Deserialize)]
pub struct AuthData {
    /// The Vault token
    pub client_token: String,
    /// Policies attached to the token
    #[serde(default)]
    pub policies: Vec<String>,
    /// Lease in seconds, 0 for a token without expiry
    pub lease_duration: u64,
    /// Whether the token can be renewed
    #[serde(default)]
    pub renewable: bool,
}

/// Transit encrypt request
#[derive(Serialize)]
pub struct EncryptRequest {
    /// Base64 of the plaintext
    pub plaintext: Zeroizing<String>,
}

/// Transit decrypt request
#[derive(Debug, Serialize)]
pub struct DecryptRequest<'a> {
    /// `vault:vN:...` blob returned by encrypt
    pub ciphertext: &'a str,
}

/// Generic `{ "data": ... }` envelope
#[derive(Debug, Deserialize)]
pub struct DataResponse<T> {
    /// Payload, absent on warning-only replies
    pub data: Option<T>,
}

/// `data` section of a transit encrypt response
#[derive(Debug, Deserialize)]
pub struct EncryptData {
    /// `vault:vN:...` blob
    pub ciphertext: String,
    /// Key version used, when Vault reports it
    #[serde(default)]
    pub key_version: Option<u64>,
}

/// `data` section of a transit decrypt response
#[derive(Deserialize)]
pub struct DecryptData {
    /// Base64 of the plaintext
    pub plaintext: Zeroizing<String>,
}

/// Error body Vault returns on non-2xx statuses
#[derive(Debug, Default, Deserialize)]
pub struct ErrorResponse {
    /// Messages reported by Vault
    #[serde(default)]
    pub errors: Vec<String>,
}

impl ErrorResponse {
    /// Human-readable message, falling back to the raw body.
    pub fn message(body: &str) -> String {
        serde_json::from_str::<Self>(body)
            .ok()
            .filter(|e| !e.errors.is_empty())
            .map_or_else(|| body.trim().to_string(), |e| e.errors.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_response_without_auth() {
        let parsed: AuthResponse = serde_json::from_str(r#"{"auth": null, "warnings": ["x"]}"#).unwrap();
        assert!(parsed.auth.is_none());

        let parsed: AuthResponse = serde_json::from_str(r#"{"data": {}}"#).unwrap();
        assert!(parsed.auth.is_none());
    }

    #[test]
    fn test_login_response_with_auth() {
        let body = r#"{
            "auth": {
                "client_token": "hvs.token",
                "accessor": "acc",
                "policies": ["default"],
                "lease_duration": 3600,
                "renewable": true
            }
        }"#;
        let auth = serde_json::from_str::<AuthResponse>(body).unwrap().auth.unwrap();
        assert_eq!(auth.client_token, "hvs.token");
        assert_eq!(auth.lease_duration, 3600);
        assert!(auth.renewable);
    }

    #[test]
    fn test_login_response_ignores_unused_fields() {
        let body = r#"{"auth": {"client_token": "t", "accessor": "acc", "lease_duration": 60}}"#;
        let auth = serde_json::from_str::<AuthResponse>(body).unwrap().auth.unwrap();
        assert_eq!(auth.lease_duration, 60);
        assert!(auth.policies.is_empty());
        assert!(!auth.renewable);
    }

    #[test]
    fn test_encrypt_response() {
        let body = r#"{"data": {"ciphertext": "vault:v1:abc", "key_version": 1}}"#;
        let data = serde_json::from_str::<DataResponse<EncryptData>>(body)
            .unwrap()
            .data
            .unwrap();
        assert_eq!(data.ciphertext, "vault:v1:abc");
        assert_eq!(data.key_version, Some(1));
    }

    #[test]
    fn test_error_message() {
        assert_eq!(
            ErrorResponse::message(r#"{"errors": ["permission denied"]}"#),
            "permission denied"
        );
        assert_eq!(ErrorResponse::message("upstream gone\n"), "upstream gone");
        assert_eq!(ErrorResponse::message(r#"{"errors": []}"#), r#"{"errors": []}"#);
    }
}
