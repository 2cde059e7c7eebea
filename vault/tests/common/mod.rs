//! Shared fixtures: a wiremock stand-in for the Vault transit engine.

#![allow(dead_code)]

use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use vault_transit::{TransitConfig, VaultConfig, VaultSession};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const TOKEN: &str = "s.integration";

/// Emulates transit: ciphertext is `vault:v1:<nonce>:<base64 plaintext>`,
/// so every encryption is distinct but decrypts to the same bytes.
#[derive(Default)]
pub struct TransitEmulator {
    nonce: AtomicU64,
}

impl Respond for TransitEmulator {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let Ok(body) = request.body_json::<Value>() else {
            return ResponseTemplate::new(400).set_body_json(json!({"errors": ["invalid JSON"]}));
        };

        if request.url.path().contains("/encrypt/") {
            let Some(plaintext) = body["plaintext"].as_str() else {
                return ResponseTemplate::new(400)
                    .set_body_json(json!({"errors": ["missing plaintext to encrypt"]}));
            };
            let nonce = self.nonce.fetch_add(1, Ordering::SeqCst);
            return ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "ciphertext": format!("vault:v1:{nonce}:{plaintext}"),
                    "key_version": 1
                }
            }));
        }

        let parsed = body["ciphertext"]
            .as_str()
            .and_then(|c| c.strip_prefix("vault:v1:"))
            .and_then(|rest| rest.split_once(':'));
        match parsed {
            Some((_, plaintext)) => {
                ResponseTemplate::new(200).set_body_json(json!({"data": {"plaintext": plaintext}}))
            }
            None => ResponseTemplate::new(400)
                .set_body_json(json!({"errors": ["invalid ciphertext: no prefix"]})),
        }
    }
}

/// Mount encrypt and decrypt endpoints for `transit`, requiring `token`.
pub async fn mount_transit(server: &MockServer, transit: &TransitConfig, token: &str) {
    for operation in ["encrypt", "decrypt"] {
        Mock::given(method("POST"))
            .and(path(format!(
                "/v1/{}/{operation}/{}",
                transit.mount_path, transit.key_name
            )))
            .and(header("x-vault-token", token))
            .respond_with(TransitEmulator::default())
            .mount(server)
            .await;
    }
}

/// Config pointing at `server` with the static test token.
pub fn token_config(server: &MockServer) -> VaultConfig {
    VaultConfig::new(server.uri())
        .with_token(TOKEN)
        .with_token_path("/nonexistent/serviceaccount/token")
}

/// Session authenticated with the static test token.
pub async fn token_session(server: &MockServer) -> Arc<VaultSession> {
    VaultSession::connect(&token_config(server))
        .await
        .expect("static token bootstrap")
}
