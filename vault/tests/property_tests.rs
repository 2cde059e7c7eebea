//! Property-based tests for the Vault transit client.
//!
//! Tests validate:
//! - Round trip: decrypt(encrypt(p)) == p for arbitrary bytes
//! - Tokens never appear in Debug output
//! - Config lookup keeps explicit values and defaults the rest

mod common;

use common::{TOKEN, mount_transit, token_session};
use proptest::prelude::*;
use secrecy::SecretString;
use std::time::Duration;
use vault_transit::{Credential, Cryptor, TransitConfig, TransitCryptor, VaultConfig};
use wiremock::MockServer;

// Strategy for transit key names
fn key_name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{2,20}"
}

// Strategy for Vault tokens
fn token_strategy() -> impl Strategy<Value = String> {
    "(hvs|s)\\.[A-Za-z0-9]{24}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// *For any* plaintext and key name, decrypting the ciphertext returned
    /// by encrypt yields the original bytes.
    #[test]
    fn prop_round_trip(
        plaintext in prop::collection::vec(any::<u8>(), 0..512),
        key_name in key_name_strategy(),
    ) {
        let (ciphertext, opened) = tokio_test::block_on(async {
            let server = MockServer::start().await;
            let transit = TransitConfig::new(key_name.clone(), "transit");
            mount_transit(&server, &transit, TOKEN).await;

            let cryptor = TransitCryptor::new(token_session(&server).await);
            let ciphertext = cryptor.encrypt(&plaintext, &transit).await.unwrap();
            let opened = cryptor.decrypt(&ciphertext, &transit).await.unwrap();
            (ciphertext, opened)
        });

        prop_assert!(!ciphertext.is_empty());
        prop_assert_ne!(&ciphertext, &plaintext);
        prop_assert_eq!(opened, plaintext);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* token, neither the credential nor the config leaks it
    /// through Debug.
    #[test]
    fn prop_token_not_exposed_in_debug(token in token_strategy(), lease in 0u64..86_400) {
        let credential = Credential::new(SecretString::from(token.clone()), Duration::from_secs(lease));
        let config = VaultConfig::default().with_token(token.clone());

        let credential_debug = format!("{credential:?}");
        let config_debug = format!("{config:?}");

        prop_assert!(!credential_debug.contains(&token));
        prop_assert!(!config_debug.contains(&token));
        prop_assert_eq!(credential.lease_duration(), Duration::from_secs(lease));
    }

    /// Explicit transit values always win over defaults.
    #[test]
    fn prop_transit_lookup(key in key_name_strategy(), mount in "[a-z]{3,12}") {
        let config = VaultConfig::from_lookup(|var| match var {
            "VAULT_TRANSIT_KEY" => Some(key.clone()),
            "VAULT_TRANSIT_PATH" => Some(mount.clone()),
            _ => None,
        });

        prop_assert_eq!(config.transit, TransitConfig::new(key.clone(), mount.clone()));
        prop_assert_eq!(config.address, "http://localhost:8200");
        prop_assert_eq!(config.kubernetes_role, "default");
    }
}
