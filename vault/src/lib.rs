//! HashiCorp Vault transit encryption for Kubernetes workloads.
//!
//! [`VaultSession::connect`] authenticates once (static token or Kubernetes
//! login), [`spawn_renewal`] keeps the token alive in the background, and
//! [`TransitCryptor`] encrypts and decrypts through the transit engine.
//!
//! ```no_run
//! use rust_common::ShutdownCoordinator;
//! use vault_transit::{Cryptor, TransitCryptor, VaultConfig, VaultSession, spawn_renewal};
//!
//! # async fn run() -> vault_transit::VaultResult<()> {
//! let config = VaultConfig::from_env();
//! let session = VaultSession::connect(&config).await?;
//!
//! let coordinator = ShutdownCoordinator::new();
//! let renewal = spawn_renewal(session.clone(), coordinator.subscribe());
//!
//! let cryptor = TransitCryptor::new(session);
//! let sealed = cryptor.encrypt(b"hello world", &config.transit).await?;
//! let opened = cryptor.decrypt(&sealed, &config.transit).await?;
//! assert_eq!(opened, b"hello world");
//!
//! coordinator.trigger();
//! let _ = renewal.await;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod cryptor;
pub mod error;
pub mod renewal;
pub mod secrets;
pub mod session;
pub mod transit;

pub use auth::AuthMethod;
pub use client::VaultClient;
pub use config::{TransitConfig, VaultConfig};
pub use cryptor::Cryptor;
pub use error::{VaultError, VaultResult};
pub use renewal::{LeaseRenewer, TokenRenewer, spawn_renewal};
pub use session::{Credential, VaultSession};
pub use transit::TransitCryptor;
