//! Background token renewal.
//!
//! Renews the session token, then sleeps for half of the lease before the
//! next attempt. Failures are logged and the loop carries on; once the
//! lease has actually run out it falls back to a fresh login when the
//! auth method allows one.

use crate::{error::VaultResult, session::VaultSession};
use async_trait::async_trait;
use rust_common::ShutdownSignal;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Something holding a leased credential that can be extended.
#[async_trait]
pub trait LeaseRenewer: Send + Sync {
    /// Lease of the credential currently held.
    async fn lease_duration(&self) -> Duration;

    /// Extend the lease, returning the new lease duration.
    async fn renew(&self) -> VaultResult<Duration>;

    /// Obtain a new credential if the current one has expired.
    ///
    /// Returns `Ok(false)` when there was nothing to do.
    async fn recover(&self) -> VaultResult<bool>;
}

#[async_trait]
impl LeaseRenewer for VaultSession {
    async fn lease_duration(&self) -> Duration {
        self.credential().await.lease_duration()
    }

    async fn renew(&self) -> VaultResult<Duration> {
        self.renew_self().await
    }

    async fn recover(&self) -> VaultResult<bool> {
        if !self.auth_method().can_reauthenticate() || !self.credential().await.is_expired() {
            return Ok(false);
        }
        self.authenticate().await?;
        Ok(true)
    }
}

/// Renewal loop over a [`LeaseRenewer`].
pub struct TokenRenewer<R: ?Sized> {
    renewer: Arc<R>,
}

impl<R: LeaseRenewer + ?Sized> TokenRenewer<R> {
    /// Create a renewal loop for `renewer`.
    #[must_use]
    pub const fn new(renewer: Arc<R>) -> Self {
        Self { renewer }
    }

    /// Run until `shutdown` fires or the lease turns out to be infinite.
    pub async fn run(self, mut shutdown: ShutdownSignal) {
        loop {
            if shutdown.is_shutdown() {
                break;
            }

            if self.renewer.lease_duration().await.is_zero() {
                warn!("Vault token has no lease, renewal disabled");
                return;
            }

            self.renew_once().await;

            let interval = self.renewer.lease_duration().await / 2;
            tokio::select! {
                () = tokio::time::sleep(interval) => {}
                () = shutdown.recv() => break,
            }
        }

        info!("Vault token renewal stopped");
    }

    async fn renew_once(&self) {
        info!("Renewing Vault token");

        let Err(e) = self.renewer.renew().await else {
            return;
        };
        error!(error = %e, "Could not renew Vault token");

        match self.renewer.recover().await {
            Ok(true) => info!("Re-authenticated with Vault after token expiry"),
            Ok(false) => {}
            Err(e) => error!(error = %e, "Could not re-authenticate with Vault"),
        }
    }
}

/// Spawn the renewal loop for `session` onto the current runtime.
pub fn spawn_renewal(session: Arc<VaultSession>, shutdown: ShutdownSignal) -> JoinHandle<()> {
    tokio::spawn(TokenRenewer::new(session).run(shutdown))
}
