//! Vault client configuration.
//!
//! Every value has a default, so an empty environment yields a usable
//! config pointing at a local dev server.

use secrecy::SecretString;
use std::path::PathBuf;
use std::time::Duration;

/// Default Vault address.
pub const DEFAULT_ADDRESS: &str = "http://localhost:8200";
/// Default mount path of the Kubernetes auth method.
pub const DEFAULT_KUBERNETES_PATH: &str = "kubernetes";
/// Default role claimed at login.
pub const DEFAULT_KUBERNETES_ROLE: &str = "default";
/// Default transit key name.
pub const DEFAULT_TRANSIT_KEY: &str = "sealed-secrets";
/// Default transit mount path.
pub const DEFAULT_TRANSIT_PATH: &str = "transit";
/// Where Kubernetes projects the pod's service account token.
pub const SERVICE_ACCOUNT_TOKEN_PATH: &str = "/var/run/secrets/kubernetes.io/serviceaccount/token";

/// Vault client configuration.
#[derive(Debug, Clone)]
pub struct VaultConfig {
    /// Vault server address
    pub address: String,
    /// Static token; when set, Kubernetes login is skipped
    pub token: Option<SecretString>,
    /// Vault Enterprise namespace
    pub namespace: Option<String>,
    /// Kubernetes auth mount path
    pub kubernetes_path: String,
    /// Kubernetes auth role name
    pub kubernetes_role: String,
    /// Service account token path
    pub token_path: PathBuf,
    /// Request and connect timeout
    pub timeout: Duration,
    /// Lease assumed for a static token, which Vault never reports at startup
    pub default_lease_duration: Duration,
    /// Transit key used when callers take the process-wide default
    pub transit: TransitConfig,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            token: None,
            namespace: None,
            kubernetes_path: DEFAULT_KUBERNETES_PATH.to_string(),
            kubernetes_role: DEFAULT_KUBERNETES_ROLE.to_string(),
            token_path: PathBuf::from(SERVICE_ACCOUNT_TOKEN_PATH),
            timeout: Duration::from_secs(10),
            default_lease_duration: Duration::from_secs(1800),
            transit: TransitConfig::default(),
        }
    }
}

impl VaultConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    ///
    /// A variable that is set but empty stays empty instead of falling back
    /// to its default, so `VAULT_KUBERNETES_PATH=""` is reported as missing.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Self {
            address: var("VAULT_ADDRESS", DEFAULT_ADDRESS),
            token: lookup("VAULT_TOKEN")
                .filter(|t| !t.is_empty())
                .map(SecretString::from),
            namespace: lookup("VAULT_NAMESPACE").filter(|ns| !ns.is_empty()),
            kubernetes_path: var("VAULT_KUBERNETES_PATH", DEFAULT_KUBERNETES_PATH),
            kubernetes_role: var("VAULT_KUBERNETES_ROLE", DEFAULT_KUBERNETES_ROLE),
            transit: TransitConfig::new(
                var("VAULT_TRANSIT_KEY", DEFAULT_TRANSIT_KEY),
                var("VAULT_TRANSIT_PATH", DEFAULT_TRANSIT_PATH),
            ),
            ..Default::default()
        }
    }

    /// Create a configuration for the given address.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Default::default()
        }
    }

    /// Use a static token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(SecretString::from(token.into()));
        self
    }

    /// Set the Kubernetes auth mount path and role.
    #[must_use]
    pub fn with_kubernetes(mut self, path: impl Into<String>, role: impl Into<String>) -> Self {
        self.kubernetes_path = path.into();
        self.kubernetes_role = role.into();
        self
    }

    /// Read the service account token from a different file.
    #[must_use]
    pub fn with_token_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_path = path.into();
        self
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the lease assumed for a static token.
    #[must_use]
    pub const fn with_default_lease_duration(mut self, lease: Duration) -> Self {
        self.default_lease_duration = lease;
        self
    }

    /// Set the default transit key.
    #[must_use]
    pub fn with_transit(mut self, transit: TransitConfig) -> Self {
        self.transit = transit;
        self
    }
}

/// Which transit key encrypts or decrypts a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitConfig {
    /// Named key inside the transit engine
    pub key_name: String,
    /// Mount path of the transit engine
    pub mount_path: String,
}

impl Default for TransitConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TRANSIT_KEY, DEFAULT_TRANSIT_PATH)
    }
}

impl TransitConfig {
    /// Create a transit key reference.
    #[must_use]
    pub fn new(key_name: impl Into<String>, mount_path: impl Into<String>) -> Self {
        Self {
            key_name: key_name.into(),
            mount_path: mount_path.into(),
        }
    }

    /// API path for `operation` (`encrypt` or `decrypt`) on this key.
    pub(crate) fn operation_path(&self, operation: &str) -> String {
        format!(
            "{}/{operation}/{}",
            self.mount_path.trim_matches('/'),
            self.key_name
        )
    }
}
