//! `vault-transit encrypt|decrypt`: seal or open stdin through Vault transit.

use anyhow::{Context, bail};
use rust_common::{ShutdownCoordinator, TracingConfig, init_tracing, wait_for_signal};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::info;
use vault_transit::{Cryptor, TokenRenewer, TransitCryptor, VaultConfig, VaultSession};

enum Mode {
    Encrypt,
    Decrypt,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing(&TracingConfig::from_env().with_service_name("vault-transit"));

    let mode = match std::env::args().nth(1).as_deref() {
        Some("encrypt") => Mode::Encrypt,
        Some("decrypt") => Mode::Decrypt,
        _ => bail!("usage: vault-transit <encrypt|decrypt> < input > output"),
    };

    let config = VaultConfig::from_env();
    let session = VaultSession::connect(&config)
        .await
        .context("Vault bootstrap failed")?;
    info!(addr = session.address(), "Connected to Vault");

    let mut coordinator = ShutdownCoordinator::new();
    let renewal = TokenRenewer::new(session.clone()).run(coordinator.subscribe());
    coordinator.spawn("vault-token-renewal", renewal);

    let cryptor = TransitCryptor::new(session);
    let work = async {
        let mut input = Vec::new();
        tokio::io::stdin()
            .read_to_end(&mut input)
            .await
            .context("failed to read stdin")?;

        let output = match mode {
            Mode::Encrypt => cryptor.encrypt(&input, &config.transit).await,
            // Trailing newline left by shells and editors
            Mode::Decrypt => cryptor.decrypt(input.trim_ascii_end(), &config.transit).await,
        };
        output.context("transit call failed")
    };

    let output = tokio::select! {
        output = work => Some(output),
        () = wait_for_signal() => None,
    };

    coordinator.shutdown(Duration::from_secs(5)).await;

    let Some(output) = output else {
        bail!("interrupted before the transit call completed");
    };
    let output = output?;

    let mut stdout = tokio::io::stdout();
    stdout.write_all(&output).await?;
    stdout.flush().await?;
    Ok(())
}
