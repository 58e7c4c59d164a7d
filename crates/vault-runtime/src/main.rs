//! # Quantum-Vault Runtime
//!
//! Entry point: load configuration, start telemetry, build the subsystem
//! container, reconcile the store and run one command.

use clap::Parser;
use tracing::info;

use vault_runtime::cli::{execute, Cli};
use vault_runtime::{VaultConfig, VaultContainer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = VaultConfig::from_env()?;
    let _telemetry = quantum_telemetry::init_telemetry(config.telemetry.clone())?;

    info!("===========================================");
    info!("  Quantum-Vault Runtime v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");

    let container = VaultContainer::new(&config)?;
    container.recover().await?;

    let mut stdout = std::io::stdout();
    execute(cli.command, &container, &mut stdout).await
}
