//! CryptoDevs ICO client (v1)
//!
//! Command-line presentation layer over `DappSession`.
//!
//! # Architecture Overview
//!
//! ```text
//!   CLI command ──▶ DappSession
//!                       │
//!                       ├─▶ ProviderResolver ──▶ NetworkGuard ──▶ RpcHandle (alloy)
//!                       │
//!                       ├─▶ EligibilityEngine ──▶ certificate + token reads (fan-out)
//!                       │
//!                       ├─▶ TransactionOrchestrator ──▶ mint / claim / withdraw
//!                       │           │
//!                       │           └─▶ StateRefresher (after confirmation)
//!                       │
//!                       └─▶ AggregateStateStore ──▶ snapshot (JSON on stdout)
//!                           Notifier            ──▶ notices (stderr)
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use alloy::primitives::utils::format_units;
use alloy::primitives::U256;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio::sync::broadcast::error::TryRecvError;

use cryptodev_ico::blockchain::LocalWalletConnector;
use cryptodev_ico::config::{load_config, ProtocolConfig};
use cryptodev_ico::network::ConnectionState;
use cryptodev_ico::observability::{logging, metrics};
use cryptodev_ico::state::AvailableAction;
use cryptodev_ico::{AggregateState, DappSession};

#[derive(Parser)]
#[command(name = "cryptodev-ico")]
#[command(about = "Mint and claim CryptoDev tokens", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "cryptodev-ico.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show balance, supply, and claimable tokens
    Status,
    /// Mint tokens at the fixed unit price
    Mint {
        /// Number of whole tokens to mint
        amount: u64,
    },
    /// Claim tokens for every unclaimed certificate
    Claim,
    /// Withdraw contract funds (owner only)
    Withdraw,
}

/// Human-readable view of the aggregate state.
#[derive(Serialize)]
struct StatusReport {
    wallet_connected: bool,
    account: Option<String>,
    is_owner: bool,
    loading: bool,
    next_action: AvailableAction,
    unclaimed_certificates: String,
    claimable_tokens: String,
    balance: String,
    total_minted: String,
    max_supply: String,
}

impl StatusReport {
    fn new(state: &AggregateState, account: Option<String>, protocol: &ProtocolConfig) -> Self {
        let decimals = protocol.token_decimals;
        Self {
            wallet_connected: state.wallet_connected,
            account,
            is_owner: state.is_owner,
            loading: state.loading,
            next_action: state.available_action(),
            unclaimed_certificates: state.tokens_to_be_claimed.to_string(),
            claimable_tokens: tokens(state.claimable_token_amount(protocol), decimals),
            balance: tokens(state.balance, decimals),
            total_minted: tokens(state.total_minted, decimals),
            max_supply: tokens(protocol.max_supply(), decimals),
        }
    }
}

fn tokens(value: U256, decimals: u8) -> String {
    format_units(value, decimals).unwrap_or_else(|_| value.to_string())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    logging::init_logging(&config.observability);
    metrics::set_enabled(config.observability.metrics_enabled);

    tracing::info!(
        rpc_url = %config.network.rpc_url,
        chain_id = config.network.chain_id,
        token = %config.contracts.token_address,
        certificates = %config.contracts.certificate_address,
        "Configuration loaded"
    );

    let connector = Arc::new(LocalWalletConnector::from_env(config.network.clone()));
    let session = DappSession::new(config, connector);
    let mut notices = session.notices();

    let result = match session.connect_wallet().await {
        Ok(_) => match cli.command {
            Commands::Status => Ok(None),
            Commands::Mint { amount } => session.mint(U256::from(amount)).await.map(Some),
            Commands::Claim => session.claim().await.map(Some),
            Commands::Withdraw => session.withdraw().await.map(Some),
        },
        Err(e) => Err(e),
    };

    loop {
        match notices.try_recv() {
            Ok(notice) => eprintln!("{}", notice),
            Err(TryRecvError::Lagged(_)) => continue,
            Err(_) => break,
        }
    }

    let account = match session.connection_state() {
        ConnectionState::Connected { account } => account.map(|a| a.to_string()),
        ConnectionState::Disconnected => None,
    };
    let report = StatusReport::new(&session.snapshot(), account, &session.config().protocol);
    println!("{}", serde_json::to_string_pretty(&report)?);

    match result {
        Ok(Some(outcome)) => {
            tracing::info!(operation = %outcome.operation, tx_hash = %outcome.tx_hash, "Done");
            Ok(())
        }
        Ok(None) => Ok(()),
        Err(e) => Err(e.into()),
    }
}
