//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment Variables (private key) + NetworkConfig
//!     → wallet.rs (key loading)
//!     → connector.rs (WalletConnector::connect)
//!     → client.rs (AlloyRpc: reads with timeouts, submit + await receipt)
//!     → rpc.rs (RpcHandle trait, the only surface components see)
//!     → contracts.rs (sol! ABI, typed token / certificate views)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - Reads have configurable timeouts; confirmation waits do not

pub mod client;
pub mod connector;
pub mod contracts;
pub mod rpc;
pub mod types;
pub mod wallet;

pub use client::AlloyRpc;
pub use connector::{LocalWalletConnector, WalletConnector};
pub use contracts::{CertificateContract, TokenContract};
pub use rpc::{ContractCall, RpcHandle, TxReceipt};
pub use types::{ChainId, RpcError, RpcResult};
pub use wallet::Wallet;
