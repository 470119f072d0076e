//! Client-side orchestration for the CryptoDevs token ICO.
//!
//! Connects a wallet, works out how many certificate-backed tokens the
//! account can claim, and drives mint / claim / withdraw against the
//! token contract while keeping one consistent state snapshot.

pub mod blockchain;
pub mod config;
pub mod eligibility;
pub mod error;
pub mod network;
pub mod observability;
pub mod orchestrator;
pub mod session;
pub mod state;

pub use config::IcoConfig;
pub use error::{ClientError, ClientResult, PreconditionError};
pub use session::DappSession;
pub use state::{AggregateState, Notice};
