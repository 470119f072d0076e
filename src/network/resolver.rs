//! Provider resolution.
//!
//! # States
//! ```text
//! Disconnected --connect() ok--> Connected
//! Disconnected --connect() err-> Disconnected (typed error, notice on wrong chain)
//! Connected    --disconnect()--> Disconnected
//! ```
//!
//! `resolve` re-checks the chain on every call, since the wallet can
//! switch networks between operations.

use std::sync::Arc;

use alloy::primitives::Address;
use arc_swap::ArcSwapOption;

use crate::blockchain::connector::WalletConnector;
use crate::blockchain::rpc::RpcHandle;
use crate::blockchain::types::ChainId;
use crate::error::{ClientError, ClientResult};
use crate::network::guard::NetworkGuard;
use crate::state::{Notice, Notifier};

/// Observable connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connected { account: Option<Address> },
}

/// A handle cleared by the network guard.
#[derive(Clone)]
pub enum ResolvedHandle {
    /// Read-only access.
    Read(Arc<dyn RpcHandle>),
    /// Signing access bound to `account`.
    Signing {
        rpc: Arc<dyn RpcHandle>,
        account: Address,
    },
}

impl ResolvedHandle {
    pub fn rpc(&self) -> &dyn RpcHandle {
        match self {
            ResolvedHandle::Read(rpc) => rpc.as_ref(),
            ResolvedHandle::Signing { rpc, .. } => rpc.as_ref(),
        }
    }

    /// The connected account, if known. Read handles report it when the
    /// underlying connection has one.
    pub fn account(&self) -> Option<Address> {
        match self {
            ResolvedHandle::Read(rpc) => rpc.account(),
            ResolvedHandle::Signing { account, .. } => Some(*account),
        }
    }
}

impl std::fmt::Debug for ResolvedHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolvedHandle::Read(_) => f.write_str("ResolvedHandle::Read"),
            ResolvedHandle::Signing { account, .. } => f
                .debug_struct("ResolvedHandle::Signing")
                .field("account", account)
                .finish(),
        }
    }
}

struct Connection {
    rpc: Arc<dyn RpcHandle>,
}

/// Produces read-only or signing handles for the other components.
pub struct ProviderResolver {
    connector: Arc<dyn WalletConnector>,
    guard: NetworkGuard,
    notifier: Notifier,
    connection: ArcSwapOption<Connection>,
}

impl ProviderResolver {
    pub fn new(connector: Arc<dyn WalletConnector>, guard: NetworkGuard, notifier: Notifier) -> Self {
        Self {
            connector,
            guard,
            notifier,
            connection: ArcSwapOption::empty(),
        }
    }

    pub fn expected_chain(&self) -> ChainId {
        self.guard.expected()
    }

    pub fn state(&self) -> ConnectionState {
        match self.connection.load().as_ref() {
            Some(conn) => ConnectionState::Connected {
                account: conn.rpc.account(),
            },
            None => ConnectionState::Disconnected,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connection.load().is_some()
    }

    /// Disconnected → Connected handshake.
    ///
    /// The chain is validated before the connection is recorded, so a
    /// wrong-network wallet never becomes Connected.
    pub async fn connect(&self) -> ClientResult<ConnectionState> {
        let rpc = self
            .connector
            .connect()
            .await
            .map_err(|e| ClientError::Connection(e.to_string()))?;

        self.validate(rpc.as_ref()).await?;

        let account = rpc.account();
        self.connection.store(Some(Arc::new(Connection { rpc })));
        tracing::info!(
            chain_id = %self.guard.expected(),
            account = ?account,
            "Wallet connected"
        );
        Ok(ConnectionState::Connected { account })
    }

    pub fn disconnect(&self) {
        if self.connection.swap(None).is_some() {
            tracing::info!("Wallet disconnected");
        }
    }

    /// Resolve a handle, validating the network first.
    ///
    /// Fails with `Connection` if no connection has been made, or if a
    /// signer is requested and the connection cannot sign.
    pub async fn resolve(&self, needs_signer: bool) -> ClientResult<ResolvedHandle> {
        let rpc = match self.connection.load_full() {
            Some(conn) => Arc::clone(&conn.rpc),
            None => {
                return Err(ClientError::Connection(
                    "wallet connector has not completed connection".to_string(),
                ))
            }
        };

        self.validate(rpc.as_ref()).await?;

        if !needs_signer {
            return Ok(ResolvedHandle::Read(rpc));
        }

        match rpc.account() {
            Some(account) => Ok(ResolvedHandle::Signing { rpc, account }),
            None => Err(ClientError::Connection(
                "connected wallet has no signing account".to_string(),
            )),
        }
    }

    async fn validate(&self, rpc: &dyn RpcHandle) -> ClientResult<()> {
        let result = self.guard.validate_network(rpc).await;
        if let Err(ClientError::WrongNetwork { expected, actual }) = &result {
            tracing::warn!(expected, actual, "Wallet is on the wrong network");
            self.notifier.publish(Notice::WrongNetwork {
                expected: *expected,
                actual: *actual,
            });
        }
        result
    }
}

impl std::fmt::Debug for ProviderResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderResolver")
            .field("expected_chain", &self.guard.expected())
            .field("state", &self.state())
            .finish()
    }
}
