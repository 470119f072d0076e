//! Session facade.
//!
//! Wires the components together and exposes exactly the operations the
//! presentation layer needs: connect, refresh, mint, claim, withdraw, and
//! the two observation channels.

use std::sync::Arc;

use alloy::primitives::U256;
use tokio::sync::{broadcast, watch};

use crate::blockchain::connector::WalletConnector;
use crate::config::IcoConfig;
use crate::eligibility::EligibilityEngine;
use crate::error::ClientResult;
use crate::network::{ConnectionState, NetworkGuard, ProviderResolver};
use crate::orchestrator::{RefreshScope, StateRefresher, TransactionOrchestrator, TxOutcome};
use crate::state::{AggregateState, AggregateStateStore, Notice, Notifier};

/// One connected user session.
#[derive(Clone)]
pub struct DappSession {
    config: Arc<IcoConfig>,
    resolver: Arc<ProviderResolver>,
    eligibility: Arc<EligibilityEngine>,
    refresher: Arc<StateRefresher>,
    orchestrator: Arc<TransactionOrchestrator>,
    store: AggregateStateStore,
    notifier: Notifier,
}

impl DappSession {
    pub fn new(config: IcoConfig, connector: Arc<dyn WalletConnector>) -> Self {
        let store = AggregateStateStore::new();
        let notifier = Notifier::default();

        let resolver = Arc::new(ProviderResolver::new(
            connector,
            NetworkGuard::new(config.network.chain_id),
            notifier.clone(),
        ));
        let eligibility = Arc::new(EligibilityEngine::new(
            Arc::clone(&resolver),
            config.contracts.clone(),
            &config.eligibility,
        ));
        let refresher = Arc::new(StateRefresher::new(
            Arc::clone(&resolver),
            Arc::clone(&eligibility),
            config.contracts.clone(),
            store.clone(),
        ));
        let orchestrator = Arc::new(TransactionOrchestrator::new(
            Arc::clone(&resolver),
            Arc::clone(&refresher),
            store.clone(),
            notifier.clone(),
            config.contracts.clone(),
            config.protocol.clone(),
        ));

        Self {
            config: Arc::new(config),
            resolver,
            eligibility,
            refresher,
            orchestrator,
            store,
            notifier,
        }
    }

    pub fn config(&self) -> &IcoConfig {
        &self.config
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.resolver.state()
    }

    /// Connect the wallet, then load everything the UI shows.
    ///
    /// `wallet_connected` is published together with the loaded values.
    /// On failure the store is left as it was.
    pub async fn connect_wallet(&self) -> ClientResult<ConnectionState> {
        let state = self.resolver.connect().await?;
        let mut refreshed = self
            .refresher
            .read(RefreshScope::Full)
            .await
            .unwrap_or_default();
        refreshed.wallet_connected = Some(true);
        self.store.commit(refreshed);
        Ok(state)
    }

    /// Drop the connection and everything read for its account.
    pub fn disconnect(&self) {
        self.resolver.disconnect();
        self.store.reset();
    }

    /// Re-read every value from the chain.
    pub async fn refresh(&self) {
        self.refresher.refresh(RefreshScope::Full).await;
    }

    /// Unclaimed certificates of the connected account, zero if unknown.
    pub async fn claimable_certificates(&self) -> U256 {
        match self.resolver.state() {
            ConnectionState::Connected {
                account: Some(account),
            } => self.eligibility.compute_claimable(account).await,
            _ => U256::ZERO,
        }
    }

    pub async fn mint(&self, amount: U256) -> ClientResult<TxOutcome> {
        self.orchestrator.mint(amount).await
    }

    pub async fn claim(&self) -> ClientResult<TxOutcome> {
        self.orchestrator.claim().await
    }

    pub async fn withdraw(&self) -> ClientResult<TxOutcome> {
        self.orchestrator.withdraw().await
    }

    pub fn snapshot(&self) -> AggregateState {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<AggregateState> {
        self.store.subscribe()
    }

    pub fn notices(&self) -> broadcast::Receiver<Notice> {
        self.notifier.subscribe()
    }
}

impl std::fmt::Debug for DappSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DappSession")
            .field("resolver", &self.resolver)
            .field("store", &self.store)
            .finish()
    }
}
