//! Mint, claim and withdraw.
//!
//! # Ordering
//! 1. Preconditions (amount, value, not in flight), before any remote call
//! 2. Resolve signing handle (validates network)
//! 3. Withdraw only: ownership query
//! 4. Acquire the single-flight lock (`loading = true`)
//! 5. Submit and await receipt
//! 6. On failure: release the lock, nothing else changes
//! 7. On success: re-read, then release the lock and commit the values in
//!    one snapshot, then publish the notice

use std::sync::Arc;

use alloy::primitives::U256;
use tracing::Instrument;
use uuid::Uuid;

use crate::blockchain::contracts::TokenContract;
use crate::blockchain::rpc::TxReceipt;
use crate::blockchain::types::{RpcError, RpcResult};
use crate::config::{ContractsConfig, ProtocolConfig};
use crate::error::{ClientError, ClientResult, PreconditionError};
use crate::network::{ProviderResolver, ResolvedHandle};
use crate::observability::metrics;
use crate::orchestrator::refresh::StateRefresher;
use crate::orchestrator::{Operation, TxOutcome};
use crate::state::{AggregateStateStore, Notice, Notifier};

/// Executes token-contract transactions one at a time.
pub struct TransactionOrchestrator {
    resolver: Arc<ProviderResolver>,
    refresher: Arc<StateRefresher>,
    store: AggregateStateStore,
    notifier: Notifier,
    contracts: ContractsConfig,
    protocol: ProtocolConfig,
}

impl TransactionOrchestrator {
    pub fn new(
        resolver: Arc<ProviderResolver>,
        refresher: Arc<StateRefresher>,
        store: AggregateStateStore,
        notifier: Notifier,
        contracts: ContractsConfig,
        protocol: ProtocolConfig,
    ) -> Self {
        Self {
            resolver,
            refresher,
            store,
            notifier,
            contracts,
            protocol,
        }
    }

    /// Mint `amount` whole tokens, paying `unit_price × amount`.
    pub async fn mint(&self, amount: U256) -> ClientResult<TxOutcome> {
        if amount.is_zero() {
            return Err(PreconditionError::ZeroAmount.into());
        }
        self.ensure_idle()?;

        let value = self
            .protocol
            .mint_value(amount)
            .ok_or(PreconditionError::AmountTooLarge)?;
        let handle = self.resolver.resolve(true).await?;
        tracing::info!(amount = %amount, value_wei = %value, "Minting tokens");

        self.submit(Operation::Mint, &handle, |token| async move {
            token.mint(amount, value).await
        })
        .await
    }

    /// Claim tokens for every unclaimed certificate held.
    pub async fn claim(&self) -> ClientResult<TxOutcome> {
        self.ensure_idle()?;
        let handle = self.resolver.resolve(true).await?;

        self.submit(Operation::Claim, &handle, |token| async move {
            token.claim().await
        })
        .await
    }

    /// Withdraw contract funds. Owner only.
    pub async fn withdraw(&self) -> ClientResult<TxOutcome> {
        self.ensure_idle()?;
        let handle = self.resolver.resolve(true).await?;

        let account = handle.account().ok_or_else(|| {
            ClientError::Connection("connected wallet has no signing account".to_string())
        })?;
        let owner = self
            .token(&handle)
            .owner()
            .await
            .map_err(ClientError::read)?;
        if owner != account {
            tracing::warn!(account = %account, owner = %owner, "Withdraw refused");
            return Err(PreconditionError::NotOwner.into());
        }

        self.submit(Operation::Withdraw, &handle, |token| async move {
            token.withdraw().await
        })
        .await
    }

    fn ensure_idle(&self) -> ClientResult<()> {
        if self.store.is_loading() {
            return Err(PreconditionError::AlreadyInFlight.into());
        }
        Ok(())
    }

    fn token<'a>(&self, handle: &'a ResolvedHandle) -> TokenContract<'a> {
        TokenContract::new(handle.rpc(), self.contracts.token_address)
    }

    async fn submit<'a, F, Fut>(
        &self,
        operation: Operation,
        handle: &'a ResolvedHandle,
        send: F,
    ) -> ClientResult<TxOutcome>
    where
        F: FnOnce(TokenContract<'a>) -> Fut,
        Fut: std::future::Future<Output = RpcResult<TxReceipt>> + 'a,
    {
        let attempt_id = Uuid::new_v4();
        let span = tracing::info_span!("transaction", %operation, %attempt_id);

        let flight = self
            .store
            .try_begin_flight()
            .ok_or(PreconditionError::AlreadyInFlight)?;
        let result = send(self.token(handle)).instrument(span.clone()).await;

        let receipt = match result {
            Ok(receipt) if receipt.success => receipt,
            Ok(receipt) => {
                drop(flight);
                return Err(span.in_scope(|| self.fail(operation, RpcError::Reverted(receipt.tx_hash))));
            }
            Err(e) => {
                drop(flight);
                return Err(span.in_scope(|| self.fail(operation, e)));
            }
        };

        span.in_scope(|| {
            metrics::record_transaction(operation.as_str(), true);
            tracing::info!(
                tx_hash = %receipt.tx_hash,
                block_number = ?receipt.block_number,
                "Transaction confirmed"
            );
        });

        // Still loading while re-reading, so no idle snapshot carries
        // pre-transaction figures.
        let refreshed = self
            .refresher
            .read(operation.refresh_scope())
            .instrument(span)
            .await
            .unwrap_or_default();
        flight.finish(refreshed);

        self.notifier.publish(Notice::TransactionConfirmed {
            operation,
            tx_hash: receipt.tx_hash,
        });

        Ok(TxOutcome {
            operation,
            tx_hash: receipt.tx_hash,
            block_number: receipt.block_number,
        })
    }

    fn fail(&self, operation: Operation, err: RpcError) -> ClientError {
        metrics::record_transaction(operation.as_str(), false);
        tracing::error!(error = %err, "Transaction failed");
        self.notifier.publish(Notice::TransactionFailed {
            operation,
            reason: err.to_string(),
        });
        ClientError::transaction(err)
    }
}
