//! State refresh.
//!
//! Reads are issued one after another, each degrading independently, and
//! the results land in the store as a single snapshot, either on their own
//! (`refresh`) or folded into the caller's transition (`read`).

use std::sync::Arc;

use alloy::primitives::{Address, U256};

use crate::blockchain::contracts::TokenContract;
use crate::blockchain::types::RpcResult;
use crate::config::ContractsConfig;
use crate::eligibility::EligibilityEngine;
use crate::network::ProviderResolver;
use crate::state::{AggregateStateStore, Refreshed};

/// Which values a refresh re-reads. Balance and total minted always are.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshScope {
    /// Everything, including claimable count and owner status.
    Full,
    /// Balance, total minted and claimable count.
    Claimable,
    /// Balance, total minted and owner status.
    Ownership,
}

impl RefreshScope {
    fn claimable(self) -> bool {
        matches!(self, RefreshScope::Full | RefreshScope::Claimable)
    }

    fn ownership(self) -> bool {
        matches!(self, RefreshScope::Full | RefreshScope::Ownership)
    }
}

/// Re-reads chain state into the store.
pub struct StateRefresher {
    resolver: Arc<ProviderResolver>,
    eligibility: Arc<EligibilityEngine>,
    contracts: ContractsConfig,
    store: AggregateStateStore,
}

impl StateRefresher {
    pub fn new(
        resolver: Arc<ProviderResolver>,
        eligibility: Arc<EligibilityEngine>,
        contracts: ContractsConfig,
        store: AggregateStateStore,
    ) -> Self {
        Self {
            resolver,
            eligibility,
            contracts,
            store,
        }
    }

    /// Refresh `scope` and commit the result.
    ///
    /// If no handle can be resolved the store is left untouched.
    pub async fn refresh(&self, scope: RefreshScope) {
        if let Some(refreshed) = self.read(scope).await {
            tracing::debug!(?scope, ?refreshed, "Committing refreshed state");
            self.store.commit(refreshed);
        }
    }

    /// Read `scope` without committing, for callers that publish the
    /// values together with their own state change.
    ///
    /// `None` when no handle can be resolved.
    pub async fn read(&self, scope: RefreshScope) -> Option<Refreshed> {
        let handle = match self.resolver.resolve(false).await {
            Ok(handle) => handle,
            Err(e) => {
                tracing::warn!(error = %e, ?scope, "Refresh skipped");
                return None;
            }
        };
        let token = TokenContract::new(handle.rpc(), self.contracts.token_address);
        let account = handle.account();

        let mut refreshed = Refreshed {
            // Keep the last known supply on failure; it never decreases.
            total_minted: degrade(token.total_supply().await, "totalSupply"),
            ..Default::default()
        };

        refreshed.balance = Some(match account {
            Some(account) => degrade(token.balance_of(account).await, "balanceOf").unwrap_or_default(),
            None => U256::ZERO,
        });

        if scope.claimable() {
            refreshed.tokens_to_be_claimed = Some(match account {
                Some(account) => self.eligibility.compute_claimable(account).await,
                None => U256::ZERO,
            });
        }

        if scope.ownership() {
            refreshed.is_owner = Some(match account {
                Some(account) => is_owner(&token, account).await,
                None => false,
            });
        }

        Some(refreshed)
    }
}

async fn is_owner(token: &TokenContract<'_>, account: Address) -> bool {
    degrade(token.owner().await, "owner")
        .map(|owner| owner == account)
        .unwrap_or(false)
}

fn degrade<T>(result: RpcResult<T>, call: &'static str) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(call, error = %e, "Contract read failed, using fallback");
            None
        }
    }
}
