//! Claimable-certificate computation.
//!
//! # Algorithm
//! ```text
//! N = certificates.balanceOf(account)
//! N == 0 → 0, no further calls
//! fan out i in [0, N):
//!     tokenId   = certificates.tokenOfOwnerByIndex(account, i)
//!     claimed   = token.tokenIdsClaimed(tokenId)
//! fan in: sum of !claimed (order independent)
//! ```
//! Any failed lookup aborts the whole scan; a partial count is never
//! returned.

use std::sync::Arc;

use alloy::primitives::{Address, U256};
use futures_util::stream::{self, StreamExt, TryStreamExt};

use crate::blockchain::contracts::{CertificateContract, TokenContract};
use crate::blockchain::rpc::RpcHandle;
use crate::blockchain::types::{RpcError, RpcResult};
use crate::config::{ContractsConfig, EligibilityConfig};
use crate::error::{ClientError, ClientResult};
use crate::network::ProviderResolver;
use crate::observability::metrics;

/// Computes how many of an account's certificates are still unclaimed.
pub struct EligibilityEngine {
    resolver: Arc<ProviderResolver>,
    contracts: ContractsConfig,
    max_concurrent_lookups: usize,
}

impl EligibilityEngine {
    pub fn new(
        resolver: Arc<ProviderResolver>,
        contracts: ContractsConfig,
        config: &EligibilityConfig,
    ) -> Self {
        Self {
            resolver,
            contracts,
            max_concurrent_lookups: config.max_concurrent_lookups.max(1),
        }
    }

    /// Unclaimed certificate count, or zero if any step fails.
    ///
    /// Failures are logged and swallowed; callers cannot tell "zero" from
    /// "unknown", which is the intended degradation.
    pub async fn compute_claimable(&self, account: Address) -> U256 {
        match self.try_compute_claimable(account).await {
            Ok(count) => {
                metrics::record_claimable(count.saturating_to::<u64>() as f64);
                count
            }
            Err(e) => {
                tracing::warn!(account = %account, error = %e, "Claimable scan failed, reporting zero");
                U256::ZERO
            }
        }
    }

    /// Unclaimed certificate count, surfacing the first failure.
    pub async fn try_compute_claimable(&self, account: Address) -> ClientResult<U256> {
        let handle = self.resolver.resolve(false).await?;
        count_unclaimed(
            handle.rpc(),
            &self.contracts,
            account,
            self.max_concurrent_lookups,
        )
        .await
        .map_err(ClientError::read)
    }
}

/// Scan `account`'s certificates with at most `limit` lookups in flight.
pub async fn count_unclaimed(
    rpc: &dyn RpcHandle,
    contracts: &ContractsConfig,
    account: Address,
    limit: usize,
) -> RpcResult<U256> {
    let certificates = CertificateContract::new(rpc, contracts.certificate_address);
    let token = TokenContract::new(rpc, contracts.token_address);

    let held = certificates.balance_of(account).await?;
    if held.is_zero() {
        return Ok(U256::ZERO);
    }
    let held: u64 = held
        .try_into()
        .map_err(|_| RpcError::Decode(format!("certificate count {} out of range", held)))?;

    tracing::debug!(account = %account, certificates = held, "Scanning certificates");
    metrics::record_certificate_lookups(held);

    stream::iter(0..held)
        .map(|index| async move {
            let token_id = certificates
                .token_of_owner_by_index(account, U256::from(index))
                .await?;
            let claimed = token.token_ids_claimed(token_id).await?;
            Ok::<_, RpcError>(!claimed)
        })
        .buffer_unordered(limit.max(1))
        .try_fold(U256::ZERO, |total, unclaimed| async move {
            Ok(if unclaimed { total + U256::from(1) } else { total })
        })
        .await
}
