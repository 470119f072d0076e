//! Aggregate state store.
//!
//! Holds the one externally observable snapshot. Every mutation goes
//! through `AggregateStateStore::mutate`, which runs under the watch
//! channel's write lock, so observers only ever see whole snapshots.
//!
//! # Loading flag
//! ```text
//! loading=false --try_begin_flight------> loading=true (FlightGuard alive)
//! loading=true  --FlightGuard::finish---> loading=false + refreshed values
//! loading=true  --FlightGuard drop------> loading=false (failure, nothing else changes)
//! ```
//! The flag doubles as the single-flight lock: `try_begin_flight` is a
//! compare-and-set, so two racing operations cannot both acquire it.

use std::sync::Arc;

use alloy::primitives::U256;
use serde::Serialize;
use tokio::sync::watch;

use crate::config::ProtocolConfig;

/// Reconciled client state consumed by the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregateState {
    pub wallet_connected: bool,
    pub is_owner: bool,
    pub loading: bool,
    /// Unclaimed certificates held by the connected account.
    pub tokens_to_be_claimed: U256,
    /// Token balance of the connected account, in base units.
    pub balance: U256,
    /// Token total supply, in base units.
    pub total_minted: U256,
}

/// The single action a user can take from a given state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailableAction {
    Connect,
    /// A transaction is in flight.
    Wait,
    Withdraw,
    Claim,
    Mint,
}

impl AggregateState {
    /// Tokens the account would receive by claiming now, in base units.
    pub fn claimable_token_amount(&self, protocol: &ProtocolConfig) -> U256 {
        self.tokens_to_be_claimed
            .saturating_mul(U256::from(protocol.tokens_per_certificate))
            .saturating_mul(protocol.token_multiplier())
    }

    /// Supply still available for minting, in base units.
    pub fn remaining_supply(&self, protocol: &ProtocolConfig) -> U256 {
        protocol.max_supply().saturating_sub(self.total_minted)
    }

    /// What to offer next. Owners are offered withdraw even when they
    /// also hold unclaimed certificates.
    pub fn available_action(&self) -> AvailableAction {
        if !self.wallet_connected {
            AvailableAction::Connect
        } else if self.loading {
            AvailableAction::Wait
        } else if self.is_owner {
            AvailableAction::Withdraw
        } else if !self.tokens_to_be_claimed.is_zero() {
            AvailableAction::Claim
        } else {
            AvailableAction::Mint
        }
    }
}

/// Values read back from the chain during one refresh cycle.
///
/// `None` leaves the current value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Refreshed {
    pub wallet_connected: Option<bool>,
    pub balance: Option<U256>,
    pub total_minted: Option<U256>,
    pub tokens_to_be_claimed: Option<U256>,
    pub is_owner: Option<bool>,
}

impl Refreshed {
    fn apply(self, state: &mut AggregateState) {
        if let Some(connected) = self.wallet_connected {
            state.wallet_connected = connected;
        }
        if let Some(balance) = self.balance {
            state.balance = balance;
        }
        if let Some(total) = self.total_minted {
            state.total_minted = total;
        }
        if let Some(count) = self.tokens_to_be_claimed {
            state.tokens_to_be_claimed = count;
        }
        if let Some(owner) = self.is_owner {
            state.is_owner = owner;
        }
    }
}

/// Single-writer holder of the `AggregateState` snapshot.
#[derive(Clone)]
pub struct AggregateStateStore {
    tx: Arc<watch::Sender<AggregateState>>,
}

impl AggregateStateStore {
    pub fn new() -> Self {
        Self {
            tx: Arc::new(watch::Sender::new(AggregateState::default())),
        }
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> AggregateState {
        self.tx.borrow().clone()
    }

    /// Observe snapshots. Each observed value is a complete state.
    pub fn subscribe(&self) -> watch::Receiver<AggregateState> {
        self.tx.subscribe()
    }

    /// True while a transaction is in flight.
    pub fn is_loading(&self) -> bool {
        self.tx.borrow().loading
    }

    /// The single mutation entry point. Observers are notified only when
    /// `f` actually changed something; `f` returns whether to proceed.
    fn mutate<F>(&self, f: F) -> bool
    where
        F: FnOnce(&mut AggregateState) -> bool,
    {
        let mut applied = false;
        self.tx.send_if_modified(|state| {
            let before = state.clone();
            applied = f(state);
            *state != before
        });
        applied
    }

    /// Commit one refresh cycle as a single snapshot.
    pub(crate) fn commit(&self, refreshed: Refreshed) {
        self.mutate(|state| {
            refreshed.apply(state);
            true
        });
    }

    /// Forget everything read for the previous account. An in-flight
    /// transaction keeps its `loading` flag.
    pub(crate) fn reset(&self) {
        self.mutate(|state| {
            *state = AggregateState {
                loading: state.loading,
                ..Default::default()
            };
            true
        });
    }

    /// Acquire the single-flight lock, setting `loading = true`.
    ///
    /// Returns `None` if another transaction already holds it.
    pub(crate) fn try_begin_flight(&self) -> Option<FlightGuard> {
        let acquired = self.mutate(|state| {
            if state.loading {
                return false;
            }
            state.loading = true;
            true
        });
        acquired.then(|| FlightGuard {
            store: Some(self.clone()),
        })
    }
}

impl Default for AggregateStateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AggregateStateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AggregateStateStore")
            .field("state", &*self.tx.borrow())
            .finish()
    }
}

/// Held for the lifetime of one transaction, through its refresh.
///
/// Dropping it clears `loading` alone; `finish` clears it together with
/// the refreshed values.
#[derive(Debug)]
pub(crate) struct FlightGuard {
    store: Option<AggregateStateStore>,
}

impl FlightGuard {
    /// Release the lock and commit `refreshed` as one snapshot.
    pub(crate) fn finish(mut self, refreshed: Refreshed) {
        if let Some(store) = self.store.take() {
            store.mutate(|state| {
                refreshed.apply(state);
                state.loading = false;
                true
            });
        }
    }
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        if let Some(store) = self.store.take() {
            store.mutate(|state| {
                state.loading = false;
                true
            });
        }
    }
}
