//! Shared in-memory chain for integration tests.
//!
//! `MockChain` decodes real ABI calldata, so every test also exercises the
//! `sol!` encoding used in production.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use alloy::primitives::{address, Address, Bytes, B256, U256};
use alloy::sol_types::{SolCall, SolInterface, SolValue};
use async_trait::async_trait;
use tokio::sync::Notify;

use cryptodev_ico::blockchain::contracts::{ICryptoDevToken, ICryptoDevsNft};
use cryptodev_ico::blockchain::{ContractCall, RpcError, RpcHandle, RpcResult, TxReceipt, WalletConnector};
use cryptodev_ico::config::{IcoConfig, ProtocolConfig};
use cryptodev_ico::DappSession;

pub const CHAIN_ID: u64 = 4;
pub const TOKEN: Address = address!("5FbDB2315678afecb367f032d93F642f64180aa3");
pub const NFT: Address = address!("e7f1725E7734CE288F8367e1Bb143E90bb3F0512");
pub const USER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
pub const OWNER: Address = address!("70997970C51812dc3A010C7d01b50e0d17dc79C8");
pub const STRANGER: Address = address!("3C44CdDdB6a900fa2b585dd299e03d12FA4293BC");

pub fn test_config() -> IcoConfig {
    let mut config = IcoConfig::default();
    config.network.chain_id = CHAIN_ID;
    config.contracts.token_address = TOKEN;
    config.contracts.certificate_address = NFT;
    config
}

pub fn protocol() -> ProtocolConfig {
    ProtocolConfig::default()
}

/// Whole tokens in base units.
pub fn tokens(n: u64) -> U256 {
    U256::from(n) * protocol().token_multiplier()
}

/// Contract state held by the mock.
#[derive(Debug, Clone)]
pub struct ChainState {
    pub chain_id: u64,
    /// (tokenId, holder) in mint order.
    pub certificates: Vec<(U256, Address)>,
    pub claimed: HashSet<U256>,
    pub balances: HashMap<Address, U256>,
    pub total_supply: U256,
    pub owner: Address,
    pub contract_ether: U256,
    /// Selectors whose reads fail.
    pub failing_reads: HashSet<[u8; 4]>,
    /// `tokenIdsClaimed(id)` fails for this id.
    pub failing_token_id: Option<U256>,
    pub reject_submissions: bool,
    pub revert_submissions: bool,
}

impl Default for ChainState {
    fn default() -> Self {
        Self {
            chain_id: CHAIN_ID,
            certificates: Vec::new(),
            claimed: HashSet::new(),
            balances: HashMap::new(),
            total_supply: U256::ZERO,
            owner: OWNER,
            contract_ether: U256::ZERO,
            failing_reads: HashSet::new(),
            failing_token_id: None,
            reject_submissions: false,
            revert_submissions: false,
        }
    }
}

impl ChainState {
    pub fn give_certificate(&mut self, token_id: u64, holder: Address, claimed: bool) {
        let id = U256::from(token_id);
        self.certificates.push((id, holder));
        if claimed {
            self.claimed.insert(id);
        }
    }

    fn owned_by(&self, holder: Address) -> Vec<U256> {
        self.certificates
            .iter()
            .filter(|(_, h)| *h == holder)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn credit(&mut self, account: Address, amount: U256) {
        *self.balances.entry(account).or_default() += amount;
        self.total_supply += amount;
    }
}

/// In-memory chain acting as both RPC handle and wallet connector.
pub struct MockChain {
    pub state: Mutex<ChainState>,
    account: Option<Address>,
    reads: Mutex<Vec<(Address, [u8; 4])>>,
    submissions: Mutex<Vec<ContractCall>>,
    tx_counter: AtomicU64,
    hold_submissions: AtomicBool,
    /// Signalled when a submission reaches the mock.
    pub submitted: Notify,
    /// Signal to let a held submission finish.
    pub release: Notify,
}

impl MockChain {
    pub fn new(account: Option<Address>) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(ChainState::default()),
            account,
            reads: Mutex::new(Vec::new()),
            submissions: Mutex::new(Vec::new()),
            tx_counter: AtomicU64::new(0),
            hold_submissions: AtomicBool::new(false),
            submitted: Notify::new(),
            release: Notify::new(),
        })
    }

    pub fn with_state(&self, f: impl FnOnce(&mut ChainState)) {
        f(&mut self.state.lock().unwrap());
    }

    pub fn snapshot(&self) -> ChainState {
        self.state.lock().unwrap().clone()
    }

    /// Park submissions until `release` is notified.
    pub fn hold_submissions(&self, hold: bool) {
        self.hold_submissions.store(hold, Ordering::SeqCst);
    }

    pub fn reads_of(&self, selector: [u8; 4]) -> usize {
        self.reads
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, s)| *s == selector)
            .count()
    }

    pub fn read_count(&self) -> usize {
        self.reads.lock().unwrap().len()
    }

    pub fn submissions(&self) -> Vec<ContractCall> {
        self.submissions.lock().unwrap().clone()
    }

    fn next_hash(&self) -> B256 {
        let n = self.tx_counter.fetch_add(1, Ordering::SeqCst) + 1;
        B256::left_padding_from(&n.to_be_bytes())
    }

    fn read_token(&self, state: &ChainState, input: &[u8]) -> RpcResult<Vec<u8>> {
        use ICryptoDevToken::ICryptoDevTokenCalls as Calls;
        let call = Calls::abi_decode(input).map_err(|e| RpcError::Decode(e.to_string()))?;
        Ok(match call {
            Calls::balanceOf(c) => state
                .balances
                .get(&c.account)
                .copied()
                .unwrap_or_default()
                .abi_encode(),
            Calls::totalSupply(_) => state.total_supply.abi_encode(),
            Calls::owner(_) => state.owner.abi_encode(),
            Calls::tokenIdsClaimed(c) => {
                if state.failing_token_id == Some(c.tokenId) {
                    return Err(RpcError::Transport("injected lookup failure".into()));
                }
                state.claimed.contains(&c.tokenId).abi_encode()
            }
            _ => return Err(RpcError::Transport("not a view function".into())),
        })
    }

    fn read_nft(&self, state: &ChainState, input: &[u8]) -> RpcResult<Vec<u8>> {
        use ICryptoDevsNft::ICryptoDevsNftCalls as Calls;
        let call = Calls::abi_decode(input).map_err(|e| RpcError::Decode(e.to_string()))?;
        Ok(match call {
            Calls::balanceOf(c) => U256::from(state.owned_by(c.account).len()).abi_encode(),
            Calls::tokenOfOwnerByIndex(c) => {
                let owned = state.owned_by(c.account);
                let index: usize = c.index.to();
                match owned.get(index) {
                    Some(id) => id.abi_encode(),
                    None => return Err(RpcError::Transport("owner index out of bounds".into())),
                }
            }
        })
    }

    /// Apply a transaction; `false` means it reverted.
    fn execute(&self, state: &mut ChainState, from: Address, call: &ContractCall) -> bool {
        use ICryptoDevToken::ICryptoDevTokenCalls as Calls;
        if call.to != TOKEN || state.revert_submissions {
            return false;
        }
        let Ok(decoded) = Calls::abi_decode(&call.input) else {
            return false;
        };
        let protocol = protocol();
        match decoded {
            Calls::mint(c) => {
                let minted = c.amount * protocol.token_multiplier();
                if protocol.mint_value(c.amount) != Some(call.value)
                    || state.total_supply + minted > protocol.max_supply()
                {
                    return false;
                }
                state.contract_ether += call.value;
                state.credit(from, minted);
                true
            }
            Calls::claim(_) => {
                let unclaimed: Vec<U256> = state
                    .owned_by(from)
                    .into_iter()
                    .filter(|id| !state.claimed.contains(id))
                    .collect();
                if unclaimed.is_empty() {
                    return false;
                }
                let per_certificate = U256::from(protocol.tokens_per_certificate);
                for id in &unclaimed {
                    state.claimed.insert(*id);
                }
                let amount = U256::from(unclaimed.len())
                    * per_certificate
                    * protocol.token_multiplier();
                state.credit(from, amount);
                true
            }
            Calls::withdraw(_) => {
                if from != state.owner {
                    return false;
                }
                state.contract_ether = U256::ZERO;
                true
            }
            _ => false,
        }
    }
}

#[async_trait]
impl RpcHandle for MockChain {
    async fn chain_id(&self) -> RpcResult<u64> {
        Ok(self.state.lock().unwrap().chain_id)
    }

    fn account(&self) -> Option<Address> {
        self.account
    }

    async fn call(&self, call: ContractCall) -> RpcResult<Bytes> {
        let selector: [u8; 4] = call
            .input
            .get(..4)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(|| RpcError::Decode("missing selector".into()))?;
        self.reads.lock().unwrap().push((call.to, selector));

        // Let concurrent lookups interleave.
        tokio::task::yield_now().await;

        let state = self.state.lock().unwrap().clone();
        if state.failing_reads.contains(&selector) {
            return Err(RpcError::Transport("injected read failure".into()));
        }
        let output = if call.to == TOKEN {
            self.read_token(&state, &call.input)?
        } else if call.to == NFT {
            self.read_nft(&state, &call.input)?
        } else {
            return Err(RpcError::Transport(format!("no contract at {}", call.to)));
        };
        Ok(output.into())
    }

    async fn submit(&self, call: ContractCall) -> RpcResult<TxReceipt> {
        let from = self
            .account
            .ok_or_else(|| RpcError::Wallet("no signing account".into()))?;
        self.submissions.lock().unwrap().push(call.clone());

        if self.hold_submissions.load(Ordering::SeqCst) {
            self.submitted.notify_one();
            self.release.notified().await;
        }

        let mut state = self.state.lock().unwrap();
        if state.reject_submissions {
            return Err(RpcError::Rejected("user rejected transaction".into()));
        }
        let success = self.execute(&mut state, from, &call);
        Ok(TxReceipt {
            tx_hash: self.next_hash(),
            block_number: Some(100 + self.tx_counter.load(Ordering::SeqCst)),
            success,
        })
    }
}

/// Connector handing out the shared mock.
pub struct MockConnector(pub Arc<MockChain>);

#[async_trait]
impl WalletConnector for MockConnector {
    async fn connect(&self) -> RpcResult<Arc<dyn RpcHandle>> {
        let rpc: Arc<dyn RpcHandle> = self.0.clone();
        Ok(rpc)
    }
}

/// Connector that never connects.
pub struct RefusingConnector;

#[async_trait]
impl WalletConnector for RefusingConnector {
    async fn connect(&self) -> RpcResult<Arc<dyn RpcHandle>> {
        Err(RpcError::Rejected("user closed the wallet prompt".into()))
    }
}

pub fn session(chain: &Arc<MockChain>) -> DappSession {
    DappSession::new(test_config(), Arc::new(MockConnector(chain.clone())))
}

pub fn selector<C: SolCall>() -> [u8; 4] {
    C::SELECTOR
}
