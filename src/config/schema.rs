//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client.
//! All types derive Serde traits for deserialization from config files.

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// Root configuration for the ICO client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct IcoConfig {
    /// RPC endpoint and expected chain.
    pub network: NetworkConfig,

    /// Deployed contract addresses.
    pub contracts: ContractsConfig,

    /// Protocol constants baked into the token contract.
    pub protocol: ProtocolConfig,

    /// Certificate scan settings.
    pub eligibility: EligibilityConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Network configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Chain ID the contracts are deployed on (4 = Rinkeby).
    pub chain_id: u64,

    /// Timeout for read calls in seconds. Never applied to confirmation.
    pub rpc_timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            chain_id: 4,
            rpc_timeout_secs: 10,
        }
    }
}

/// Deployed contract addresses.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ContractsConfig {
    /// Fungible token contract (mint / claim / withdraw).
    pub token_address: Address,

    /// Certificate (NFT) contract whose holders may claim.
    pub certificate_address: Address,
}

/// Fixed protocol constants.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProtocolConfig {
    /// Native-currency price of one token, in wei.
    pub unit_price_wei: u128,

    /// Tokens granted per unclaimed certificate.
    pub tokens_per_certificate: u64,

    /// Token decimals; minting `n` tokens raises supply by `n * 10^decimals`.
    pub token_decimals: u8,

    /// Supply cap in whole tokens.
    pub max_supply_tokens: u64,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            unit_price_wei: 1_000_000_000_000_000, // 0.001 ETH
            tokens_per_certificate: 10,
            token_decimals: 18,
            max_supply_tokens: 10_000,
        }
    }
}

impl ProtocolConfig {
    /// Base units per whole token (`10^decimals`).
    pub fn token_multiplier(&self) -> U256 {
        U256::from(10u64).pow(U256::from(self.token_decimals))
    }

    /// Payable value for minting `amount` tokens, `None` on overflow.
    pub fn mint_value(&self, amount: U256) -> Option<U256> {
        U256::from(self.unit_price_wei).checked_mul(amount)
    }

    /// Supply cap in base units.
    pub fn max_supply(&self) -> U256 {
        U256::from(self.max_supply_tokens).saturating_mul(self.token_multiplier())
    }
}

/// Certificate scan configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EligibilityConfig {
    /// Upper bound on concurrent per-certificate lookups.
    pub max_concurrent_lookups: usize,
}

impl Default for EligibilityConfig {
    fn default() -> Self {
        Self {
            max_concurrent_lookups: 8,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Record metrics through the `metrics` facade.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = IcoConfig::default();
        assert_eq!(config.network.chain_id, 4);
        assert_eq!(config.protocol.tokens_per_certificate, 10);
        assert_eq!(config.eligibility.max_concurrent_lookups, 8);
        assert_eq!(config.contracts.token_address, Address::ZERO);
    }

    #[test]
    fn test_protocol_arithmetic() {
        let protocol = ProtocolConfig::default();
        let wei_per_token = U256::from(1_000_000_000_000_000_000u128);
        assert_eq!(protocol.token_multiplier(), wei_per_token);
        assert_eq!(
            protocol.mint_value(U256::from(5)),
            Some(U256::from(5_000_000_000_000_000u128))
        );
        assert_eq!(protocol.mint_value(U256::MAX), None);
        assert_eq!(protocol.max_supply(), U256::from(10_000) * wei_per_token);
    }

    #[test]
    fn test_partial_toml() {
        let config: IcoConfig = toml::from_str(
            r#"
            [network]
            chain_id = 31337

            [contracts]
            token_address = "0x5FbDB2315678afecb367f032d93F642f64180aa3"
            "#,
        )
        .unwrap();

        assert_eq!(config.network.chain_id, 31337);
        assert_eq!(config.network.rpc_timeout_secs, 10);
        assert_ne!(config.contracts.token_address, Address::ZERO);
        assert_eq!(config.contracts.certificate_address, Address::ZERO);
        assert_eq!(config.protocol.unit_price_wei, 1_000_000_000_000_000);
    }
}
