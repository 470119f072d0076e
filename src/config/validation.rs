//! Configuration validation.
//!
//! Serde handles syntax; this module checks value ranges and cross-field
//! consistency. All problems are reported at once, not just the first.

use alloy::primitives::Address;
use thiserror::Error;

use crate::config::schema::IcoConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a configuration, returning every error found.
pub fn validate_config(config: &IcoConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = url::Url::parse(&config.network.rpc_url) {
        errors.push(ValidationError::new(
            "network.rpc_url",
            format!("invalid URL '{}': {}", config.network.rpc_url, e),
        ));
    }
    if config.network.chain_id == 0 {
        errors.push(ValidationError::new("network.chain_id", "must be non-zero"));
    }
    if config.network.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "network.rpc_timeout_secs",
            "must be greater than zero",
        ));
    }

    let contracts = &config.contracts;
    if contracts.token_address == Address::ZERO {
        errors.push(ValidationError::new("contracts.token_address", "not set"));
    }
    if contracts.certificate_address == Address::ZERO {
        errors.push(ValidationError::new(
            "contracts.certificate_address",
            "not set",
        ));
    }
    if contracts.token_address != Address::ZERO
        && contracts.token_address == contracts.certificate_address
    {
        errors.push(ValidationError::new(
            "contracts.certificate_address",
            "must differ from token_address",
        ));
    }

    let protocol = &config.protocol;
    if protocol.unit_price_wei == 0 {
        errors.push(ValidationError::new(
            "protocol.unit_price_wei",
            "must be greater than zero",
        ));
    }
    if protocol.tokens_per_certificate == 0 {
        errors.push(ValidationError::new(
            "protocol.tokens_per_certificate",
            "must be greater than zero",
        ));
    }
    if protocol.token_decimals > 36 {
        errors.push(ValidationError::new(
            "protocol.token_decimals",
            format!("{} exceeds 36", protocol.token_decimals),
        ));
    }

    if config.eligibility.max_concurrent_lookups == 0 {
        errors.push(ValidationError::new(
            "eligibility.max_concurrent_lookups",
            "must be greater than zero",
        ));
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level '{}'", config.observability.log_level),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    fn valid_config() -> IcoConfig {
        let mut config = IcoConfig::default();
        config.contracts.token_address = address!("5FbDB2315678afecb367f032d93F642f64180aa3");
        config.contracts.certificate_address =
            address!("e7f1725E7734CE288F8367e1Bb143E90bb3F0512");
        config
    }

    #[test]
    fn test_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_default_config_missing_addresses() {
        let errors = validate_config(&IcoConfig::default()).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec!["contracts.token_address", "contracts.certificate_address"]
        );
    }

    #[test]
    fn test_reports_all_errors() {
        let mut config = valid_config();
        config.network.rpc_url = "not a url".to_string();
        config.network.chain_id = 0;
        config.protocol.unit_price_wei = 0;
        config.eligibility.max_concurrent_lookups = 0;
        config.observability.log_level = "loud".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert!(errors[0].to_string().starts_with("network.rpc_url"));
    }

    #[test]
    fn test_same_contract_address_rejected() {
        let mut config = valid_config();
        config.contracts.certificate_address = config.contracts.token_address;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "contracts.certificate_address");
    }
}
