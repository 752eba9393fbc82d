//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate endpoint URLs parse
//! - Validate value ranges (timeouts > 0, gas > 0, page size > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;

use crate::config::schema::{ClientConfig, FeeConfig};

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field (e.g., "chain.rest_url").
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let chain = &config.chain;
    if chain.chain_id.trim().is_empty() {
        errors.push(ValidationError::new("chain.chain_id", "must not be empty"));
    }
    if chain.bech32_prefix.trim().is_empty() {
        errors.push(ValidationError::new("chain.bech32_prefix", "must not be empty"));
    }
    check_url(&mut errors, "chain.rest_url", &chain.rest_url);
    check_url(&mut errors, "chain.rpc_url", &chain.rpc_url);
    check_url(&mut errors, "content.api_url", &config.content.api_url);

    if chain.stake_currency.coin_minimal_denom.is_empty() {
        errors.push(ValidationError::new(
            "chain.stake_currency.coin_minimal_denom",
            "must not be empty",
        ));
    }
    if chain.stake_currency.coin_decimals > 18 {
        errors.push(ValidationError::new(
            "chain.stake_currency.coin_decimals",
            "must be at most 18",
        ));
    }

    check_fee(&mut errors, "fees.create_post", &config.fees.create_post);
    check_fee(&mut errors, "fees.like_post", &config.fees.like_post);
    check_fee(&mut errors, "fees.send_tokens", &config.fees.send_tokens);

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }
    if config.timeouts.confirmation_secs == 0 {
        errors.push(ValidationError::new("timeouts.confirmation_secs", "must be greater than 0"));
    }
    if config.timeouts.poll_interval_ms == 0 {
        errors.push(ValidationError::new("timeouts.poll_interval_ms", "must be greater than 0"));
    }
    if config.session.posts_limit == 0 {
        errors.push(ValidationError::new("session.posts_limit", "must be greater than 0"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    if let Err(e) = url::Url::parse(value) {
        errors.push(ValidationError::new(field, format!("invalid URL '{}': {}", value, e)));
    }
}

fn check_fee(errors: &mut Vec<ValidationError>, field: &str, fee: &FeeConfig) {
    if fee.denom.trim().is_empty() {
        errors.push(ValidationError::new(field, "fee denom must not be empty"));
    }
    if fee.gas == 0 {
        errors.push(ValidationError::new(field, "gas limit must be greater than 0"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ClientConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = ClientConfig::default();
        config.chain.chain_id = " ".into();
        config.chain.rest_url = "not a url".into();
        config.fees.like_post.gas = 0;
        config.session.posts_limit = 0;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["chain.chain_id", "chain.rest_url", "fees.like_post", "session.posts_limit"]
        );
    }
}
