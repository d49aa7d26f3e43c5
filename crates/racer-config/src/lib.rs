//! Configuration module for the transaction race harness.
//!
//! This module provides structures and utilities for managing harness
//! configuration. It supports loading configuration from TOML files with
//! environment variable resolution and validates all values before the
//! harness starts talking to a chain.

use alloy_primitives::{FixedBytes, U256};
use racer_types::{Address, SecretString};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Extract just the message without the huge input dump
		let message = err.message().to_string();
		ConfigError::Parse(message)
	}
}

/// Main configuration structure for the race harness.
///
/// Contains the chain endpoint, the signing account, the contract
/// deployment the race targets, and the race parameters themselves.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Chain endpoint and receipt polling policy.
	#[serde(default)]
	pub chain: ChainConfig,
	/// Signing account configuration.
	pub account: AccountConfig,
	/// Addresses of the contracts the race touches.
	pub contracts: ContractsConfig,
	/// Fee tips and call arguments for the race legs.
	#[serde(default)]
	pub race: RaceConfig,
}

/// Chain endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChainConfig {
	/// HTTP RPC endpoint.
	#[serde(default = "default_rpc_url")]
	pub rpc_url: String,
	/// How long the receipt wait polls before giving up, in seconds.
	#[serde(default = "default_receipt_timeout_secs")]
	pub receipt_timeout_secs: u64,
	/// Interval between receipt polls, in seconds.
	#[serde(default = "default_receipt_poll_interval_secs")]
	pub receipt_poll_interval_secs: u64,
}

impl Default for ChainConfig {
	fn default() -> Self {
		Self {
			rpc_url: default_rpc_url(),
			receipt_timeout_secs: default_receipt_timeout_secs(),
			receipt_poll_interval_secs: default_receipt_poll_interval_secs(),
		}
	}
}

fn default_rpc_url() -> String {
	"http://localhost:8547".to_string()
}

fn default_receipt_timeout_secs() -> u64 {
	120
}

fn default_receipt_poll_interval_secs() -> u64 {
	3
}

/// Signing account configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AccountConfig {
	/// Private key of the racing sender, typically supplied through
	/// `${PRIVATE_KEY}` interpolation rather than written in the file.
	pub private_key: SecretString,
}

/// Contract deployment the race runs against.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContractsConfig {
	/// The AMM contract exposing the swap and parameter helpers.
	pub amm: Address,
	/// The global parameter storage contract.
	pub storage: Address,
	/// Identifier of the AMM pair whose parameters the update leg writes.
	pub pair_id: FixedBytes<32>,
}

/// Race parameters: fee tips and the arguments of both contract calls.
///
/// Amounts are decimal strings so values beyond the TOML integer range
/// can be expressed; they are parsed during validation.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RaceConfig {
	/// Producer tip of the high-fee swap leg, in gwei.
	#[serde(default = "default_tip_high_gwei")]
	pub tip_high_gwei: u64,
	/// Producer tip of the low-fee update leg, in gwei.
	#[serde(default = "default_tip_low_gwei")]
	pub tip_low_gwei: u64,
	/// Amount of token X the swap leg sells, in base units.
	#[serde(default = "default_swap_amount_x")]
	pub swap_amount_x: String,
	/// Minimum amount of token Y the swap accepts.
	#[serde(default = "default_min_amount_y_out")]
	pub min_amount_y_out: String,
	/// Concentration parameter written by the update leg.
	#[serde(default = "default_concentration")]
	pub concentration: String,
	/// Token X multiplier written by the update leg.
	#[serde(default = "default_mult_x")]
	pub mult_x: String,
	/// Token Y multiplier written by the update leg.
	#[serde(default = "default_mult_y")]
	pub mult_y: String,
}

impl Default for RaceConfig {
	fn default() -> Self {
		Self {
			tip_high_gwei: default_tip_high_gwei(),
			tip_low_gwei: default_tip_low_gwei(),
			swap_amount_x: default_swap_amount_x(),
			min_amount_y_out: default_min_amount_y_out(),
			concentration: default_concentration(),
			mult_x: default_mult_x(),
			mult_y: default_mult_y(),
		}
	}
}

fn default_tip_high_gwei() -> u64 {
	10
}

fn default_tip_low_gwei() -> u64 {
	1
}

/// One token X in 18-decimal base units.
fn default_swap_amount_x() -> String {
	"1000000000000000000".to_string()
}

fn default_min_amount_y_out() -> String {
	"0".to_string()
}

fn default_concentration() -> String {
	"150".to_string()
}

fn default_mult_x() -> String {
	"1000000000000000000".to_string()
}

fn default_mult_y() -> String {
	"3000000000000000000000".to_string()
}

impl RaceConfig {
	/// Parses the swap input amount.
	pub fn swap_amount_x(&self) -> Result<U256, ConfigError> {
		parse_amount("race.swap_amount_x", &self.swap_amount_x)
	}

	/// Parses the swap output floor.
	pub fn min_amount_y_out(&self) -> Result<U256, ConfigError> {
		parse_amount("race.min_amount_y_out", &self.min_amount_y_out)
	}

	/// Parses the concentration parameter.
	pub fn concentration(&self) -> Result<U256, ConfigError> {
		parse_amount("race.concentration", &self.concentration)
	}

	/// Parses the token X multiplier.
	pub fn mult_x(&self) -> Result<U256, ConfigError> {
		parse_amount("race.mult_x", &self.mult_x)
	}

	/// Parses the token Y multiplier.
	pub fn mult_y(&self) -> Result<U256, ConfigError> {
		parse_amount("race.mult_y", &self.mult_y)
	}
}

/// Parses a decimal amount string into a U256.
fn parse_amount(field: &str, value: &str) -> Result<U256, ConfigError> {
	U256::from_str(value)
		.map_err(|e| ConfigError::Validation(format!("{} is not a valid amount: {}", field, e)))
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable VAR_NAME.
/// Supports default values with ${VAR_NAME:-default_value}.
///
/// Input strings are limited to 1MB to prevent ReDoS attacks.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	// Limit input size to prevent ReDoS attacks
	const MAX_INPUT_SIZE: usize = 1024 * 1024; // 1MB
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut result = input.to_string();
	let mut replacements = Vec::new();

	for cap in re.captures_iter(input) {
		let full_match = cap.get(0).unwrap();
		let var_name = cap.get(1).unwrap().as_str();
		let default_value = cap.get(2).map(|m| m.as_str());

		let value = match std::env::var(var_name) {
			Ok(v) => v,
			Err(_) => {
				if let Some(default) = default_value {
					default.to_string()
				} else {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name
					)));
				}
			},
		};

		replacements.push((full_match.start(), full_match.end(), value));
	}

	// Apply replacements in reverse order to maintain positions
	for (start, end, value) in replacements.iter().rev() {
		result.replace_range(start..end, value);
	}

	Ok(result)
}

impl Config {
	/// Loads configuration from a TOML file.
	///
	/// Environment variables are resolved and the configuration is
	/// validated before being returned.
	pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
		let contents = std::fs::read_to_string(path)?;
		contents.parse()
	}

	/// Validates the configuration to ensure all values are usable.
	///
	/// Checks the chain endpoint and polling policy, the signing key,
	/// the tip ordering that defines the race, and that every amount
	/// string parses.
	fn validate(&self) -> Result<(), ConfigError> {
		if self.chain.rpc_url.is_empty() {
			return Err(ConfigError::Validation("chain.rpc_url cannot be empty".into()));
		}
		if self.chain.receipt_timeout_secs == 0 {
			return Err(ConfigError::Validation(
				"chain.receipt_timeout_secs must be greater than 0".into(),
			));
		}
		if self.chain.receipt_poll_interval_secs == 0 {
			return Err(ConfigError::Validation(
				"chain.receipt_poll_interval_secs must be greater than 0".into(),
			));
		}

		if self.account.private_key.is_empty() {
			return Err(ConfigError::Validation(
				"account.private_key cannot be empty".into(),
			));
		}

		// The race depends on the swap leg outbidding the update leg.
		if self.race.tip_high_gwei <= self.race.tip_low_gwei {
			return Err(ConfigError::Validation(format!(
				"race.tip_high_gwei ({}) must exceed race.tip_low_gwei ({})",
				self.race.tip_high_gwei, self.race.tip_low_gwei
			)));
		}

		self.race.swap_amount_x()?;
		self.race.min_amount_y_out()?;
		self.race.concentration()?;
		self.race.mult_x()?;
		self.race.mult_y()?;

		Ok(())
	}
}

/// Implementation of FromStr trait for Config to enable parsing from string.
///
/// Environment variables are resolved and the configuration is
/// automatically validated after parsing.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}
