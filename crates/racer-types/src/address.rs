//! Address type for EVM chains.
//!
//! Addresses are stored as raw bytes and rendered as 0x-prefixed hex.
//! Parsing enforces the 20-byte length so downstream conversions into
//! fixed-size representations cannot fail.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::utils::{with_0x_prefix, without_0x_prefix};

/// Errors that can occur when parsing an address from hex.
#[derive(Debug, Error)]
pub enum AddressError {
	/// The string contained characters outside the hex alphabet.
	#[error("Invalid hex in address: {0}")]
	InvalidHex(String),
	/// The decoded bytes were not exactly 20 bytes long.
	#[error("Invalid address length: expected 20 bytes, got {0}")]
	InvalidLength(usize),
}

/// EVM account or contract address.
///
/// Stores the address as raw bytes. Instances produced through parsing
/// are always exactly 20 bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address(pub Vec<u8>);

impl Address {
	/// Renders the address as a lowercase hex string with 0x prefix.
	pub fn to_hex(&self) -> String {
		with_0x_prefix(&hex::encode(&self.0))
	}
}

impl FromStr for Address {
	type Err = AddressError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let bytes = hex::decode(without_0x_prefix(s))
			.map_err(|e| AddressError::InvalidHex(e.to_string()))?;
		if bytes.len() != 20 {
			return Err(AddressError::InvalidLength(bytes.len()));
		}
		Ok(Address(bytes))
	}
}

impl fmt::Display for Address {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.to_hex())
	}
}

// Serialized as the hex string form so addresses read naturally in TOML
// configuration and structured logs.
impl Serialize for Address {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&self.to_hex())
	}
}

impl<'de> Deserialize<'de> for Address {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let s = String::deserialize(deserializer)?;
		s.parse().map_err(serde::de::Error::custom)
	}
}
