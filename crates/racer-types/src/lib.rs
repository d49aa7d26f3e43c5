//! Common types module for the transaction race harness.
//!
//! This module defines the core data types shared across the harness
//! crates. It provides a centralized location for addresses, fee tiers,
//! transaction representations, and receipts so that all components
//! agree on one data model.

/// Address types for EVM accounts and contracts.
pub mod address;
/// Secure string type for private key material.
pub mod secret_string;
/// Transaction, fee tier, and receipt types.
pub mod transaction;
/// Hex prefix and amount formatting helpers.
pub mod utils;

// Re-export all types for convenient access
pub use address::{Address, AddressError};
pub use secret_string::SecretString;
pub use transaction::{
	ContractCall, FeeTier, PendingTransaction, SignedTransaction, TransactionHash,
	TransactionReceipt,
};
pub use utils::{format_eth, format_gwei, truncate_id, with_0x_prefix, without_0x_prefix};
