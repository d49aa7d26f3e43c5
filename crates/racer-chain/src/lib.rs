//! Chain access for the race harness.
//!
//! This module defines the `ChainInterface` trait that chain backends
//! implement. The interface is deliberately narrow: the queries the race
//! protocol needs up front, raw submission, and a receipt wait. Everything
//! that can block on the network lives behind this trait, so the race
//! coordinator itself never owns a timeout or a retry.

use async_trait::async_trait;
use racer_types::{Address, ContractCall, TransactionHash, TransactionReceipt};
use thiserror::Error;

/// Available chain backends.
pub mod implementations {
	pub mod alloy;
}

/// Errors that can occur during chain operations.
#[derive(Debug, Error)]
pub enum ChainError {
	/// Error that occurs during network communication.
	#[error("Network error: {0}")]
	Network(String),
	/// Error returned by the node itself, reverts included.
	#[error("RPC error: {0}")]
	Rpc(String),
	/// Error that occurs when a transaction is not mined within the
	/// configured wait window.
	#[error("Timed out waiting for receipt of {hash} after {waited_secs}s")]
	ReceiptTimeout {
		/// Hash of the transaction that was being waited on.
		hash: String,
		/// How long the wait ran before giving up.
		waited_secs: u64,
	},
}

/// Trait defining the interface for chain access.
#[async_trait]
pub trait ChainInterface: Send + Sync {
	/// Returns the chain id reported by the node.
	async fn chain_id(&self) -> Result<u64, ChainError>;

	/// Returns the base fee of the latest block, or `None` on chains
	/// that do not run an EIP-1559 fee market.
	async fn latest_base_fee(&self) -> Result<Option<u128>, ChainError>;

	/// Returns the sender's transaction count including pending
	/// transactions. The race protocol calls this exactly once per run.
	async fn pending_nonce(&self, address: &Address) -> Result<u64, ChainError>;

	/// Executes a read-only contract call and returns the raw return data.
	async fn call(&self, call: &ContractCall) -> Result<Vec<u8>, ChainError>;

	/// Estimates the gas required for a call from the given sender.
	///
	/// A revert during estimation propagates as an error; callers treat
	/// that as a failed precondition rather than retrying.
	async fn estimate_gas(&self, call: &ContractCall, from: &Address) -> Result<u64, ChainError>;

	/// Submits an already signed transaction in wire form.
	///
	/// Nonce conflicts and underpriced rejections propagate unmodified.
	async fn submit_raw_transaction(&self, raw: &[u8]) -> Result<TransactionHash, ChainError>;

	/// Waits until the transaction is mined and returns its receipt.
	///
	/// Polling cadence and the overall timeout are backend policy,
	/// configured when the backend is constructed.
	async fn wait_for_receipt(
		&self,
		hash: &TransactionHash,
	) -> Result<TransactionReceipt, ChainError>;
}
