//! Account management and transaction signing.
//!
//! This module defines the `AccountInterface` trait that signing backends
//! implement, along with the `AccountService` wrapper used by the rest of
//! the system. Signing turns a fully specified `PendingTransaction` into
//! its EIP-2718 wire encoding together with the transaction hash.

use async_trait::async_trait;
use racer_types::{Address, PendingTransaction, SignedTransaction};
use thiserror::Error;

/// Available signing backends.
pub mod implementations {
	pub mod local;
}

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AccountError {
	/// Error that occurs while signing or encoding a transaction.
	#[error("Signing failed: {0}")]
	SigningFailed(String),
	/// Error that occurs when the configured key material is invalid.
	#[error("Invalid key: {0}")]
	InvalidKey(String),
}

/// Trait defining the interface for account providers.
///
/// Implementations hold key material and produce signatures. The sender
/// address is derived from the key, so both legs of a race share one
/// address and therefore one nonce sequence.
#[async_trait]
pub trait AccountInterface: Send + Sync {
	/// Returns the address controlled by this account.
	async fn address(&self) -> Result<Address, AccountError>;

	/// Signs a transaction and returns its wire encoding and hash.
	///
	/// The transaction must already carry its nonce, gas limit, fee
	/// fields and chain id; signing does not fill in defaults.
	async fn sign_transaction(
		&self,
		tx: &PendingTransaction,
	) -> Result<SignedTransaction, AccountError>;
}

/// Service wrapper around an account implementation.
pub struct AccountService {
	implementation: Box<dyn AccountInterface>,
}

impl AccountService {
	/// Creates a new account service with the given implementation.
	pub fn new(implementation: Box<dyn AccountInterface>) -> Self {
		Self { implementation }
	}

	/// Gets the address of the managed account.
	pub async fn get_address(&self) -> Result<Address, AccountError> {
		self.implementation.address().await
	}

	/// Signs a transaction with the managed account.
	pub async fn sign_transaction(
		&self,
		tx: &PendingTransaction,
	) -> Result<SignedTransaction, AccountError> {
		self.implementation.sign_transaction(tx).await
	}
}
