//! Local private key account implementation.
//!
//! Holds a secp256k1 key in memory and signs through alloy's local wallet.
//! Both race legs are signed by the same key, which is what ties them to a
//! single nonce sequence on chain.

use crate::{AccountError, AccountInterface};
use alloy_eips::eip2718::Encodable2718;
use alloy_network::{EthereumWallet, TransactionBuilder};
use alloy_rpc_types::TransactionRequest;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use racer_types::{Address, PendingTransaction, SecretString, SignedTransaction, TransactionHash};

/// Account backed by a locally held private key.
#[derive(Debug)]
pub struct LocalAccount {
	signer: PrivateKeySigner,
	wallet: EthereumWallet,
}

impl LocalAccount {
	/// Creates a new local account from a hex encoded private key.
	pub fn new(private_key: &SecretString) -> Result<Self, AccountError> {
		let signer: PrivateKeySigner = private_key.with_exposed(|key| {
			key.parse()
				.map_err(|_| AccountError::InvalidKey("Invalid private key format".to_string()))
		})?;
		let wallet = EthereumWallet::from(signer.clone());
		Ok(Self { signer, wallet })
	}
}

#[async_trait]
impl AccountInterface for LocalAccount {
	async fn address(&self) -> Result<Address, AccountError> {
		Ok(Address(self.signer.address().as_slice().to_vec()))
	}

	async fn sign_transaction(
		&self,
		tx: &PendingTransaction,
	) -> Result<SignedTransaction, AccountError> {
		let request: TransactionRequest = tx.into();
		let envelope = request
			.build(&self.wallet)
			.await
			.map_err(|e| AccountError::SigningFailed(format!("Failed to build envelope: {}", e)))?;

		Ok(SignedTransaction {
			raw: envelope.encoded_2718(),
			hash: TransactionHash(envelope.tx_hash().to_vec()),
		})
	}
}

/// Factory function to create a local account from a configured key.
pub fn create_local_account(
	private_key: &SecretString,
) -> Result<Box<dyn AccountInterface>, AccountError> {
	Ok(Box::new(LocalAccount::new(private_key)?))
}
