//! Alloy-based chain implementation.
//!
//! Thin adapter over an alloy HTTP provider. Submission takes pre-signed
//! wire bytes, so the provider carries no wallet and fills in nothing; every
//! field the node sees was fixed upstream by the race coordinator.

use crate::{ChainError, ChainInterface};
use alloy_primitives::{Address as AlloyAddress, FixedBytes, TxKind};
use alloy_provider::{Provider, RootProvider};
use alloy_rpc_types::{
	BlockNumberOrTag, BlockTransactionsKind, TransactionInput, TransactionRequest,
};
use alloy_transport::TransportError;
use alloy_transport_http::Http;
use async_trait::async_trait;
use racer_config::ChainConfig;
use racer_types::{with_0x_prefix, Address, ContractCall, TransactionHash, TransactionReceipt};
use std::time::Duration;

/// Chain client backed by an alloy HTTP provider.
///
/// Receipt waiting polls `eth_getTransactionReceipt` under the timeout and
/// poll interval taken from configuration. The rest of the interface maps
/// one to one onto single RPC calls.
#[derive(Debug)]
pub struct AlloyChainClient {
	provider: RootProvider<Http<reqwest::Client>>,
	receipt_timeout: Duration,
	poll_interval: Duration,
}

impl AlloyChainClient {
	/// Creates a new client for the configured RPC endpoint.
	pub fn new(config: &ChainConfig) -> Result<Self, ChainError> {
		let url = config.rpc_url.parse().map_err(|e| {
			ChainError::Network(format!("Invalid RPC URL {}: {}", config.rpc_url, e))
		})?;

		Ok(Self {
			provider: RootProvider::new_http(url),
			receipt_timeout: Duration::from_secs(config.receipt_timeout_secs),
			poll_interval: Duration::from_secs(config.receipt_poll_interval_secs),
		})
	}
}

/// Maps a transport-level failure onto the chain error taxonomy.
///
/// Responses the node itself produced (reverts, nonce conflicts,
/// underpriced rejections) become `Rpc`; everything else is `Network`.
fn map_rpc_error(context: &str, e: TransportError) -> ChainError {
	match e.as_error_resp() {
		Some(payload) => ChainError::Rpc(format!("{}: {}", context, payload)),
		None => ChainError::Network(format!("{}: {}", context, e)),
	}
}

#[async_trait]
impl ChainInterface for AlloyChainClient {
	async fn chain_id(&self) -> Result<u64, ChainError> {
		self.provider
			.get_chain_id()
			.await
			.map_err(|e| map_rpc_error("Failed to get chain id", e))
	}

	async fn latest_base_fee(&self) -> Result<Option<u128>, ChainError> {
		let block = self
			.provider
			.get_block_by_number(BlockNumberOrTag::Latest, BlockTransactionsKind::Hashes)
			.await
			.map_err(|e| map_rpc_error("Failed to get latest block", e))?
			.ok_or_else(|| ChainError::Rpc("Latest block not available".to_string()))?;

		Ok(block.header.base_fee_per_gas.map(|fee| fee as u128))
	}

	async fn pending_nonce(&self, address: &Address) -> Result<u64, ChainError> {
		self.provider
			.get_transaction_count(AlloyAddress::from_slice(&address.0))
			.pending()
			.await
			.map_err(|e| map_rpc_error("Failed to get pending transaction count", e))
	}

	async fn call(&self, call: &ContractCall) -> Result<Vec<u8>, ChainError> {
		let request = TransactionRequest {
			to: Some(TxKind::Call(AlloyAddress::from_slice(&call.to.0))),
			input: TransactionInput::new(call.data.clone().into()),
			..Default::default()
		};

		let result = self
			.provider
			.call(&request)
			.await
			.map_err(|e| map_rpc_error("Contract call failed", e))?;

		Ok(result.to_vec())
	}

	async fn estimate_gas(&self, call: &ContractCall, from: &Address) -> Result<u64, ChainError> {
		let request = TransactionRequest {
			from: Some(AlloyAddress::from_slice(&from.0)),
			to: Some(TxKind::Call(AlloyAddress::from_slice(&call.to.0))),
			input: TransactionInput::new(call.data.clone().into()),
			..Default::default()
		};

		self.provider
			.estimate_gas(&request)
			.await
			.map_err(|e| map_rpc_error("Gas estimation failed", e))
	}

	async fn submit_raw_transaction(&self, raw: &[u8]) -> Result<TransactionHash, ChainError> {
		let pending = self
			.provider
			.send_raw_transaction(raw)
			.await
			.map_err(|e| map_rpc_error("Failed to send raw transaction", e))?;

		let tx_hash = *pending.tx_hash();
		tracing::info!(
			tx_hash = %with_0x_prefix(&hex::encode(tx_hash.0)),
			"Submitted transaction"
		);

		Ok(TransactionHash(tx_hash.0.to_vec()))
	}

	async fn wait_for_receipt(
		&self,
		hash: &TransactionHash,
	) -> Result<TransactionReceipt, ChainError> {
		let tx_hash = FixedBytes::<32>::from_slice(&hash.0);
		let start_time = tokio::time::Instant::now();

		tracing::debug!(
			tx_hash = %hash,
			timeout_secs = self.receipt_timeout.as_secs(),
			"Waiting for receipt"
		);

		loop {
			if start_time.elapsed() > self.receipt_timeout {
				return Err(ChainError::ReceiptTimeout {
					hash: hash.to_string(),
					waited_secs: self.receipt_timeout.as_secs(),
				});
			}

			let receipt = match self.provider.get_transaction_receipt(tx_hash).await {
				Ok(Some(receipt)) => receipt,
				Ok(None) => {
					// Not yet mined, wait and retry
					tokio::time::sleep(self.poll_interval).await;
					continue;
				}
				Err(e) => {
					return Err(map_rpc_error("Failed to get receipt", e));
				}
			};

			return Ok(TransactionReceipt {
				hash: TransactionHash(receipt.transaction_hash.0.to_vec()),
				block_number: receipt.block_number.unwrap_or(0),
				block_hash: receipt
					.block_hash
					.map(|h| h.0.to_vec())
					.unwrap_or_default(),
				transaction_index: receipt.transaction_index.unwrap_or(0),
				success: receipt.status(),
				gas_used: receipt.gas_used as u128,
				effective_gas_price: receipt.effective_gas_price as u128,
			});
		}
	}
}

/// Factory function to create a chain client from configuration.
pub fn create_chain_client(config: &ChainConfig) -> Result<Box<dyn ChainInterface>, ChainError> {
	Ok(Box::new(AlloyChainClient::new(config)?))
}
