//! Scripted chain double for exercising the race protocol without a node.
//!
//! The double answers the protocol's queries from prepared values, captures
//! every submission, and can gate submissions or receipt waits behind a
//! two-party barrier. A barrier-gated call only returns once both legs have
//! arrived, so a protocol that serialized its fan-out would deadlock here
//! instead of passing.

use alloy_consensus::TxEnvelope;
use alloy_eips::eip2718::Decodable2718;
use alloy_primitives::keccak256;
use async_trait::async_trait;
use racer_chain::{ChainError, ChainInterface};
use racer_types::{Address, ContractCall, TransactionHash, TransactionReceipt};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::Barrier;

pub struct ScriptedChain {
	chain_id: u64,
	base_fee: Option<u128>,
	pending_count: u64,
	call_responses: Mutex<VecDeque<Vec<u8>>>,
	estimates: Mutex<VecDeque<u64>>,
	estimate_failure: Option<String>,
	submit_failures: Mutex<HashMap<u64, String>>,
	receipts_by_nonce: Mutex<HashMap<u64, TransactionReceipt>>,
	mined: Mutex<HashMap<Vec<u8>, TransactionReceipt>>,
	submissions: Mutex<Vec<Vec<u8>>>,
	pending_nonce_calls: AtomicUsize,
	submit_barrier: Option<Barrier>,
	receipt_barrier: Option<Barrier>,
	events: Mutex<Vec<String>>,
}

impl ScriptedChain {
	pub fn new(chain_id: u64, base_fee: Option<u128>, pending_count: u64) -> Self {
		Self {
			chain_id,
			base_fee,
			pending_count,
			call_responses: Mutex::new(VecDeque::new()),
			estimates: Mutex::new(VecDeque::new()),
			estimate_failure: None,
			submit_failures: Mutex::new(HashMap::new()),
			receipts_by_nonce: Mutex::new(HashMap::new()),
			mined: Mutex::new(HashMap::new()),
			submissions: Mutex::new(Vec::new()),
			pending_nonce_calls: AtomicUsize::new(0),
			submit_barrier: None,
			receipt_barrier: None,
			events: Mutex::new(Vec::new()),
		}
	}

	/// Queues a response for the next read-only contract call.
	pub fn with_call_response(self, data: Vec<u8>) -> Self {
		self.call_responses.lock().unwrap().push_back(data);
		self
	}

	/// Queues a gas estimate; an exhausted queue answers 100_000.
	pub fn with_estimate(self, gas: u64) -> Self {
		self.estimates.lock().unwrap().push_back(gas);
		self
	}

	/// Makes every gas estimation fail with the given node message.
	pub fn with_estimate_failure(mut self, message: &str) -> Self {
		self.estimate_failure = Some(message.to_string());
		self
	}

	/// Makes the submission carrying `nonce` fail with the given message.
	pub fn with_submit_failure(self, nonce: u64, message: &str) -> Self {
		self.submit_failures
			.lock()
			.unwrap()
			.insert(nonce, message.to_string());
		self
	}

	/// Registers the receipt minted for the transaction carrying `nonce`.
	pub fn with_receipt(self, nonce: u64, receipt: TransactionReceipt) -> Self {
		self.receipts_by_nonce.lock().unwrap().insert(nonce, receipt);
		self
	}

	/// Gates submissions behind a two-party barrier.
	pub fn with_submit_barrier(mut self) -> Self {
		self.submit_barrier = Some(Barrier::new(2));
		self
	}

	/// Gates receipt waits behind a two-party barrier.
	pub fn with_receipt_barrier(mut self) -> Self {
		self.receipt_barrier = Some(Barrier::new(2));
		self
	}

	pub fn pending_nonce_calls(&self) -> usize {
		self.pending_nonce_calls.load(Ordering::SeqCst)
	}

	/// Raw wire bytes of every accepted submission, in arrival order.
	pub fn submissions(&self) -> Vec<Vec<u8>> {
		self.submissions.lock().unwrap().clone()
	}

	/// Recorded interface events, in arrival order.
	pub fn events(&self) -> Vec<String> {
		self.events.lock().unwrap().clone()
	}

	fn record(&self, event: impl Into<String>) {
		self.events.lock().unwrap().push(event.into());
	}

	fn decode_nonce(raw: &[u8]) -> u64 {
		match TxEnvelope::decode_2718(&mut &raw[..]).expect("decodable envelope") {
			TxEnvelope::Eip1559(tx) => tx.tx().nonce,
			TxEnvelope::Legacy(tx) => tx.tx().nonce,
			other => panic!("unexpected envelope type: {:?}", other),
		}
	}
}

#[async_trait]
impl ChainInterface for ScriptedChain {
	async fn chain_id(&self) -> Result<u64, ChainError> {
		Ok(self.chain_id)
	}

	async fn latest_base_fee(&self) -> Result<Option<u128>, ChainError> {
		Ok(self.base_fee)
	}

	async fn pending_nonce(&self, _address: &Address) -> Result<u64, ChainError> {
		self.pending_nonce_calls.fetch_add(1, Ordering::SeqCst);
		self.record("pending_nonce");
		Ok(self.pending_count)
	}

	async fn call(&self, _call: &ContractCall) -> Result<Vec<u8>, ChainError> {
		self.call_responses
			.lock()
			.unwrap()
			.pop_front()
			.ok_or_else(|| ChainError::Rpc("no scripted call response left".to_string()))
	}

	async fn estimate_gas(&self, _call: &ContractCall, _from: &Address) -> Result<u64, ChainError> {
		if let Some(message) = &self.estimate_failure {
			return Err(ChainError::Rpc(message.clone()));
		}
		Ok(self.estimates.lock().unwrap().pop_front().unwrap_or(100_000))
	}

	async fn submit_raw_transaction(&self, raw: &[u8]) -> Result<TransactionHash, ChainError> {
		let nonce = Self::decode_nonce(raw);
		self.record(format!("submit_enter:{}", nonce));

		if let Some(barrier) = &self.submit_barrier {
			barrier.wait().await;
		}

		if let Some(message) = self.submit_failures.lock().unwrap().remove(&nonce) {
			return Err(ChainError::Rpc(message));
		}

		let hash = keccak256(raw).to_vec();
		let scripted = self.receipts_by_nonce.lock().unwrap().remove(&nonce);
		if let Some(mut receipt) = scripted {
			receipt.hash = TransactionHash(hash.clone());
			self.mined.lock().unwrap().insert(hash.clone(), receipt);
		}
		self.submissions.lock().unwrap().push(raw.to_vec());
		self.record(format!("submit_return:{}", nonce));

		Ok(TransactionHash(hash))
	}

	async fn wait_for_receipt(
		&self,
		hash: &TransactionHash,
	) -> Result<TransactionReceipt, ChainError> {
		self.record("wait_enter");

		if let Some(barrier) = &self.receipt_barrier {
			barrier.wait().await;
		}

		let receipt = self
			.mined
			.lock()
			.unwrap()
			.get(&hash.0)
			.cloned()
			.ok_or_else(|| ChainError::ReceiptTimeout {
				hash: hash.to_string(),
				waited_secs: 0,
			})?;
		self.record("wait_return");

		Ok(receipt)
	}
}
