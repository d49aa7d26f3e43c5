//! Core race engine.
//!
//! Runs one two-leg transaction race from a single sender: a low-fee
//! parameter update on nonce `n` against a high-fee swap on nonce `n + 1`,
//! submitted concurrently and confirmed concurrently, then classified by
//! where the chain placed them. The engine owns the protocol sequence;
//! chain access, signing and call encoding are collaborators injected at
//! construction.

pub mod builder;
pub mod fees;
pub mod nonce;
pub mod verdict;

#[cfg(test)]
mod testing;

use crate::builder::{build_transaction, GAS_LIMIT_MARGIN};
use crate::fees::{fee_schedule, FeeTips};
use crate::nonce::NonceSequencer;
use crate::verdict::{classify, OrderingVerdict};
use alloy_primitives::{FixedBytes, U256};
use racer_account::{AccountError, AccountService};
use racer_chain::{ChainError, ChainInterface};
use racer_contracts::{
	build_encode_parameters_call, build_parameter_keys_call, build_set_batch_call, build_swap_call,
	decode_encoded_parameters, decode_parameter_keys, CodecError,
};
use racer_types::{
	truncate_id, Address, FeeTier, SignedTransaction, TransactionHash, TransactionReceipt,
};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// The two legs of a race.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leg {
	/// Parameter-update leg: lower nonce, low fee tier.
	Update,
	/// Swap leg: higher nonce, high fee tier.
	Swap,
}

impl fmt::Display for Leg {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Leg::Update => write!(f, "parameter update"),
			Leg::Swap => write!(f, "swap"),
		}
	}
}

/// Errors that can occur while running a race.
///
/// Nothing here is retried or recovered; every variant propagates to the
/// caller and ends the run.
#[derive(Debug, Error)]
pub enum RaceError {
	/// A leg failed before submission, gas estimation reverts included.
	#[error("Precondition failed for {leg} leg: {source}")]
	Precondition {
		/// The leg that failed.
		leg: Leg,
		/// The underlying chain error.
		source: ChainError,
	},
	/// A leg's submission was rejected by the node.
	#[error("Submission failed for {leg} leg: {source}")]
	Submission {
		/// The leg that failed.
		leg: Leg,
		/// The underlying chain error.
		source: ChainError,
	},
	/// A leg's receipt wait failed or timed out.
	#[error("Confirmation failed for {leg} leg: {source}")]
	Confirmation {
		/// The leg that failed.
		leg: Leg,
		/// The underlying chain error.
		source: ChainError,
	},
	/// A shared pre-race chain query failed.
	#[error("Race setup failed: {0}")]
	Setup(ChainError),
	/// Key handling or signing failed.
	#[error("Signing failed: {0}")]
	Signing(#[from] AccountError),
	/// Call encoding or return decoding failed.
	#[error("Codec failed: {0}")]
	Codec(#[from] CodecError),
}

/// Fixed inputs of one race.
///
/// An explicit value struct: the engine never reads the ambient
/// environment, so everything a race depends on is visible here.
#[derive(Debug, Clone)]
pub struct RaceSettings {
	/// The AMM contract holding the pair and the swap entrypoint.
	pub amm: Address,
	/// The global parameter-storage contract.
	pub storage: Address,
	/// Identifier of the traded pair.
	pub pair_id: FixedBytes<32>,
	/// Producer tips for the two fee tiers.
	pub tips: FeeTips,
	/// Amount of token X the swap leg sells.
	pub swap_amount_x: U256,
	/// Minimum amount of token Y the swap accepts.
	pub min_amount_y_out: U256,
	/// Concentration value written by the parameter update.
	pub concentration: U256,
	/// X multiplier written by the parameter update.
	pub mult_x: U256,
	/// Y multiplier written by the parameter update.
	pub mult_y: U256,
}

/// One leg's inputs and observed outcome.
#[derive(Debug, Clone)]
pub struct RaceAttempt {
	/// Which leg this is.
	pub leg: Leg,
	/// The fee tier the leg was submitted under.
	pub fee: FeeTier,
	/// The nonce the leg consumed.
	pub nonce: u64,
	/// The chain's record of the mined transaction.
	pub receipt: TransactionReceipt,
}

/// The outcome of one completed race.
#[derive(Debug, Clone)]
pub struct RaceResult {
	/// The parameter-update leg.
	pub update: RaceAttempt,
	/// The swap leg.
	pub swap: RaceAttempt,
	/// How the chain ordered the two legs.
	pub verdict: OrderingVerdict,
}

/// Coordinates one transaction race from setup to verdict.
pub struct RaceCoordinator {
	chain: Arc<dyn ChainInterface>,
	account: Arc<AccountService>,
	settings: RaceSettings,
}

impl RaceCoordinator {
	/// Creates a coordinator over the given collaborators.
	pub fn new(
		chain: Arc<dyn ChainInterface>,
		account: Arc<AccountService>,
		settings: RaceSettings,
	) -> Self {
		Self {
			chain,
			account,
			settings,
		}
	}

	/// Runs one race.
	///
	/// The sequence is fixed: shared chain queries, fee schedule, nonce
	/// pair, payload derivation, per-leg gas estimation, assembly, signing,
	/// concurrent submission, concurrent receipt waits, classification.
	/// Both submissions are initiated before either result is awaited; the
	/// same holds for the receipt waits. If one leg fails at either
	/// fan-out, the race aborts with that leg's error and whatever the
	/// other leg already put on chain stays outstanding.
	pub async fn run(&self) -> Result<RaceResult, RaceError> {
		let chain_id = self.chain.chain_id().await.map_err(RaceError::Setup)?;
		let sender = self.account.get_address().await?;
		tracing::info!(chain_id, sender = %sender, "Connected to chain");

		let base_fee = self
			.chain
			.latest_base_fee()
			.await
			.map_err(RaceError::Setup)?;
		let schedule = fee_schedule(base_fee, &self.settings.tips);
		match base_fee {
			Some(base_fee) => tracing::info!(base_fee, "Using EIP-1559 fee tiers"),
			None => tracing::info!("No base fee reported, using legacy gas prices"),
		}

		let (update_nonce, swap_nonce) = NonceSequencer::new(Arc::clone(&self.chain))
			.reserve_pair(&sender)
			.await
			.map_err(RaceError::Setup)?;
		tracing::info!(update_nonce, swap_nonce, "Reserved nonce pair");

		let keys_call = build_parameter_keys_call(&self.settings.amm, self.settings.pair_id);
		let keys_raw = self
			.chain
			.call(&keys_call)
			.await
			.map_err(RaceError::Setup)?;
		let keys = decode_parameter_keys(&keys_raw)?;

		let values_call = build_encode_parameters_call(
			&self.settings.amm,
			self.settings.concentration,
			self.settings.mult_x,
			self.settings.mult_y,
		);
		let values_raw = self
			.chain
			.call(&values_call)
			.await
			.map_err(RaceError::Setup)?;
		let values = decode_encoded_parameters(&values_raw)?;
		tracing::debug!(
			pair_id = %truncate_id(&self.settings.pair_id.to_string()),
			parameter_count = keys.len(),
			"Derived parameter-update payload"
		);

		let update_call = build_set_batch_call(&self.settings.storage, keys, values)?;
		let swap_call = build_swap_call(
			&self.settings.amm,
			self.settings.pair_id,
			self.settings.swap_amount_x,
			self.settings.min_amount_y_out,
		);

		let update_gas = self
			.chain
			.estimate_gas(&update_call, &sender)
			.await
			.map_err(|source| RaceError::Precondition {
				leg: Leg::Update,
				source,
			})?;
		let swap_gas = self
			.chain
			.estimate_gas(&swap_call, &sender)
			.await
			.map_err(|source| RaceError::Precondition {
				leg: Leg::Swap,
				source,
			})?;
		tracing::info!(update_gas, swap_gas, "Estimated gas for both legs");

		let update_tx = build_transaction(
			sender.clone(),
			update_call,
			schedule.low,
			update_nonce,
			update_gas + GAS_LIMIT_MARGIN,
			chain_id,
		);
		let swap_tx = build_transaction(
			sender,
			swap_call,
			schedule.high,
			swap_nonce,
			swap_gas + GAS_LIMIT_MARGIN,
			chain_id,
		);

		let update_signed = self.account.sign_transaction(&update_tx).await?;
		let swap_signed = self.account.sign_transaction(&swap_tx).await?;

		let (update_hash, swap_hash) = tokio::try_join!(
			self.submit_leg(Leg::Update, &update_signed),
			self.submit_leg(Leg::Swap, &swap_signed),
		)?;
		tracing::info!(update_tx = %update_hash, swap_tx = %swap_hash, "Both legs submitted");

		let (update_receipt, swap_receipt) = tokio::try_join!(
			self.confirm_leg(Leg::Update, &update_hash),
			self.confirm_leg(Leg::Swap, &swap_hash),
		)?;

		let verdict = classify(&update_receipt, &swap_receipt);
		if let OrderingVerdict::SameBlockSwapFirst {
			index_tie: true, ..
		} = verdict
		{
			tracing::warn!("Both receipts report the same transaction index");
		}

		Ok(RaceResult {
			update: RaceAttempt {
				leg: Leg::Update,
				fee: schedule.low,
				nonce: update_nonce,
				receipt: update_receipt,
			},
			swap: RaceAttempt {
				leg: Leg::Swap,
				fee: schedule.high,
				nonce: swap_nonce,
				receipt: swap_receipt,
			},
			verdict,
		})
	}

	async fn submit_leg(
		&self,
		leg: Leg,
		signed: &SignedTransaction,
	) -> Result<TransactionHash, RaceError> {
		self.chain
			.submit_raw_transaction(&signed.raw)
			.await
			.map_err(|source| {
				tracing::warn!(
					leg = %leg,
					"Submission failed, any already submitted leg is left outstanding"
				);
				RaceError::Submission { leg, source }
			})
	}

	async fn confirm_leg(
		&self,
		leg: Leg,
		hash: &TransactionHash,
	) -> Result<TransactionReceipt, RaceError> {
		let receipt = self
			.chain
			.wait_for_receipt(hash)
			.await
			.map_err(|source| {
				tracing::warn!(
					leg = %leg,
					"Confirmation failed, the other leg is left outstanding"
				);
				RaceError::Confirmation { leg, source }
			})?;

		tracing::info!(
			leg = %leg,
			tx_hash = %hash,
			block_number = receipt.block_number,
			transaction_index = receipt.transaction_index,
			success = receipt.success,
			"Leg confirmed"
		);
		Ok(receipt)
	}
}
