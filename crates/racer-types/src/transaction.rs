//! Transaction types for the race harness.
//!
//! This module defines the transaction pipeline types. A transaction moves
//! through exactly one direction: a [`PendingTransaction`] is assembled,
//! signed into a [`SignedTransaction`], submitted, and eventually observed
//! as a [`TransactionReceipt`]. None of these types are mutated after
//! construction.

use alloy_primitives::{Address as AlloyAddress, TxKind, U256};
use alloy_rpc_types::{TransactionInput, TransactionRequest};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{utils::with_0x_prefix, Address};

/// Blockchain transaction hash representation.
///
/// Stores transaction hashes as raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionHash(pub Vec<u8>);

impl fmt::Display for TransactionHash {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", with_0x_prefix(&hex::encode(&self.0)))
	}
}

/// An encoded contract call ready to be carried by a transaction.
///
/// The call data is opaque to everything except the codec that produced
/// it. Carrying the target address alongside keeps call construction and
/// transaction assembly independent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractCall {
	/// The contract the call is addressed to.
	pub to: Address,
	/// ABI-encoded calldata, selector included.
	pub data: Vec<u8>,
}

/// Gas pricing for one transaction.
///
/// Exactly one representation is populated depending on the fee market
/// the chain runs: EIP-1559 tiers when a base fee exists, a flat gas
/// price otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeeTier {
	/// EIP-1559 pricing with a fee cap and a producer tip.
	Eip1559 {
		/// Upper bound on the total per-gas price.
		max_fee_per_gas: u128,
		/// Portion of the per-gas price offered to the block producer.
		max_priority_fee_per_gas: u128,
	},
	/// Pre-1559 flat gas price.
	Legacy {
		/// Flat per-gas price in wei.
		gas_price: u128,
	},
}

impl FeeTier {
	/// The most the sender can pay per unit of gas under this tier.
	pub fn max_fee_per_gas(&self) -> u128 {
		match self {
			FeeTier::Eip1559 { max_fee_per_gas, .. } => *max_fee_per_gas,
			FeeTier::Legacy { gas_price } => *gas_price,
		}
	}

	/// The producer tip, when the tier carries one.
	pub fn max_priority_fee_per_gas(&self) -> Option<u128> {
		match self {
			FeeTier::Eip1559 {
				max_priority_fee_per_gas,
				..
			} => Some(*max_priority_fee_per_gas),
			FeeTier::Legacy { .. } => None,
		}
	}
}

/// A fully specified transaction awaiting signature.
///
/// All fields are fixed at assembly time. Nonce and fee tier are chosen
/// by the race coordinator and must not be revised afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTransaction {
	/// The account the transaction is sent from.
	pub sender: Address,
	/// The contract call the transaction carries.
	pub call: ContractCall,
	/// Native token value attached to the call.
	pub value: U256,
	/// Sender account nonce.
	pub nonce: u64,
	/// Gas limit, estimation plus safety margin.
	pub gas_limit: u64,
	/// Gas pricing tier.
	pub fee: FeeTier,
	/// Chain the transaction is valid on.
	pub chain_id: u64,
}

/// A signed transaction in wire form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
	/// EIP-2718 encoded bytes as accepted by raw submission endpoints.
	pub raw: Vec<u8>,
	/// Hash of the signed envelope.
	pub hash: TransactionHash,
}

/// Transaction receipt containing execution details.
///
/// Provides the chain's record of a transaction after it has been
/// included in a block, including where in the block it executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
	/// The hash of the transaction.
	pub hash: TransactionHash,
	/// The block number where the transaction was included.
	pub block_number: u64,
	/// Hash of the including block.
	pub block_hash: Vec<u8>,
	/// Position of the transaction within the block.
	pub transaction_index: u64,
	/// Whether the transaction executed successfully.
	pub success: bool,
	/// Gas consumed by the execution.
	pub gas_used: u128,
	/// Per-gas price actually charged.
	pub effective_gas_price: u128,
}

// Conversion into the alloy request used for signing and gas estimation.
// The fee tier decides which pricing fields are populated so the built
// envelope comes out EIP-1559 or legacy to match.
impl From<&PendingTransaction> for TransactionRequest {
	fn from(tx: &PendingTransaction) -> Self {
		let mut request = TransactionRequest {
			from: Some(AlloyAddress::from_slice(&tx.sender.0)),
			to: Some(TxKind::Call(AlloyAddress::from_slice(&tx.call.to.0))),
			input: TransactionInput::new(tx.call.data.clone().into()),
			value: Some(tx.value),
			nonce: Some(tx.nonce),
			gas: Some(tx.gas_limit),
			chain_id: Some(tx.chain_id),
			..Default::default()
		};
		match tx.fee {
			FeeTier::Eip1559 {
				max_fee_per_gas,
				max_priority_fee_per_gas,
			} => {
				request.max_fee_per_gas = Some(max_fee_per_gas);
				request.max_priority_fee_per_gas = Some(max_priority_fee_per_gas);
			}
			FeeTier::Legacy { gas_price } => {
				request.gas_price = Some(gas_price);
			}
		}
		request
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample_transaction(fee: FeeTier) -> PendingTransaction {
		PendingTransaction {
			sender: "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266".parse().unwrap(),
			call: ContractCall {
				to: "0xdc64a140aa3e981100a9beca4e685f962f0cf6c9".parse().unwrap(),
				data: vec![0xde, 0xad, 0xbe, 0xef],
			},
			value: U256::ZERO,
			nonce: 7,
			gas_limit: 120_000,
			fee,
			chain_id: 31337,
		}
	}

	#[test]
	fn test_fee_tier_accessors() {
		let eip1559 = FeeTier::Eip1559 {
			max_fee_per_gas: 12_000_000_000,
			max_priority_fee_per_gas: 10_000_000_000,
		};
		assert_eq!(eip1559.max_fee_per_gas(), 12_000_000_000);
		assert_eq!(eip1559.max_priority_fee_per_gas(), Some(10_000_000_000));

		let legacy = FeeTier::Legacy {
			gas_price: 20_000_000_000,
		};
		assert_eq!(legacy.max_fee_per_gas(), 20_000_000_000);
		assert_eq!(legacy.max_priority_fee_per_gas(), None);
	}

	#[test]
	fn test_hash_display() {
		let hash = TransactionHash(vec![0xab; 32]);
		assert_eq!(hash.to_string().len(), 66);
		assert!(hash.to_string().starts_with("0xabab"));
	}

	#[test]
	fn test_request_conversion_eip1559() {
		let tx = sample_transaction(FeeTier::Eip1559 {
			max_fee_per_gas: 12_000_000_000,
			max_priority_fee_per_gas: 1_000_000_000,
		});
		let request: TransactionRequest = (&tx).into();

		assert_eq!(request.nonce, Some(7));
		assert_eq!(request.gas, Some(120_000));
		assert_eq!(request.chain_id, Some(31337));
		assert_eq!(request.max_fee_per_gas, Some(12_000_000_000));
		assert_eq!(request.max_priority_fee_per_gas, Some(1_000_000_000));
		assert_eq!(request.gas_price, None);
		assert_eq!(
			request.to,
			Some(TxKind::Call(AlloyAddress::from_slice(&tx.call.to.0)))
		);
		assert_eq!(
			request.input.input.as_ref().map(|b| b.to_vec()),
			Some(vec![0xde, 0xad, 0xbe, 0xef])
		);
	}

	#[test]
	fn test_request_conversion_legacy() {
		let tx = sample_transaction(FeeTier::Legacy {
			gas_price: 100_000_000_000,
		});
		let request: TransactionRequest = (&tx).into();

		assert_eq!(request.gas_price, Some(100_000_000_000));
		assert_eq!(request.max_fee_per_gas, None);
		assert_eq!(request.max_priority_fee_per_gas, None);
	}
}
