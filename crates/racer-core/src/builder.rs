//! Transaction assembly.
//!
//! Pure construction only. Every field is decided by the caller; nothing
//! here touches the chain or revises a value afterwards.

use alloy_primitives::U256;
use racer_types::{Address, ContractCall, FeeTier, PendingTransaction};

/// Fixed margin added on top of every gas estimate.
pub const GAS_LIMIT_MARGIN: u64 = 20_000;

/// Assembles a transaction from fully decided inputs.
///
/// Neither call carries native value, so `value` is always zero.
pub fn build_transaction(
	sender: Address,
	call: ContractCall,
	fee: FeeTier,
	nonce: u64,
	gas_limit: u64,
	chain_id: u64,
) -> PendingTransaction {
	PendingTransaction {
		sender,
		call,
		value: U256::ZERO,
		nonce,
		gas_limit,
		fee,
		chain_id,
	}
}
