//! Contract call codecs for the race harness.
//!
//! This module generates ABI bindings for the two contracts the race
//! touches and wraps them in pure call constructors and return decoders.
//! Nothing here performs chain access; the harness core passes the built
//! [`ContractCall`]s to the chain collaborator and hands returned bytes
//! back to the decoders.

use alloy_primitives::{FixedBytes, U256};
use alloy_sol_types::{sol, SolCall};
use racer_types::{Address, ContractCall};
use thiserror::Error;

// Solidity type definitions for the AMM and parameter storage contracts.
sol! {
	/// Proportional AMM surface: the swap entrypoint plus the two pure
	/// helpers that describe a pair's parameter layout.
	interface IPropAmm {
		function swapXtoY(bytes32 pairId, uint256 amountXIn, uint256 minAmountYOut) external returns (uint256 amountYOut);
		function getParameterKeys(bytes32 pairId) external pure returns (bytes32[] keys);
		function encodeParameters(uint256 concentration, uint256 multX, uint256 multY) external pure returns (bytes32[] values);
	}

	/// Global parameter storage surface.
	interface IGlobalStorage {
		function setBatch(bytes32[] keys, bytes32[] values) external;
	}
}

/// Errors that can occur while encoding calls or decoding return data.
#[derive(Debug, Error)]
pub enum CodecError {
	/// Return bytes did not decode as the expected ABI type.
	#[error("Failed to decode return data: {0}")]
	Decode(String),
	/// Call arguments were inconsistent with each other.
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),
}

/// Builds the AMM swap call selling `amount_x_in` of token X.
pub fn build_swap_call(
	amm: &Address,
	pair_id: FixedBytes<32>,
	amount_x_in: U256,
	min_amount_y_out: U256,
) -> ContractCall {
	let data = IPropAmm::swapXtoYCall {
		pairId: pair_id,
		amountXIn: amount_x_in,
		minAmountYOut: min_amount_y_out,
	}
	.abi_encode();

	ContractCall {
		to: amm.clone(),
		data,
	}
}

/// Builds the read-only call listing a pair's parameter storage keys.
pub fn build_parameter_keys_call(amm: &Address, pair_id: FixedBytes<32>) -> ContractCall {
	let data = IPropAmm::getParameterKeysCall { pairId: pair_id }.abi_encode();

	ContractCall {
		to: amm.clone(),
		data,
	}
}

/// Decodes the `getParameterKeys` return into storage words.
pub fn decode_parameter_keys(data: &[u8]) -> Result<Vec<FixedBytes<32>>, CodecError> {
	let decoded = IPropAmm::getParameterKeysCall::abi_decode_returns(data, true)
		.map_err(|e| CodecError::Decode(format!("getParameterKeys: {}", e)))?;
	Ok(decoded.keys)
}

/// Builds the read-only call packing pair parameters into storage words.
pub fn build_encode_parameters_call(
	amm: &Address,
	concentration: U256,
	mult_x: U256,
	mult_y: U256,
) -> ContractCall {
	let data = IPropAmm::encodeParametersCall {
		concentration,
		multX: mult_x,
		multY: mult_y,
	}
	.abi_encode();

	ContractCall {
		to: amm.clone(),
		data,
	}
}

/// Decodes the `encodeParameters` return into storage words.
pub fn decode_encoded_parameters(data: &[u8]) -> Result<Vec<FixedBytes<32>>, CodecError> {
	let decoded = IPropAmm::encodeParametersCall::abi_decode_returns(data, true)
		.map_err(|e| CodecError::Decode(format!("encodeParameters: {}", e)))?;
	Ok(decoded.values)
}

/// Builds the storage update writing `values` under `keys` in one batch.
///
/// The two arrays must pair up element-wise; a length mismatch means the
/// upstream helper calls disagreed about the pair's parameter layout.
pub fn build_set_batch_call(
	storage: &Address,
	keys: Vec<FixedBytes<32>>,
	values: Vec<FixedBytes<32>>,
) -> Result<ContractCall, CodecError> {
	if keys.len() != values.len() {
		return Err(CodecError::InvalidArgument(format!(
			"setBatch requires matching key and value counts, got {} keys and {} values",
			keys.len(),
			values.len()
		)));
	}

	let data = IGlobalStorage::setBatchCall { keys, values }.abi_encode();

	Ok(ContractCall {
		to: storage.clone(),
		data,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::keccak256;
	use alloy_sol_types::SolValue;

	fn amm_address() -> Address {
		"0xdc64a140aa3e981100a9beca4e685f962f0cf6c9".parse().unwrap()
	}

	fn storage_address() -> Address {
		"0xe7f1725e7734ce288f8367e1bb143e90bb3f0512".parse().unwrap()
	}

	fn word(n: u8) -> FixedBytes<32> {
		let mut bytes = [0u8; 32];
		bytes[31] = n;
		FixedBytes::from(bytes)
	}

	#[test]
	fn test_selectors_match_signatures() {
		assert_eq!(
			IPropAmm::swapXtoYCall::SIGNATURE,
			"swapXtoY(bytes32,uint256,uint256)"
		);
		assert_eq!(
			IPropAmm::swapXtoYCall::SELECTOR,
			keccak256(IPropAmm::swapXtoYCall::SIGNATURE.as_bytes())[..4]
		);
		assert_eq!(
			IGlobalStorage::setBatchCall::SIGNATURE,
			"setBatch(bytes32[],bytes32[])"
		);
		assert_eq!(
			IGlobalStorage::setBatchCall::SELECTOR,
			keccak256(IGlobalStorage::setBatchCall::SIGNATURE.as_bytes())[..4]
		);
	}

	#[test]
	fn test_swap_call_round_trip() {
		let pair_id = word(0xab);
		let call = build_swap_call(
			&amm_address(),
			pair_id,
			U256::from(10).pow(U256::from(18)),
			U256::ZERO,
		);

		assert_eq!(call.to, amm_address());
		// selector plus three static words
		assert_eq!(call.data.len(), 4 + 32 * 3);
		assert_eq!(&call.data[..4], IPropAmm::swapXtoYCall::SELECTOR);

		let decoded = IPropAmm::swapXtoYCall::abi_decode(&call.data, true).unwrap();
		assert_eq!(decoded.pairId, pair_id);
		assert_eq!(decoded.amountXIn, U256::from(10).pow(U256::from(18)));
		assert_eq!(decoded.minAmountYOut, U256::ZERO);
	}

	#[test]
	fn test_decode_parameter_keys() {
		let keys = vec![word(1), word(2), word(3)];
		// A bytes32[] return encodes as a single-element tuple
		let return_data = keys.abi_encode();

		let decoded = decode_parameter_keys(&return_data).unwrap();
		assert_eq!(decoded, keys);
	}

	#[test]
	fn test_decode_parameter_keys_rejects_garbage() {
		let err = decode_parameter_keys(&[0x01, 0x02, 0x03]).unwrap_err();
		assert!(matches!(err, CodecError::Decode(_)));
	}

	#[test]
	fn test_decode_encoded_parameters() {
		let values = vec![word(9), word(8)];
		let return_data = values.abi_encode();

		let decoded = decode_encoded_parameters(&return_data).unwrap();
		assert_eq!(decoded, values);
	}

	#[test]
	fn test_set_batch_call_round_trip() {
		let keys = vec![word(1), word(2)];
		let values = vec![word(3), word(4)];
		let call = build_set_batch_call(&storage_address(), keys.clone(), values.clone()).unwrap();

		assert_eq!(call.to, storage_address());
		assert_eq!(&call.data[..4], IGlobalStorage::setBatchCall::SELECTOR);

		let decoded = IGlobalStorage::setBatchCall::abi_decode(&call.data, true).unwrap();
		assert_eq!(decoded.keys, keys);
		assert_eq!(decoded.values, values);
	}

	#[test]
	fn test_set_batch_call_rejects_length_mismatch() {
		let err = build_set_batch_call(&storage_address(), vec![word(1)], vec![]).unwrap_err();
		assert!(matches!(err, CodecError::InvalidArgument(_)));
	}

	#[test]
	fn test_encode_parameters_call_arguments() {
		let call = build_encode_parameters_call(
			&amm_address(),
			U256::from(150),
			U256::from(10).pow(U256::from(18)),
			U256::from(3000) * U256::from(10).pow(U256::from(18)),
		);

		let decoded = IPropAmm::encodeParametersCall::abi_decode(&call.data, true).unwrap();
		assert_eq!(decoded.concentration, U256::from(150));
		assert_eq!(decoded.multX, U256::from(10).pow(U256::from(18)));
		assert_eq!(
			decoded.multY,
			U256::from(3000) * U256::from(10).pow(U256::from(18))
		);
	}
}
