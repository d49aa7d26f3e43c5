//! Fee schedule computation for the two race legs.
//!
//! Both tiers are derived from a single base fee observation so the legs
//! are priced against the same market snapshot. The tiers differ only in
//! the producer tip; the fee cap formula is shared.

use racer_types::FeeTier;

/// Converts a whole gwei count to wei.
pub const fn gwei(count: u64) -> u128 {
	count as u128 * 1_000_000_000
}

/// Flat gas price for the aggressive tier on chains without a base fee.
pub const LEGACY_GAS_PRICE_HIGH: u128 = gwei(100);
/// Flat gas price for the modest tier on chains without a base fee.
pub const LEGACY_GAS_PRICE_LOW: u128 = gwei(20);

/// Producer tips for the two tiers, in wei.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeTips {
	/// Tip offered by the swap leg.
	pub high: u128,
	/// Tip offered by the parameter-update leg.
	pub low: u128,
}

/// The fee tiers of one race.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeSchedule {
	/// Tier taken by the swap leg.
	pub high: FeeTier,
	/// Tier taken by the parameter-update leg.
	pub low: FeeTier,
}

/// Computes both fee tiers from one base fee observation.
///
/// With a base fee present, each tier gets a fee cap of twice the base fee
/// plus its tip, so both legs tolerate the same base-fee growth and differ
/// only in what they offer the producer. An absent base fee means the chain
/// runs a legacy fee market and the tiers fall back to fixed gas prices.
pub fn fee_schedule(base_fee: Option<u128>, tips: &FeeTips) -> FeeSchedule {
	match base_fee {
		Some(base_fee) => FeeSchedule {
			high: FeeTier::Eip1559 {
				max_fee_per_gas: 2 * base_fee + tips.high,
				max_priority_fee_per_gas: tips.high,
			},
			low: FeeTier::Eip1559 {
				max_fee_per_gas: 2 * base_fee + tips.low,
				max_priority_fee_per_gas: tips.low,
			},
		},
		None => FeeSchedule {
			high: FeeTier::Legacy {
				gas_price: LEGACY_GAS_PRICE_HIGH,
			},
			low: FeeTier::Legacy {
				gas_price: LEGACY_GAS_PRICE_LOW,
			},
		},
	}
}
