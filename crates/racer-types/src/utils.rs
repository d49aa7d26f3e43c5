//! String formatting utilities.
//!
//! Provides hex prefix management, identifier truncation for log output,
//! and wei-denominated amount formatting for the race report.

/// Truncates a hex identifier for display purposes.
///
/// Shows only the first 8 characters followed by ".." for longer strings.
pub fn truncate_id(id: &str) -> String {
	if id.len() <= 8 {
		id.to_string()
	} else {
		format!("{}..", &id[..8])
	}
}

/// Adds the "0x" prefix to a hex string if it doesn't already have one.
pub fn with_0x_prefix(hex_str: &str) -> String {
	if hex_str.to_lowercase().starts_with("0x") {
		hex_str.to_string()
	} else {
		format!("0x{}", hex_str)
	}
}

/// Removes the "0x" prefix from a hex string if present.
pub fn without_0x_prefix(hex_str: &str) -> &str {
	hex_str
		.strip_prefix("0x")
		.or_else(|| hex_str.strip_prefix("0X"))
		.unwrap_or(hex_str)
}

/// Formats a wei amount as a decimal gwei string.
///
/// Used for fee and gas-price lines in the race report.
pub fn format_gwei(wei: u128) -> String {
	format_units(wei, 9)
}

/// Formats a wei amount as a decimal ether string.
pub fn format_eth(wei: u128) -> String {
	format_units(wei, 18)
}

/// Renders an integer amount with the given number of decimal places,
/// trimming trailing zeros from the fractional part.
fn format_units(amount: u128, decimals: u32) -> String {
	let scale = 10u128.pow(decimals);
	let integer = amount / scale;
	let fraction = amount % scale;

	if fraction == 0 {
		return integer.to_string();
	}

	let fraction_str = format!("{:0>width$}", fraction, width = decimals as usize);
	let trimmed = fraction_str.trim_end_matches('0');
	format!("{}.{}", integer, trimmed)
}
