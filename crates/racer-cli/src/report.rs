//! Human-readable race reporting.
//!
//! The engine returns structured results only; everything printed for the
//! operator comes from here.

use racer_core::verdict::OrderingVerdict;
use racer_core::{RaceAttempt, RaceResult};
use racer_types::{format_eth, format_gwei, with_0x_prefix};

/// Prints the post-race summary to stdout.
pub fn print_race_summary(result: &RaceResult) {
	print!("{}", render_summary(result));
}

fn render_summary(result: &RaceResult) -> String {
	let mut out = String::new();
	out.push_str("\n=== Race result ===\n");
	out.push_str(&render_leg(&result.update));
	out.push_str(&render_leg(&result.swap));
	out.push_str(&render_verdict(result));
	out
}

fn render_leg(attempt: &RaceAttempt) -> String {
	let receipt = &attempt.receipt;
	let status = if receipt.success { "success" } else { "reverted" };
	let total_cost = receipt.gas_used.saturating_mul(receipt.effective_gas_price);

	let mut out = String::new();
	out.push_str(&format!(
		"\n{} leg (nonce {}):\n",
		attempt.leg, attempt.nonce
	));
	out.push_str(&format!("  tx hash:             {}\n", receipt.hash));
	out.push_str(&format!("  status:              {}\n", status));
	out.push_str(&format!(
		"  block:               {} (index {})\n",
		receipt.block_number, receipt.transaction_index
	));
	out.push_str(&format!(
		"  block hash:          {}\n",
		with_0x_prefix(&hex::encode(&receipt.block_hash))
	));
	out.push_str(&format!("  gas used:            {}\n", receipt.gas_used));
	out.push_str(&format!(
		"  effective gas price: {} gwei\n",
		format_gwei(receipt.effective_gas_price)
	));
	out.push_str(&format!(
		"  total cost:          {} ETH\n",
		format_eth(total_cost)
	));
	out
}

fn render_verdict(result: &RaceResult) -> String {
	let update_index = result.update.receipt.transaction_index;
	let swap_index = result.swap.receipt.transaction_index;

	match result.verdict {
		OrderingVerdict::SameBlockUpdateFirst { block_number } => format!(
			"\nVerdict: same block {}, parameter update executed first (index {} vs {})\n",
			block_number, update_index, swap_index
		),
		OrderingVerdict::SameBlockSwapFirst {
			block_number,
			index_tie,
		} => {
			let mut out = format!(
				"\nVerdict: same block {}, swap executed first (index {} vs {})\n",
				block_number, swap_index, update_index
			);
			if index_tie {
				out.push_str("Warning: both receipts report the same transaction index\n");
			}
			out
		},
		OrderingVerdict::DifferentBlocks {
			update_block,
			swap_block,
		} => format!(
			"\nVerdict: different blocks, parameter update in {}, swap in {}\n",
			update_block, swap_block
		),
	}
}
