//! Ordering verdict derivation.

use racer_types::TransactionReceipt;

/// The ordering relation between the two mined legs.
///
/// Transaction indices are only comparable within one block, so a verdict
/// across different blocks makes no ordering claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderingVerdict {
	/// Both legs mined in one block, the parameter update executed first.
	SameBlockUpdateFirst {
		/// The shared block.
		block_number: u64,
	},
	/// Both legs mined in one block, the swap executed first.
	SameBlockSwapFirst {
		/// The shared block.
		block_number: u64,
		/// True when both receipts reported the same index, which no
		/// well-formed block should produce.
		index_tie: bool,
	},
	/// The legs mined in different blocks.
	DifferentBlocks {
		/// Block containing the parameter update.
		update_block: u64,
		/// Block containing the swap.
		swap_block: u64,
	},
}

/// Classifies the ordering of two mined legs.
///
/// Pure and total: equal block numbers compare transaction indices, with
/// an index tie counted as swap-first and flagged; differing block numbers
/// yield `DifferentBlocks`. Execution status plays no part here.
pub fn classify(update: &TransactionReceipt, swap: &TransactionReceipt) -> OrderingVerdict {
	if update.block_number != swap.block_number {
		return OrderingVerdict::DifferentBlocks {
			update_block: update.block_number,
			swap_block: swap.block_number,
		};
	}

	if update.transaction_index < swap.transaction_index {
		OrderingVerdict::SameBlockUpdateFirst {
			block_number: update.block_number,
		}
	} else {
		OrderingVerdict::SameBlockSwapFirst {
			block_number: update.block_number,
			index_tie: update.transaction_index == swap.transaction_index,
		}
	}
}
