//! Nonce reservation for the two race legs.

use racer_chain::{ChainError, ChainInterface};
use racer_types::Address;
use std::sync::Arc;

/// Reserves the contiguous nonce pair one race consumes.
///
/// Single-sender, single-race assumption: the pending transaction count is
/// read once and the legs take `n` and `n + 1`. Re-querying between builds
/// could hand out a gap or a duplicate if anything else spends a nonce in
/// the window.
pub struct NonceSequencer {
	chain: Arc<dyn ChainInterface>,
}

impl NonceSequencer {
	/// Creates a sequencer reading through the given chain backend.
	pub fn new(chain: Arc<dyn ChainInterface>) -> Self {
		Self { chain }
	}

	/// Queries the sender's pending count once and returns `(n, n + 1)`.
	pub async fn reserve_pair(&self, sender: &Address) -> Result<(u64, u64), ChainError> {
		let base = self.chain.pending_nonce(sender).await?;
		Ok((base, base + 1))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::ScriptedChain;

	#[tokio::test]
	async fn reserves_contiguous_pair_from_single_query() {
		let chain = Arc::new(ScriptedChain::new(31337, None, 7));
		let sequencer = NonceSequencer::new(chain.clone());
		let sender = Address(vec![0x11; 20]);

		let (first, second) = sequencer.reserve_pair(&sender).await.unwrap();

		assert_eq!((first, second), (7, 8));
		assert_eq!(chain.pending_nonce_calls(), 1);
	}
}
