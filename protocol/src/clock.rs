//! Monotonic block-height counter.
//!
//! Time on the simulated chain is block height, nothing else. The clock
//! only advances between blocks — never mid-block — so every transaction
//! in a block observes the same height.

use serde::{Deserialize, Serialize};

use crate::config::GENESIS_HEIGHT;

/// The chain's height counter. Monotonically non-decreasing.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct BlockClock {
    height: u64,
}

impl BlockClock {
    /// Creates a clock at the genesis height.
    pub fn new() -> Self {
        Self {
            height: GENESIS_HEIGHT,
        }
    }

    /// Current block height.
    pub fn height(&self) -> u64 {
        self.height
    }

    /// Advances the clock by `n` blocks. Harness use only; saturates at
    /// `u64::MAX` rather than wrapping back in time.
    pub fn advance(&mut self, n: u64) {
        self.height = self.height.saturating_add(n);
    }
}

impl Default for BlockClock {
    fn default() -> Self {
        Self::new()
    }
}
