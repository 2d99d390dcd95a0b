//! Events emitted during transaction execution.
//!
//! Every successful ledger transfer caused by a contract call emits one
//! [`Event::Transfer`], attributed to the actual sender and recipient —
//! including contract-owned accounts like `deployer.timelocked-wallet`.
//! Tests assert on these by exact match, so attribution is part of the
//! public contract.

use serde::{Deserialize, Serialize};

use crate::principal::Principal;

/// An event recorded in a transaction receipt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// A successful movement of native funds.
    Transfer {
        /// The account that was debited.
        sender: Principal,
        /// The account that was credited.
        recipient: Principal,
        /// The amount moved.
        amount: u64,
    },
}
