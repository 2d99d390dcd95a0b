//! # Simnet Contracts
//!
//! The contracts exercised against the simnet core. Three of them carry
//! real invariants; one exists to keep everyone honest:
//!
//! - **Counter** — a per-principal monotonic counter. The baseline sanity
//!   contract: no locks, no votes, no time.
//! - **Multisig Vault** — fixed-membership voting over fund custody.
//!   Membership and quorum lock exactly once; a withdrawal needs quorum.
//! - **Timelocked Wallet** — single-beneficiary escrow gated on block
//!   height, with transferable claim rights.
//! - **Smart Claimant** — a fan-out beneficiary that claims the timelocked
//!   wallet and splits the proceeds. An ordinary caller of the wallet,
//!   never a special case inside it.
//!
//! ## Design Principles
//!
//! 1. Authorization checks come first, state preconditions second,
//!    resource checks last. No mutation before the final check passes.
//! 2. Lifecycles are explicit enums, not boolean flags — illegal states
//!    (members set but not locked) are unrepresentable.
//! 3. Wire error codes are stable forever; typed enums map onto them via
//!    `ErrorCode`.
//! 4. Every public type is serializable (serde).

pub mod counter;
pub mod multisig_vault;
pub mod smart_claimant;
pub mod timelocked_wallet;

pub use counter::Counter;
pub use multisig_vault::{MultisigVault, VaultError};
pub use smart_claimant::SmartClaimant;
pub use timelocked_wallet::{TimelockedWallet, WalletError};
