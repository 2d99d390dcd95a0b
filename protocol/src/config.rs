//! # Protocol Configuration & Constants
//!
//! Every magic number in the simulator lives here. If you're hardcoding a
//! constant somewhere else, you're doing it wrong.
//!
//! These values define the genesis environment every test scenario starts
//! from. Changing them changes the meaning of recorded scenarios, so treat
//! them as part of the public contract.

// ---------------------------------------------------------------------------
// Genesis Environment
// ---------------------------------------------------------------------------

/// The block height the chain starts at. Blocks mined by the harness advance
/// the clock from here; nothing ever moves it backwards.
pub const GENESIS_HEIGHT: u64 = 0;

/// Initial balance minted to every standard account at simnet construction.
///
/// Generous on purpose: scenario authors should never have to think about
/// whether a test wallet can afford a deposit.
pub const GENESIS_BALANCE: u64 = 100_000_000_000;

/// Number of pre-funded standard wallets (`wallet_1` .. `wallet_N`) created
/// alongside the deployer.
pub const STANDARD_WALLET_COUNT: usize = 9;

// ---------------------------------------------------------------------------
// Account Naming
// ---------------------------------------------------------------------------

/// Name of the account that deploys contracts and owns them by default.
pub const DEPLOYER: &str = "deployer";

/// Prefix for the standard wallet roster. `wallet_1` is the first.
pub const WALLET_PREFIX: &str = "wallet_";
