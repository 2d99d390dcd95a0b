//! # Timelocked Wallet Contract
//!
//! Single-beneficiary escrow gated on block height. The owner locks an
//! amount for a beneficiary until an unlock height; the beneficiary may
//! hand the claim right to someone else ("bestow") any number of times
//! before claiming; the claim itself pays out exactly once.
//!
//! Lifecycle: `Unlocked → Locked → Claimed`. The `Claimed` state is
//! terminal — a second claim cannot drain twice, because there is no
//! beneficiary left to authorize it and no balance left to move.
//!
//! ## Wire error codes (stable forever)
//!
//! | code | meaning |
//! |------|---------|
//! | 100  | caller is not the owner |
//! | 101  | wallet already locked |
//! | 102  | unlock height is in the past |
//! | 104  | caller is not the beneficiary |
//! | 105  | unlock height not reached |

use serde::{Deserialize, Serialize};
use thiserror::Error;

use simnet_protocol::{
    Args, CallResult, Contract, ErrorCode, LedgerError, Principal, ReadContext, SimnetError,
    TxContext, Value,
};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors a wallet entry point can fail with.
#[derive(Debug, Error)]
pub enum WalletError {
    /// `lock` attempted by someone other than the owner.
    #[error("caller is not the contract owner")]
    OwnerOnly,

    /// `lock` attempted when the wallet is already locked (or claimed).
    #[error("wallet is already locked")]
    AlreadyLocked,

    /// The requested unlock height is below the current chain height.
    #[error("unlock height {requested} is in the past (current height {current})")]
    UnlockInPast {
        /// The unlock height the owner asked for.
        requested: u64,
        /// The chain height at the time of the call.
        current: u64,
    },

    /// `bestow` or `claim` attempted by someone who is not the current
    /// beneficiary — including the owner, and including anyone at all once
    /// the wallet is claimed or not yet locked.
    #[error("caller is not the current beneficiary")]
    BeneficiaryOnly,

    /// `claim` attempted before the unlock height.
    #[error("unlock height {unlock_height} not reached (current height {current})")]
    UnlockHeightNotReached {
        /// The height at which the claim becomes valid.
        unlock_height: u64,
        /// The chain height at the time of the call.
        current: u64,
    },

    /// A ledger fault, propagated unchanged.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl ErrorCode for WalletError {
    fn code(&self) -> u64 {
        match self {
            WalletError::OwnerOnly => 100,
            WalletError::AlreadyLocked => 101,
            WalletError::UnlockInPast { .. } => 102,
            WalletError::BeneficiaryOnly => 104,
            WalletError::UnlockHeightNotReached { .. } => 105,
            WalletError::Ledger(e) => e.code(),
        }
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// The wallet's lifecycle. Beneficiary and unlock height only exist while
/// locked; once claimed, neither can be referenced again.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum WalletLifecycle {
    /// Deployed, nothing escrowed yet.
    Unlocked,
    /// Funds escrowed for `beneficiary` until `unlock_height`.
    Locked {
        /// Who may claim (mutable via `bestow` by the incumbent).
        beneficiary: Principal,
        /// Height at or after which the claim becomes valid. Immutable.
        unlock_height: u64,
    },
    /// Paid out. Terminal.
    Claimed,
}

/// The timelocked wallet contract state. The escrowed amount itself lives
/// on the ledger under the contract's own account.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TimelockedWallet {
    /// Fixed at deployment; the only principal allowed to call `lock`.
    owner: Principal,
    /// One-shot escrow lifecycle.
    lifecycle: WalletLifecycle,
}

impl TimelockedWallet {
    /// Creates an unlocked wallet owned by `owner`.
    pub fn new(owner: Principal) -> Self {
        Self {
            owner,
            lifecycle: WalletLifecycle::Unlocked,
        }
    }

    /// The current beneficiary, if the wallet is locked and unclaimed.
    pub fn beneficiary(&self) -> Option<&Principal> {
        match &self.lifecycle {
            WalletLifecycle::Locked { beneficiary, .. } => Some(beneficiary),
            _ => None,
        }
    }

    /// The unlock height, if the wallet is locked and unclaimed.
    pub fn unlock_height(&self) -> Option<u64> {
        match &self.lifecycle {
            WalletLifecycle::Locked { unlock_height, .. } => Some(*unlock_height),
            _ => None,
        }
    }

    /// Escrows `amount` from the caller for `beneficiary` until
    /// `unlock_height`. One-shot.
    ///
    /// # Errors
    ///
    /// - [`WalletError::OwnerOnly`] — caller is not the owner.
    /// - [`WalletError::AlreadyLocked`] — lock already happened (claimed
    ///   wallets count as locked; they can never be re-armed).
    /// - [`WalletError::UnlockInPast`] — `unlock_height` below the current
    ///   height.
    /// - [`WalletError::Ledger`] — the caller cannot cover `amount`; the
    ///   wallet stays unlocked in that case.
    pub fn lock(
        &mut self,
        ctx: &mut TxContext<'_>,
        beneficiary: Principal,
        unlock_height: u64,
        amount: u64,
    ) -> Result<Value, WalletError> {
        if ctx.caller != self.owner {
            return Err(WalletError::OwnerOnly);
        }
        if !matches!(self.lifecycle, WalletLifecycle::Unlocked) {
            return Err(WalletError::AlreadyLocked);
        }
        if unlock_height < ctx.height {
            return Err(WalletError::UnlockInPast {
                requested: unlock_height,
                current: ctx.height,
            });
        }

        // Last failure point: the escrow transfer itself.
        let caller = ctx.caller.clone();
        let wallet = ctx.self_principal.clone();
        ctx.transfer(&caller, &wallet, amount)?;

        self.lifecycle = WalletLifecycle::Locked {
            beneficiary,
            unlock_height,
        };
        Ok(Value::Bool(true))
    }

    /// Hands the claim right to `new_beneficiary`. Only the incumbent
    /// beneficiary may do this, any number of times before the claim.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::BeneficiaryOnly`] if the caller is not the
    /// current beneficiary — the owner included.
    pub fn bestow(
        &mut self,
        caller: &Principal,
        new_beneficiary: Principal,
    ) -> Result<Value, WalletError> {
        match &mut self.lifecycle {
            WalletLifecycle::Locked { beneficiary, .. } if beneficiary == caller => {
                *beneficiary = new_beneficiary;
                Ok(Value::Bool(true))
            }
            _ => Err(WalletError::BeneficiaryOnly),
        }
    }

    /// Pays the entire escrowed balance out to the caller. One-shot.
    ///
    /// # Errors
    ///
    /// - [`WalletError::BeneficiaryOnly`] — caller is not the current
    ///   beneficiary (true for everyone once claimed or while unlocked).
    /// - [`WalletError::UnlockHeightNotReached`] — chain height is still
    ///   below the unlock height.
    pub fn claim(&mut self, ctx: &mut TxContext<'_>) -> Result<Value, WalletError> {
        let unlock_height = match &self.lifecycle {
            WalletLifecycle::Locked {
                beneficiary,
                unlock_height,
            } if beneficiary == &ctx.caller => *unlock_height,
            _ => return Err(WalletError::BeneficiaryOnly),
        };

        if ctx.height < unlock_height {
            return Err(WalletError::UnlockHeightNotReached {
                unlock_height,
                current: ctx.height,
            });
        }

        let caller = ctx.caller.clone();
        let wallet = ctx.self_principal.clone();
        let balance = ctx.ledger.balance_of(&wallet);
        ctx.transfer(&wallet, &caller, balance)?;

        self.lifecycle = WalletLifecycle::Claimed;
        Ok(Value::Bool(true))
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

impl Contract for TimelockedWallet {
    fn name(&self) -> &'static str {
        "timelocked-wallet"
    }

    fn call_public(
        &mut self,
        ctx: &mut TxContext<'_>,
        entry: &str,
        args: &Args,
    ) -> Result<CallResult, SimnetError> {
        match entry {
            "lock" => {
                let beneficiary = args.principal(0)?;
                let unlock_height = args.uint(1)?;
                let amount = args.uint(2)?;
                Ok(self.lock(ctx, beneficiary, unlock_height, amount).into())
            }
            "bestow" => {
                let new_beneficiary = args.principal(0)?;
                Ok(self.bestow(&ctx.caller, new_beneficiary).into())
            }
            "claim" => Ok(self.claim(ctx).into()),
            _ => Err(SimnetError::UnknownEntryPoint {
                contract: self.name().to_string(),
                entry: entry.to_string(),
            }),
        }
    }

    fn call_read_only(
        &self,
        _ctx: &ReadContext<'_>,
        entry: &str,
        _args: &Args,
    ) -> Result<CallResult, SimnetError> {
        Err(SimnetError::UnknownReadOnly {
            contract: self.name().to_string(),
            entry: entry.to_string(),
        })
    }

    fn data_var(&self, name: &str) -> Option<Value> {
        match name {
            "beneficiary" => self.beneficiary().cloned().map(Value::Principal),
            "unlock-height" => self.unlock_height().map(Value::Uint),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
