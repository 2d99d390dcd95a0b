//! # Ledger — Single-Asset Account Balances
//!
//! The one piece of state every contract shares. The ledger maps principals
//! to non-negative balances of a single native asset and exposes exactly one
//! way to move value: [`Ledger::transfer`], which either moves the full
//! amount or moves nothing.
//!
//! ## Invariants
//!
//! - Balances never go negative (`u64` plus an explicit availability check).
//! - A transfer debits and credits together or not at all.
//! - Unknown accounts read as zero; entries are created lazily on credit.
//!
//! Contracts move only their own funds or their caller's; the harness never
//! writes balances directly except through genesis [`Ledger::mint`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::principal::Principal;
use crate::receipt::ErrorCode;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur during ledger operations.
///
/// These are *resource* errors in the taxonomy: contracts propagate them
/// unchanged rather than re-mapping them onto their own codes.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Attempted to debit more than the available balance.
    #[error("insufficient funds for {account}: available {available}, requested {requested}")]
    InsufficientFunds {
        /// The account being debited.
        account: Principal,
        /// The balance at the time of the attempt.
        available: u64,
        /// The amount that was requested.
        requested: u64,
    },

    /// Arithmetic overflow during a credit.
    ///
    /// Hitting this means someone tried to credit past `u64::MAX`. In a
    /// simulator that's a scenario bug, not an attack, but money and
    /// wrapping arithmetic still do not mix.
    #[error("balance overflow for {account}: current {current}, credit {credit}")]
    Overflow {
        /// The account being credited.
        account: Principal,
        /// The balance before the failed credit.
        current: u64,
        /// The amount that caused the overflow.
        credit: u64,
    },
}

impl ErrorCode for LedgerError {
    /// Stable wire codes for ledger faults surfaced through a contract call.
    fn code(&self) -> u64 {
        match self {
            LedgerError::InsufficientFunds { .. } => 1,
            LedgerError::Overflow { .. } => 2,
        }
    }
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// Account balances for the single native asset.
///
/// Backed by a `BTreeMap` so iteration order — and therefore anything
/// derived from it — is deterministic across runs.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Ledger {
    balances: BTreeMap<Principal, u64>,
}

impl Ledger {
    /// Creates an empty ledger. All accounts read as zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the balance of a principal, zero for unknown accounts.
    pub fn balance_of(&self, account: &Principal) -> u64 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Moves `amount` from one account to another, atomically.
    ///
    /// Both sides update or neither does. A zero-amount transfer is a
    /// no-op that still succeeds, so "drain the whole balance" call sites
    /// don't need a special case for empty accounts.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientFunds`] if `from` cannot cover
    /// `amount`; no state changes in that case. Returns
    /// [`LedgerError::Overflow`] if crediting `to` would exceed `u64::MAX`.
    pub fn transfer(
        &mut self,
        from: &Principal,
        to: &Principal,
        amount: u64,
    ) -> Result<(), LedgerError> {
        let available = self.balance_of(from);
        if available < amount {
            return Err(LedgerError::InsufficientFunds {
                account: from.clone(),
                available,
                requested: amount,
            });
        }

        // Self-transfer must not double-count; it is a checked no-op.
        if from == to {
            return Ok(());
        }

        let recipient_balance = self.balance_of(to);
        let credited = recipient_balance
            .checked_add(amount)
            .ok_or(LedgerError::Overflow {
                account: to.clone(),
                current: recipient_balance,
                credit: amount,
            })?;

        // All checks passed; both sides commit.
        self.balances.insert(from.clone(), available - amount);
        self.balances.insert(to.clone(), credited);
        Ok(())
    }

    /// Credits freshly minted funds to an account.
    ///
    /// Genesis bootstrapping only — contracts have no path to this.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Overflow`] if the credit would exceed `u64::MAX`.
    pub fn mint(&mut self, account: &Principal, amount: u64) -> Result<(), LedgerError> {
        let current = self.balance_of(account);
        let credited = current.checked_add(amount).ok_or(LedgerError::Overflow {
            account: account.clone(),
            current,
            credit: amount,
        })?;
        self.balances.insert(account.clone(), credited);
        Ok(())
    }

    /// Sum of all balances. Transfers preserve this; only `mint` raises it.
    pub fn total_supply(&self) -> u64 {
        self.balances.values().sum()
    }

    /// Iterates over all accounts with a recorded balance entry.
    pub fn accounts(&self) -> impl Iterator<Item = (&Principal, u64)> {
        self.balances.iter().map(|(p, b)| (p, *b))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn p(id: &str) -> Principal {
        Principal::new(id)
    }

    #[test]
    fn unknown_account_reads_zero() {
        let ledger = Ledger::new();
        assert_eq!(ledger.balance_of(&p("nobody")), 0);
    }

    #[test]
    fn transfer_moves_both_sides() {
        let mut ledger = Ledger::new();
        ledger.mint(&p("alice"), 1000).unwrap();

        ledger.transfer(&p("alice"), &p("bob"), 400).unwrap();

        assert_eq!(ledger.balance_of(&p("alice")), 600);
        assert_eq!(ledger.balance_of(&p("bob")), 400);
    }

    #[test]
    fn insufficient_funds_changes_nothing() {
        let mut ledger = Ledger::new();
        ledger.mint(&p("alice"), 100).unwrap();

        let result = ledger.transfer(&p("alice"), &p("bob"), 200);

        assert!(matches!(
            result.unwrap_err(),
            LedgerError::InsufficientFunds {
                available: 100,
                requested: 200,
                ..
            }
        ));
        assert_eq!(ledger.balance_of(&p("alice")), 100);
        assert_eq!(ledger.balance_of(&p("bob")), 0);
    }

    #[test]
    fn zero_transfer_succeeds() {
        let mut ledger = Ledger::new();
        assert!(ledger.transfer(&p("alice"), &p("bob"), 0).is_ok());
        assert_eq!(ledger.balance_of(&p("bob")), 0);
    }

    #[test]
    fn self_transfer_is_noop() {
        let mut ledger = Ledger::new();
        ledger.mint(&p("alice"), 500).unwrap();
        ledger.transfer(&p("alice"), &p("alice"), 500).unwrap();
        assert_eq!(ledger.balance_of(&p("alice")), 500);
    }

    #[test]
    fn credit_overflow_rejected() {
        let mut ledger = Ledger::new();
        ledger.mint(&p("alice"), u64::MAX).unwrap();
        ledger.mint(&p("bob"), 10).unwrap();

        let result = ledger.transfer(&p("bob"), &p("alice"), 1);
        assert!(matches!(result.unwrap_err(), LedgerError::Overflow { .. }));
        // Debit side must not have committed either.
        assert_eq!(ledger.balance_of(&p("bob")), 10);
    }

    #[test]
    fn mint_overflow_rejected() {
        let mut ledger = Ledger::new();
        ledger.mint(&p("alice"), u64::MAX).unwrap();
        assert!(ledger.mint(&p("alice"), 1).is_err());
    }

    #[test]
    fn transfers_conserve_supply() {
        let mut ledger = Ledger::new();
        ledger.mint(&p("alice"), 1000).unwrap();
        ledger.mint(&p("bob"), 500).unwrap();
        let supply = ledger.total_supply();

        ledger.transfer(&p("alice"), &p("bob"), 750).unwrap();
        ledger.transfer(&p("bob"), &p("carol"), 1).unwrap();

        assert_eq!(ledger.total_supply(), supply);
    }

    #[test]
    fn ledger_serialization_roundtrip() {
        let mut ledger = Ledger::new();
        ledger.mint(&p("alice"), 42).unwrap();

        let json = serde_json::to_string(&ledger).unwrap();
        let back: Ledger = serde_json::from_str(&json).unwrap();
        assert_eq!(back.balance_of(&p("alice")), 42);
    }
}
